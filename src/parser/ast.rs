// AST (Abstract Syntax Tree) definitions for the JavaScript subset

use std::fmt;
use std::rc::Rc;

/// Source location information for error reporting and step highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Registry of node discriminants.
///
/// The names follow the Mozilla Parser API so that trees read the same way
/// they would in any ESTree tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    IfStatement,
    BlockStatement,
    ExpressionStatement,
    ReturnStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    EmptyStatement,
    AssignmentExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    ConditionalExpression,
    CallExpression,
    MemberExpression,
    Identifier,
    Literal,
    ThisExpression,
    ObjectExpression,
    Property,
    ArrayExpression,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator => "VariableDeclarator",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::LogicalExpression => "LogicalExpression",
            NodeKind::UnaryExpression => "UnaryExpression",
            NodeKind::UpdateExpression => "UpdateExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::MemberExpression => "MemberExpression",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::ObjectExpression => "ObjectExpression",
            NodeKind::Property => "Property",
            NodeKind::ArrayExpression => "ArrayExpression",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,    // -x
    Plus,   // +x
    Not,    // !x
    Typeof, // typeof x
    Void,   // void x
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
        }
    }
}

/// `++` / `--`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

/// Assignment operators; compound forms carry the binary operator they apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Compound(BinaryOp::Add) => "+=",
            AssignOp::Compound(BinaryOp::Sub) => "-=",
            AssignOp::Compound(BinaryOp::Mul) => "*=",
            AssignOp::Compound(BinaryOp::Div) => "/=",
            AssignOp::Compound(BinaryOp::Mod) => "%=",
            // The parser never builds compound comparisons
            AssignOp::Compound(_) => "=",
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// A function body shared between the tree and every closure created from it
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// One `name = init` entry of a variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub id: String,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// Object literal entry
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
    pub location: SourceLocation,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        location: SourceLocation,
    },
    FunctionDeclaration(Rc<Function>),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    Block {
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Expression {
        expression: Expr,
        location: SourceLocation,
    },
    Return {
        argument: Option<Expr>,
        location: SourceLocation,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Throw {
        argument: Expr,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            Stmt::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Stmt::If { .. } => NodeKind::IfStatement,
            Stmt::Block { .. } => NodeKind::BlockStatement,
            Stmt::Expression { .. } => NodeKind::ExpressionStatement,
            Stmt::Return { .. } => NodeKind::ReturnStatement,
            Stmt::While { .. } => NodeKind::WhileStatement,
            Stmt::DoWhile { .. } => NodeKind::DoWhileStatement,
            Stmt::For { .. } => NodeKind::ForStatement,
            Stmt::Break { .. } => NodeKind::BreakStatement,
            Stmt::Continue { .. } => NodeKind::ContinueStatement,
            Stmt::Throw { .. } => NodeKind::ThrowStatement,
            Stmt::Empty { .. } => NodeKind::EmptyStatement,
        }
    }

    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::FunctionDeclaration(function) => function.location,
            Stmt::VariableDeclaration { location, .. }
            | Stmt::If { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Expression { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::While { location, .. }
            | Stmt::DoWhile { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Throw { location, .. }
            | Stmt::Empty { location } => *location,
        }
    }

    /// Builds `target = value;`
    pub fn assignment(target: &str, value: Expr, location: SourceLocation) -> Self {
        Stmt::Expression {
            expression: Expr::Assignment {
                op: AssignOp::Assign,
                left: Box::new(Expr::Identifier(target.to_string(), location)),
                right: Box::new(value),
                location,
            },
            location,
        }
    }

    /// The string value of a directive such as `"use strict";`
    pub fn directive(&self) -> Option<&str> {
        match self {
            Stmt::Expression {
                expression: Expr::Literal(Literal::String(text), _),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal, SourceLocation),
    Identifier(String, SourceLocation),
    This(SourceLocation),
    Array {
        elements: Vec<Expr>,
        location: SourceLocation,
    },
    Object {
        properties: Vec<Property>,
        location: SourceLocation,
    },
    Function(Rc<Function>),
    Unary {
        op: UnaryOp,
        argument: Box<Expr>,
        location: SourceLocation,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Assignment {
        op: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Literal(..) => NodeKind::Literal,
            Expr::Identifier(..) => NodeKind::Identifier,
            Expr::This(_) => NodeKind::ThisExpression,
            Expr::Array { .. } => NodeKind::ArrayExpression,
            Expr::Object { .. } => NodeKind::ObjectExpression,
            Expr::Function(_) => NodeKind::FunctionExpression,
            Expr::Unary { .. } => NodeKind::UnaryExpression,
            Expr::Update { .. } => NodeKind::UpdateExpression,
            Expr::Binary { .. } => NodeKind::BinaryExpression,
            Expr::Logical { .. } => NodeKind::LogicalExpression,
            Expr::Assignment { .. } => NodeKind::AssignmentExpression,
            Expr::Conditional { .. } => NodeKind::ConditionalExpression,
            Expr::Call { .. } => NodeKind::CallExpression,
            Expr::Member { .. } => NodeKind::MemberExpression,
        }
    }

    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Function(function) => function.location,
            Expr::Literal(_, location) | Expr::Identifier(_, location) | Expr::This(location) => {
                *location
            }
            Expr::Array { location, .. }
            | Expr::Object { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Update { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Logical { location, .. }
            | Expr::Assignment { location, .. }
            | Expr::Conditional { location, .. }
            | Expr::Call { location, .. }
            | Expr::Member { location, .. } => *location,
        }
    }

    pub fn identifier(name: &str, location: SourceLocation) -> Self {
        Expr::Identifier(name.to_string(), location)
    }

    pub fn string(text: &str, location: SourceLocation) -> Self {
        Expr::Literal(Literal::String(text.to_string()), location)
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program {
            body,
            location: SourceLocation::new(1, 1),
        }
    }
}

/// Any tree node, used where a caller may hand over an arbitrary root
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(Program),
    Statement(Stmt),
    Expression(Expr),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Statement(stmt) => stmt.kind(),
            Node::Expression(expr) => expr.kind(),
        }
    }
}

/// Borrowed view of a node, yielded by [`NodeRef::find`]
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Statement(&'a Stmt),
    Expression(&'a Expr),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Statement(stmt) => stmt.kind(),
            NodeRef::Expression(expr) => expr.kind(),
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            NodeRef::Statement(stmt) => stmt.location(),
            NodeRef::Expression(expr) => expr.location(),
        }
    }

    /// Children visited by [`NodeRef::find`].
    ///
    /// Only expression statements, assignments, binary expressions and calls
    /// are descended into. Every other node is a leaf for traversal purposes,
    /// so matches nested inside blocks, branches, loops, functions or member
    /// expressions are not reported.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Statement(Stmt::Expression { expression, .. }) => {
                vec![NodeRef::Expression(expression)]
            }
            NodeRef::Expression(Expr::Assignment { left, right, .. })
            | NodeRef::Expression(Expr::Binary { left, right, .. }) => {
                vec![NodeRef::Expression(left), NodeRef::Expression(right)]
            }
            NodeRef::Expression(Expr::Call {
                callee, arguments, ..
            }) => {
                let mut children: Vec<NodeRef<'a>> =
                    arguments.iter().map(NodeRef::Expression).collect();
                children.push(NodeRef::Expression(callee));
                children
            }
            _ => Vec::new(),
        }
    }

    /// Walk `roots` depth-first and report every node of `kind` together with
    /// its ancestor chain (innermost first, the node itself at index 0).
    ///
    /// A matching node is not descended into.
    pub fn find<F>(roots: &'a [Stmt], kind: NodeKind, mut callback: F)
    where
        F: FnMut(NodeRef<'a>, &[NodeRef<'a>]),
    {
        fn check<'a, F>(node: NodeRef<'a>, parents: &[NodeRef<'a>], kind: NodeKind, callback: &mut F)
        where
            F: FnMut(NodeRef<'a>, &[NodeRef<'a>]),
        {
            let mut chain = Vec::with_capacity(parents.len() + 1);
            chain.push(node);
            chain.extend_from_slice(parents);

            if node.kind() == kind {
                callback(node, &chain);
                return;
            }
            for child in node.children() {
                check(child, &chain, kind, callback);
            }
        }

        for stmt in roots {
            check(NodeRef::Statement(stmt), &[], kind, &mut callback);
        }
    }
}
