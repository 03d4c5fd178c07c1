//! Expression rendering
//!
//! Each expression has a binding power mirroring the parser's precedence
//! levels. A child is parenthesized when it binds more loosely than its
//! position allows; for left-associative binary operators the right operand
//! must bind strictly tighter.
//!
//! ```text
//! assignment (1) < conditional (2) < || (3) < && (4) < equality (5)
//!   < relational (6) < additive (7) < multiplicative (8) < unary (9)
//!   < postfix (10) < call/member (11) < primary (12)
//! ```

use super::Printer;
use crate::memory::value::format_number;
use crate::parser::ast::*;

const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const LOGICAL_OR: u8 = 3;
const LOGICAL_AND: u8 = 4;
const EQUALITY: u8 = 5;
const RELATIONAL: u8 = 6;
const ADDITIVE: u8 = 7;
const MULTIPLICATIVE: u8 = 8;
const UNARY: u8 = 9;
const POSTFIX: u8 = 10;
const CALL_MEMBER: u8 = 11;
const PRIMARY: u8 = 12;

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe => EQUALITY,
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => RELATIONAL,
        BinaryOp::Add | BinaryOp::Sub => ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => MULTIPLICATIVE,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assignment { .. } => ASSIGNMENT,
        Expr::Conditional { .. } => CONDITIONAL,
        Expr::Logical {
            op: LogicalOp::Or, ..
        } => LOGICAL_OR,
        Expr::Logical {
            op: LogicalOp::And, ..
        } => LOGICAL_AND,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } | Expr::Update { prefix: true, .. } => UNARY,
        Expr::Update { prefix: false, .. } => POSTFIX,
        // A negative literal prints with a leading minus sign
        Expr::Literal(Literal::Number(n), _) if n.is_sign_negative() && *n != 0.0 => UNARY,
        Expr::Call { .. } | Expr::Member { .. } => CALL_MEMBER,
        Expr::Literal(..)
        | Expr::Identifier(..)
        | Expr::This(_)
        | Expr::Array { .. }
        | Expr::Object { .. }
        | Expr::Function(_) => PRIMARY,
    }
}

impl Printer {
    pub(crate) fn expression(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal, _) => self.literal(literal),

            Expr::Identifier(name, _) => self.write(name),

            Expr::This(_) => self.write("this"),

            Expr::Array { elements, .. } => self.array(elements),

            Expr::Object { properties, .. } => self.object(properties),

            Expr::Function(function) => self.function(function),

            Expr::Unary { op, argument, .. } => {
                let mut operand = Printer::new(self.indent_width);
                operand.level = self.level;
                operand.operand(argument, UNARY);

                self.write(op.as_str());
                let needs_space = match op {
                    UnaryOp::Typeof | UnaryOp::Void => true,
                    UnaryOp::Neg => operand.out.starts_with('-'),
                    UnaryOp::Plus => operand.out.starts_with('+'),
                    UnaryOp::Not => false,
                };
                if needs_space {
                    self.write(" ");
                }
                self.write(&operand.out);
            }

            Expr::Update {
                op,
                prefix,
                argument,
                ..
            } => {
                if *prefix {
                    self.write(op.as_str());
                    self.operand(argument, UNARY);
                } else {
                    self.operand(argument, POSTFIX + 1);
                    self.write(op.as_str());
                }
            }

            Expr::Binary {
                op, left, right, ..
            } => {
                let prec = binary_precedence(*op);
                self.operand(left, prec);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.operand(right, prec + 1);
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let prec = precedence(expr);
                self.operand(left, prec);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.operand(right, prec + 1);
            }

            Expr::Assignment {
                op, left, right, ..
            } => {
                self.operand(left, CALL_MEMBER);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.assignment_operand(right);
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.operand(test, LOGICAL_OR);
                self.write(" ? ");
                self.assignment_operand(consequent);
                self.write(" : ");
                self.assignment_operand(alternate);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.operand(callee, CALL_MEMBER);
                self.write("(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.assignment_operand(argument);
                }
                self.write(")");
            }

            Expr::Member {
                object,
                property,
                computed,
                ..
            } => {
                // `1.x` would lex as the number `1.` followed by `x`
                if matches!(**object, Expr::Literal(Literal::Number(_), _)) {
                    self.write("(");
                    self.expression(object);
                    self.write(")");
                } else {
                    self.operand(object, CALL_MEMBER);
                }
                if *computed {
                    self.write("[");
                    self.expression(property);
                    self.write("]");
                } else {
                    self.write(".");
                    self.expression(property);
                }
            }
        }
    }

    /// Render `expr`, parenthesized if it binds looser than `min_precedence`
    fn operand(&mut self, expr: &Expr, min_precedence: u8) {
        if precedence(expr) < min_precedence {
            self.write("(");
            self.expression(expr);
            self.write(")");
        } else {
            self.expression(expr);
        }
    }

    /// Positions that accept a full assignment expression (initializers,
    /// arguments, elements, property values)
    pub(crate) fn assignment_operand(&mut self, expr: &Expr) {
        self.operand(expr, ASSIGNMENT);
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Null => self.write("null"),
            Literal::Boolean(b) => self.write(if *b { "true" } else { "false" }),
            Literal::Number(n) => self.write(&format_number(*n)),
            Literal::String(s) => self.write(&quote(s)),
        }
    }

    /// Lists holding functions go one element per line
    fn array(&mut self, elements: &[Expr]) {
        if elements.is_empty() {
            self.write("[]");
            return;
        }
        if elements.iter().any(|element| matches!(element, Expr::Function(_))) {
            self.write("[");
            self.newline();
            self.indented(|printer| {
                for (i, element) in elements.iter().enumerate() {
                    printer.write_indent();
                    printer.assignment_operand(element);
                    if i + 1 < elements.len() {
                        printer.write(",");
                    }
                    printer.newline();
                }
            });
            self.write_indent();
            self.write("]");
            return;
        }

        self.write("[");
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.assignment_operand(element);
        }
        self.write("]");
    }

    fn object(&mut self, properties: &[Property]) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }
        let multiline = properties
            .iter()
            .any(|property| matches!(property.value, Expr::Function(_) | Expr::Array { .. }));

        if multiline {
            self.write("{");
            self.newline();
            self.indented(|printer| {
                for (i, property) in properties.iter().enumerate() {
                    printer.write_indent();
                    printer.property(property);
                    if i + 1 < properties.len() {
                        printer.write(",");
                    }
                    printer.newline();
                }
            });
            self.write_indent();
            self.write("}");
            return;
        }

        self.write("{ ");
        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.property(property);
        }
        self.write(" }");
    }

    fn property(&mut self, property: &Property) {
        if is_identifier_name(&property.key) {
            self.write(&property.key);
        } else {
            self.write(&quote(&property.key));
        }
        self.write(": ");
        self.assignment_operand(&property.value);
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Double-quoted string literal with escapes the lexer understands
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
