//! Syntax tree transformation pipeline
//!
//! [`Ast`] holds the parsed body of the function being stepped and rewrites
//! it in two passes:
//! - [`hoist`]: declarations move to the head of the body
//! - [`linearize`] + [`synthesize`]: the remaining statements become step
//!   closures returned from the body together with an evaluator
//!
//! ```text
//! "use strict";            prologue (never moved, never a step)
//! var a, b;                hoisted declarations
//! function helper() {}     hoisted functions
//! return {                 artifact
//!     evaluator: ...,
//!     statementWrappers: [...]
//! };
//! ```

mod errors;
pub mod hoist;
pub mod linearize;
pub mod synthesize;

pub use errors::TransformError;
pub use linearize::{Instruction, Step};

use crate::codegen::Generator;
use crate::parser::ast::*;
use crate::pragma::{Pragma, PragmaList};
use regex::Regex;
use tracing::debug;

const USE_STRICT_PATTERN: &str = "^use strict$";

/// A function body under transformation
#[derive(Debug, Clone, Default)]
pub struct Ast {
    generator: Generator,
    syntax: Option<Program>,
}

impl Ast {
    pub fn new(generator: Generator) -> Self {
        Ast {
            generator,
            syntax: None,
        }
    }

    /// Load a parsed tree. The root must be a `Program`.
    pub fn parse_syntax(&mut self, root: Option<Node>) -> Result<(), TransformError> {
        match root {
            Some(Node::Program(program)) => {
                self.syntax = Some(program);
                Ok(())
            }
            Some(other) => Err(TransformError::InvalidSyntaxRoot {
                found: other.kind().to_string(),
            }),
            None => Err(TransformError::InvalidSyntaxRoot {
                found: "nothing".to_string(),
            }),
        }
    }

    pub fn syntax(&self) -> Option<&Program> {
        self.syntax.as_ref()
    }

    fn program(&self) -> Result<&Program, TransformError> {
        self.syntax.as_ref().ok_or(TransformError::MissingSyntax)
    }

    /// Report every node of `kind` reachable through the body, expression
    /// statements, assignments, binary expressions and calls. See
    /// [`NodeRef::children`] for what is not descended into.
    pub fn find<'a, F>(&'a self, kind: NodeKind, callback: F) -> Result<(), TransformError>
    where
        F: FnMut(NodeRef<'a>, &[NodeRef<'a>]),
    {
        NodeRef::find(&self.program()?.body, kind, callback);
        Ok(())
    }

    /// Render the current tree
    pub fn generate(&self) -> Result<String, TransformError> {
        Ok(self.generator.generate(self.program()?))
    }

    /// Directives of the prologue, in order
    pub fn pragmas(&self) -> Result<PragmaList, TransformError> {
        let mut pragmas = PragmaList::new();
        for text in prologue(&self.program()?.body) {
            pragmas.add(Pragma::from_text(text));
        }
        Ok(pragmas)
    }

    pub fn use_strict_pragma(&self) -> Result<Option<Pragma>, TransformError> {
        let pattern = Regex::new(USE_STRICT_PATTERN)?;
        Ok(self.pragmas()?.find(&pattern).first().cloned())
    }

    /// Move declarations to the head of the body, after the prologue
    pub fn prehoist(&mut self) -> Result<(), TransformError> {
        let prologue_len = self.pragmas()?.len();
        let program = self.syntax.as_mut().ok_or(TransformError::MissingSyntax)?;
        let body = std::mem::take(&mut program.body);
        program.body = hoist::prehoist(body, prologue_len);
        Ok(())
    }

    /// Replace everything past the declaration preamble with the artifact
    /// `return` and hand back the steps it was built from
    pub fn wrap_statements(&mut self) -> Result<Vec<Step>, TransformError> {
        let prologue_len = self.pragmas()?.len();
        let program = self.syntax.as_mut().ok_or(TransformError::MissingSyntax)?;

        let body = std::mem::take(&mut program.body);
        let preamble_len = prologue_len
            + body[prologue_len..]
                .iter()
                .take_while(|stmt| {
                    matches!(
                        stmt,
                        Stmt::VariableDeclaration { .. } | Stmt::FunctionDeclaration(_)
                    )
                })
                .count();

        let location = body
            .last()
            .map(Stmt::location)
            .unwrap_or_else(|| SourceLocation::new(1, 1));
        let mut statements = body.into_iter();
        let mut wrapped: Vec<Stmt> = statements.by_ref().take(preamble_len).collect();

        let steps = linearize::linearize(statements.collect());
        wrapped.push(synthesize::synthesize(&steps, location));
        debug!(
            preamble = preamble_len,
            steps = steps.len(),
            "wrapped statements"
        );

        program.body = wrapped;
        Ok(steps)
    }
}

/// Leading directive texts of `body`
fn prologue(body: &[Stmt]) -> impl Iterator<Item = &str> {
    body.iter().map_while(Stmt::directive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn ast(source: &str) -> Ast {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut ast = Ast::new(Generator::new(2));
        ast.parse_syntax(Some(Node::Program(program))).unwrap();
        ast
    }

    #[test]
    fn test_parse_syntax_rejects_non_program_roots() {
        let mut ast = Ast::default();
        let err = ast.parse_syntax(None).unwrap_err();
        assert!(matches!(err, TransformError::InvalidSyntaxRoot { .. }));

        let stmt = Stmt::Empty {
            location: SourceLocation::new(1, 1),
        };
        let err = ast.parse_syntax(Some(Node::Statement(stmt))).unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidSyntaxRoot {
                found: "EmptyStatement".to_string()
            }
        );
        assert!(ast.syntax().is_none());
    }

    #[test]
    fn test_operations_need_syntax() {
        let mut ast = Ast::default();
        assert_eq!(ast.generate().unwrap_err(), TransformError::MissingSyntax);
        assert_eq!(ast.prehoist().unwrap_err(), TransformError::MissingSyntax);
        assert_eq!(ast.wrap_statements().unwrap_err(), TransformError::MissingSyntax);
    }

    #[test]
    fn test_pragmas_come_from_the_prologue_only() {
        let ast = ast("\"use strict\";\n\"custom\";\nx = 1;\n\"late\";");
        let pragmas = ast.pragmas().unwrap();
        let texts: Vec<&str> = pragmas.iter().map(Pragma::text).collect();
        assert_eq!(texts, vec!["use strict", "custom"]);
        assert_eq!(
            ast.use_strict_pragma().unwrap(),
            Some(Pragma::from_text("use strict"))
        );

        assert_eq!(self::ast("x = 1;").use_strict_pragma().unwrap(), None);
    }

    #[test]
    fn test_find_reports_ancestors() {
        let ast = ast("a = b + c;\nf(d);\nif (e) { g; }");
        let mut found = Vec::new();
        ast.find(NodeKind::Identifier, |node, parents| {
            if let NodeRef::Expression(Expr::Identifier(name, _)) = node {
                found.push((name.clone(), parents.len()));
            }
        })
        .unwrap();
        // `e` and `g` sit under an if statement, which is not descended into
        assert_eq!(
            found,
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 4),
                ("c".to_string(), 4),
                ("d".to_string(), 3),
                ("f".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_wrap_keeps_preamble() {
        let mut ast = ast("\"use strict\";\nvar a = 1;\nfunction f() {}\nif (a) { a = 2; }");
        ast.prehoist().unwrap();
        let steps = ast.wrap_statements().unwrap();
        assert_eq!(steps.len(), 3);

        let body = &ast.syntax().unwrap().body;
        assert_eq!(body.len(), 4);
        assert_eq!(body[0].directive(), Some("use strict"));
        assert!(matches!(body[1], Stmt::VariableDeclaration { .. }));
        assert!(matches!(body[2], Stmt::FunctionDeclaration(_)));
        assert!(matches!(body[3], Stmt::Return { .. }));
    }

    #[test]
    fn test_generated_body() {
        let mut ast = ast("var a = 1, b;\nb = a + 1;");
        ast.prehoist().unwrap();
        ast.wrap_statements().unwrap();
        assert_eq!(
            ast.generate().unwrap(),
            "var a, b;\nreturn {\n  evaluator: function (__expression__) {\n    return eval(__expression__);\n  },\n  statementWrappers: [\n    function () {\n      a = 1;\n    },\n    function () {\n      b = a + 1;\n    }\n  ]\n};\n"
        );
    }
}
