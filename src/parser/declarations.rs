//! Declaration parsing
//!
//! - `var` declarations with one or more declarators: `var a = 1, b;`
//! - Function declarations: `function name(a, b) { ... }`
//! - Function expressions: `function (a) { ... }` (the name is optional)
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use std::rc::Rc;

impl Parser {
    /// Parse the declarators after `var` (the keyword is already consumed).
    ///
    /// The trailing semicolon is left to the caller so `for (var ...;` can
    /// share this routine.
    pub(crate) fn parse_variable_declarators(&mut self) -> Result<Stmt, ParseError> {
        let location = self.previous_location();
        let mut declarations = Vec::new();

        loop {
            let decl_loc = self.current_location();
            let id = self.expect_identifier()?;
            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                id,
                init,
                location: decl_loc,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(Stmt::VariableDeclaration {
            declarations,
            location,
        })
    }

    /// Parse `function name(params) { body }` after the `function` keyword.
    ///
    /// `require_name` distinguishes declarations from expressions.
    pub(crate) fn parse_function(&mut self, require_name: bool) -> Result<Rc<Function>, ParseError> {
        let location = self.previous_location();

        let id = if matches!(self.peek(), Token::Ident(..)) {
            Some(self.expect_identifier()?)
        } else if require_name {
            return self.error(format!(
                "Expected function name, found {}",
                self.peek()
            ));
        } else {
            None
        };

        self.expect_lparen("after function name")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after parameters")?;

        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok(Rc::new(Function {
            id,
            params,
            body,
            location,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    #[test]
    fn test_function_expression_without_name() {
        let mut parser = Parser::new("f = function (a) { a = 1; };").unwrap();
        let program = parser.parse_program().unwrap();

        match &program.body[0] {
            Stmt::Expression {
                expression: Expr::Assignment { right, .. },
                ..
            } => match &**right {
                Expr::Function(function) => {
                    assert!(function.id.is_none());
                    assert_eq!(function.params, vec!["a".to_string()]);
                }
                other => panic!("Expected function expression, got {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_function_declaration_requires_name() {
        let mut parser = Parser::new("function () {}").unwrap();
        assert!(parser.parse_program().is_err());
    }
}
