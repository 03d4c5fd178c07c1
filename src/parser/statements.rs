//! Statement parsing implementation
//!
//! This module handles parsing of all supported statement types:
//!
//! - Declarations: `var a = 1, b;`, `function f() { ... }`
//! - Control flow: `if`/`else`, `while`, `do`/`while`, `for`
//! - Jump statements: `return`, `break`, `continue`, `throw`
//! - Compound statements: `{ ... }`
//! - Expression statements: calls, assignments, directives
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | function_decl | if_stmt | while_stmt | do_while_stmt
//!             | for_stmt | return_stmt | break_stmt | continue_stmt
//!             | throw_stmt | block | ';' | expr_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Var(loc)) {
            let declaration = self.parse_variable_declarators()?;
            self.expect_semicolon("after variable declaration")?;
            return Ok(declaration);
        }

        if self.match_token(&Token::Function(loc)) {
            return Ok(Stmt::FunctionDeclaration(self.parse_function(true)?));
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement();
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement();
        }

        if self.match_token(&Token::Do(loc)) {
            return self.parse_do_while_statement();
        }

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement();
        }

        if self.match_token(&Token::Break(loc)) {
            self.expect_semicolon("after 'break'")?;
            return Ok(Stmt::Break { location: loc });
        }

        if self.match_token(&Token::Continue(loc)) {
            self.expect_semicolon("after 'continue'")?;
            return Ok(Stmt::Continue { location: loc });
        }

        if self.match_token(&Token::Throw(loc)) {
            if self.at_line_break() {
                return self.error("Illegal newline after 'throw'".to_string());
            }
            let argument = self.parse_expression()?;
            self.expect_semicolon("after 'throw'")?;
            return Ok(Stmt::Throw {
                argument,
                location: loc,
            });
        }

        if self.match_token(&Token::LBrace(loc)) {
            let body = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(Stmt::Block {
                body,
                location: loc,
            });
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(Stmt::Empty { location: loc });
        }

        // Otherwise, it's an expression statement
        let expression = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt::Expression {
            expression,
            location: loc,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        // A line break right after `return` ends the statement
        let argument = if self.check(&Token::Semicolon(self.current_location()))
            || self.check(&Token::RBrace(self.current_location()))
            || self.is_at_end()
            || self.at_line_break()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;

        Ok(Stmt::Return {
            argument,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let test = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let consequent = Box::new(self.parse_statement()?);

        let alternate = if self.match_token(&Token::Else(self.current_location())) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let test = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            test,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        let body = Box::new(self.parse_statement()?);

        self.expect_token(
            &Token::While(self.current_location()),
            "Expected 'while' after do body",
        )?;
        self.expect_lparen("after 'while'")?;
        let test = self.parse_expression()?;
        self.expect_rparen("after do-while condition")?;
        // The semicolon after `do ... while (x)` is always optional
        self.match_token(&Token::Semicolon(self.current_location()));

        Ok(Stmt::DoWhile {
            body,
            test,
            location: loc,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'for'")?;

        let init = if self.match_token(&Token::Semicolon(self.current_location())) {
            None
        } else {
            let init_loc = self.current_location();
            let init = if self.match_token(&Token::Var(init_loc)) {
                self.parse_variable_declarators()?
            } else {
                Stmt::Expression {
                    expression: self.parse_expression()?,
                    location: init_loc,
                }
            };
            self.expect_token(
                &Token::Semicolon(self.current_location()),
                "Expected ';' after for initializer",
            )?;
            Some(Box::new(init))
        };

        let test = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after for condition",
        )?;

        let update = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("after for clauses")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            location: loc,
        })
    }
}
