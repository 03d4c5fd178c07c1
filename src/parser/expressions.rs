//! Expression parsing implementation
//!
//! This module handles parsing of expressions using one recursive descent
//! function per precedence level.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, `true`/`false`, `null`
//! - Identifiers and `this`
//! - Array and object literals, function expressions
//! - Binary operators: arithmetic, comparison, (strict) equality
//! - Logical operators `&&` and `||`
//! - Unary operators: `-`, `+`, `!`, `typeof`, `void`, prefix `++`/`--`
//! - Postfix: `[]`, `.`, `()`, `++`, `--`
//! - Conditional: `? :`
//! - Assignment: `=`, `+=`, `-=`, `*=`, `/=`, `%=`
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment or conditional (right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_conditional()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::Eq(_) => AssignOp::Assign,
            Token::PlusEq(_) => AssignOp::Compound(BinaryOp::Add),
            Token::MinusEq(_) => AssignOp::Compound(BinaryOp::Sub),
            Token::StarEq(_) => AssignOp::Compound(BinaryOp::Mul),
            Token::SlashEq(_) => AssignOp::Compound(BinaryOp::Div),
            Token::PercentEq(_) => AssignOp::Compound(BinaryOp::Mod),
            _ => return Ok(target),
        };

        if !matches!(target, Expr::Identifier(..) | Expr::Member { .. }) {
            return self.error(format!("Invalid assignment target: {}", target.kind()));
        }
        self.advance();

        let right = self.parse_assignment()?;
        Ok(Expr::Assignment {
            op,
            left: Box::new(target),
            right: Box::new(right),
            location: loc,
        })
    }

    /// Parse conditional: test ? consequent : alternate
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_logical_or()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let loc = self.previous_location();
            let consequent = self.parse_assignment()?;
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' in conditional expression",
            )?;
            let alternate = self.parse_assignment()?;

            return Ok(Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
                location: loc,
            });
        }

        Ok(test)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let loc = self.previous_location();
            let right = self.parse_logical_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse equality (== != === !==)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::EqEq(_) => BinaryOp::Eq,
                Token::NotEq(_) => BinaryOp::Ne,
                Token::EqEqEq(_) => BinaryOp::StrictEq,
                Token::NotEqEq(_) => BinaryOp::StrictNe,
                _ => break,
            };
            self.advance();

            let right = self.parse_relational()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Lt(_) => BinaryOp::Lt,
                Token::Le(_) => BinaryOp::Le,
                Token::Gt(_) => BinaryOp::Gt,
                Token::Ge(_) => BinaryOp::Ge,
                _ => break,
            };
            self.advance();

            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Plus(_) => BinaryOp::Add,
                Token::Minus(_) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Star(_) => BinaryOp::Mul,
                Token::Slash(_) => BinaryOp::Div,
                Token::Percent(_) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();

            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary and prefix update operators
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = match self.peek() {
            Token::Minus(_) => Some(UnaryOp::Neg),
            Token::Plus(_) => Some(UnaryOp::Plus),
            Token::Bang(_) => Some(UnaryOp::Not),
            Token::Typeof(_) => Some(UnaryOp::Typeof),
            Token::Void(_) => Some(UnaryOp::Void),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                argument: Box::new(argument),
                location: loc,
            });
        }

        let update = match self.peek() {
            Token::PlusPlus(_) => Some(UpdateOp::Increment),
            Token::MinusMinus(_) => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let argument = self.parse_unary()?;
            self.check_update_target(&argument)?;
            return Ok(Expr::Update {
                op,
                prefix: true,
                argument: Box::new(argument),
                location: loc,
            });
        }

        self.parse_postfix()
    }

    /// Parse postfix `++`/`--` (not allowed across a line break)
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_call_member()?;

        if self.at_line_break() {
            return Ok(expr);
        }

        let loc = self.current_location();
        let op = match self.peek() {
            Token::PlusPlus(_) => UpdateOp::Increment,
            Token::MinusMinus(_) => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        self.check_update_target(&expr)?;
        self.advance();

        Ok(Expr::Update {
            op,
            prefix: false,
            argument: Box::new(expr),
            location: loc,
        })
    }

    fn check_update_target(&self, target: &Expr) -> Result<(), ParseError> {
        if matches!(target, Expr::Identifier(..) | Expr::Member { .. }) {
            Ok(())
        } else {
            self.error(format!("Invalid update target: {}", target.kind()))
        }
    }

    /// Parse calls, property access and indexing
    fn parse_call_member(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            if self.match_token(&Token::Dot(loc)) {
                let property_loc = self.current_location();
                let name = self.expect_property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(Expr::Identifier(name, property_loc)),
                    computed: false,
                    location: loc,
                };
            } else if self.match_token(&Token::LBracket(loc)) {
                let property = self.parse_expression()?;
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after index",
                )?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                    computed: true,
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let arguments = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    arguments,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments after `(`
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();

        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                arguments.push(self.parse_assignment()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after arguments")?;

        Ok(arguments)
    }

    /// Property names after `.` may be any identifier-like word, keywords included
    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let name = match self.peek() {
            Token::Ident(name, _) => name.clone(),
            other => match keyword_text(other) {
                Some(word) => word.to_string(),
                None => {
                    return self.error(format!("Expected property name, found {}", other));
                }
            },
        };
        self.advance();
        Ok(name)
    }

    /// Parse primary expressions
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::Number(n, _) => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(n), loc))
            }
            Token::String(s, _) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s), loc))
            }
            Token::True(_) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true), loc))
            }
            Token::False(_) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false), loc))
            }
            Token::Null(_) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null, loc))
            }
            Token::This(_) => {
                self.advance();
                Ok(Expr::This(loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Identifier(name, loc))
            }
            Token::Function(_) => {
                self.advance();
                Ok(Expr::Function(self.parse_function(false)?))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after parenthesized expression")?;
                Ok(expr)
            }
            Token::LBracket(_) => {
                self.advance();
                self.parse_array_literal(loc)
            }
            Token::LBrace(_) => {
                self.advance();
                self.parse_object_literal(loc)
            }
            other => self.error(format!("Unexpected {} in expression", other)),
        }
    }

    /// Parse `[a, b, c]` after the opening bracket
    fn parse_array_literal(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();

        while !self.check(&Token::RBracket(self.current_location())) {
            elements.push(self.parse_assignment()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array elements",
        )?;

        Ok(Expr::Array { elements, location })
    }

    /// Parse `{ key: value, ... }` after the opening brace
    fn parse_object_literal(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        let mut properties = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) {
            let prop_loc = self.current_location();
            let key = match self.peek_token() {
                Token::String(s, _) => {
                    self.advance();
                    s
                }
                Token::Number(n, _) => {
                    self.advance();
                    crate::memory::value::format_number(n)
                }
                _ => self.expect_property_name()?,
            };
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' after property key",
            )?;
            let value = self.parse_assignment()?;
            properties.push(Property {
                key,
                value,
                location: prop_loc,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rbrace("after object properties")?;

        Ok(Expr::Object {
            properties,
            location,
        })
    }
}

/// Source spelling of keyword tokens, for use as property names
fn keyword_text(token: &Token) -> Option<&'static str> {
    Some(match token {
        Token::Var(_) => "var",
        Token::Function(_) => "function",
        Token::If(_) => "if",
        Token::Else(_) => "else",
        Token::Return(_) => "return",
        Token::While(_) => "while",
        Token::Do(_) => "do",
        Token::For(_) => "for",
        Token::Break(_) => "break",
        Token::Continue(_) => "continue",
        Token::Throw(_) => "throw",
        Token::True(_) => "true",
        Token::False(_) => "false",
        Token::Null(_) => "null",
        Token::This(_) => "this",
        Token::Typeof(_) => "typeof",
        Token::Void(_) => "void",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn expression(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        match parser.parse_program().unwrap().body.remove(0) {
            Stmt::Expression { expression, .. } => expression,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        match expression("1 + 2 * 3;") {
            Expr::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match expression("a = b = 1;") {
            Expr::Assignment { right, .. } => {
                assert!(matches!(*right, Expr::Assignment { .. }))
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_member_and_call_chain() {
        match expression("data.items[0].push(1, 2);") {
            Expr::Call {
                callee, arguments, ..
            } => {
                assert_eq!(arguments.len(), 2);
                assert!(matches!(*callee, Expr::Member { computed: false, .. }));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_object_and_array_literals() {
        match expression("x = { a: 1, \"b c\": [1, 2], 3: null };") {
            Expr::Assignment { right, .. } => match *right {
                Expr::Object { properties, .. } => {
                    let keys: Vec<&str> = properties.iter().map(|p| p.key.as_str()).collect();
                    assert_eq!(keys, vec!["a", "b c", "3"]);
                    assert!(matches!(properties[1].value, Expr::Array { ref elements, .. } if elements.len() == 2));
                }
                other => panic!("Unexpected tree {:?}", other),
            },
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = 2;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("Invalid assignment target"));
    }

    #[test]
    fn test_update_expressions() {
        assert!(matches!(expression("i++;"), Expr::Update { prefix: false, .. }));
        assert!(matches!(expression("--i;"), Expr::Update { prefix: true, op: UpdateOp::Decrement, .. }));
    }
}
