//! JavaScript source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser state, helpers and the program entry point
//! - [`ast`]: AST node definitions and the node-kind registry
//!
//! # Supported Subset
//!
//! - Declarations: `var` (with multiple declarators), function declarations
//!   and expressions
//! - Statements: `if`/`else`, `while`, `do`/`while`, `for`, `return`,
//!   `break`, `continue`, `throw`, blocks, expression statements
//! - Expressions: arithmetic, comparison, logical, conditional, assignment,
//!   update, calls, member access, array and object literals
//! - Automatic semicolon insertion at line breaks, before `}` and at the end
//!   of input
//! - No `let`/`const`, classes, `new`, regular expression literals or
//!   template strings
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one function per precedence level.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use parse::{ParseError, Parser};
