//! Runtime error types for the script engine
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while running script code (as opposed to parse errors or stepper misuse).
//!
//! A `throw` statement surfaces as [`RuntimeError::Thrown`] carrying the thrown
//! value; the engine has no `try`/`catch`, so every runtime error unwinds to the
//! caller of the engine.

use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// Read of a name no scope binds
    #[error("ReferenceError: {name} is not defined (line {})", .location.line)]
    ReferenceError {
        name: String,
        location: SourceLocation,
    },

    /// Operation applied to a value of the wrong type
    #[error("TypeError: {message} (line {})", .location.line)]
    TypeError {
        message: String,
        location: SourceLocation,
    },

    /// Call of a value that is not a function
    #[error("TypeError: {callee} is not a function (line {})", .location.line)]
    NotCallable {
        callee: String,
        location: SourceLocation,
    },

    /// Value raised by a `throw` statement
    #[error("Uncaught {value} (line {})", .location.line)]
    Thrown {
        value: Value,
        location: SourceLocation,
    },

    /// Call depth exceeded [`MAX_CALL_DEPTH`](crate::interpreter::constants::MAX_CALL_DEPTH)
    #[error("RangeError: Maximum call stack size exceeded (line {})", .location.line)]
    StackOverflow { location: SourceLocation },

    /// Array grown past [`MAX_ARRAY_LENGTH`](crate::interpreter::constants::MAX_ARRAY_LENGTH)
    /// or given a length that is not a non-negative integer
    #[error("RangeError: Invalid array length (line {})", .location.line)]
    InvalidArrayLength { location: SourceLocation },

    /// `break`, `continue` or `return` outside of a construct that accepts it
    #[error("SyntaxError: Illegal {keyword} statement (line {})", .location.line)]
    InvalidBreak {
        keyword: &'static str,
        location: SourceLocation,
    },

    /// Source handed to `eval` did not parse
    #[error("SyntaxError: {message} (line {})", .location.line)]
    EvalSyntax {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::ReferenceError { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::NotCallable { location, .. }
            | RuntimeError::Thrown { location, .. }
            | RuntimeError::StackOverflow { location }
            | RuntimeError::InvalidArrayLength { location }
            | RuntimeError::InvalidBreak { location, .. }
            | RuntimeError::EvalSyntax { location, .. } => *location,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
            location,
        }
    }
}
