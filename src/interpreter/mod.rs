//! Script execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Interpreter state, compilation and function calls
//! - [`statements`] / [`loops`]: Statement execution
//! - [`expressions`] / [`ops`]: Expression evaluation and operators
//! - [`builtins`]: `console.log`, `eval` and global constants
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the syntax tree directly. Every function call opens a
//! fresh [`Scope`](crate::memory::Scope) chained to the scope the callee was
//! created in, so closures created by one call keep observing and mutating
//! that call's locals after it returns.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod loops;
pub mod ops;
pub mod statements;

pub use engine::Interpreter;
pub use errors::RuntimeError;
