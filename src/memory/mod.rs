//! Memory model for the script engine
//!
//! This module provides the core runtime abstractions:
//! - [`value`]: Runtime value representation and type conversions
//! - [`object`]: Insertion-ordered property bags
//! - [`scope`]: Function-scoped lexical environments shared by closures
//!
//! # Sharing
//!
//! Objects, arrays and scopes are reference counted (`Rc<RefCell<_>>`). The
//! step closures, the evaluator and the compiled function body all hold the
//! same scope, which is what lets an evaluation observe the state left by the
//! last executed step.

pub mod object;
pub mod scope;
pub mod value;

pub use object::Object;
pub use scope::{Scope, ScopeRef};
pub use value::{format_number, Closure, NativeFunction, Value};
