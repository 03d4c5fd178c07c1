//! # Introduction
//!
//! jstep walks a JavaScript function one top-level statement at a time. The
//! function body is rewritten so every statement runs inside its own closure
//! over the function's scope; a driver then runs, repeats or skips those
//! closures by position and evaluates expressions against the live scope.
//!
//! ## Pipeline
//!
//! ```text
//! Function text → Parser → AST → Hoist → Linearize → Synthesize → Codegen
//!               → Interpreter::compile → call → Stepper (step/back/forward/evaluate)
//! ```
//!
//! 1. [`parser`]: tokenises the body and builds an AST.
//! 2. [`transform`]: hoists declarations, splits top-level `if`s into
//!    steps with jumps and appends the `{ evaluator, statementWrappers }`
//!    return.
//! 3. [`codegen`]: renders the transformed tree back to source text.
//! 4. [`interpreter`]: tree-walking engine that compiles and runs the
//!    rendered text; [`memory`] holds its values and scopes and [`console`]
//!    captures `console.log`.
//! 5. [`stepper`]: the step driver.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported subset
//!
//! `var` and function declarations, `if/else`, `while`, `do-while`, `for`,
//! `break`, `continue`, `return`, `throw`, the usual operators, calls,
//! member access, object and array literals, `console.log` and `eval`.
//! Only top-level statements and single-level `if/else` are stepped; loops
//! and nested blocks run as one step.

pub mod codegen;
pub mod console;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod pragma;
pub mod stepper;
pub mod transform;
pub mod ui;
