//! Built-in global bindings
//!
//! This module installs the globals every engine starts with:
//!
//! - `console.log(...values)`: appends one line to the captured [`Console`](crate::console::Console)
//! - `eval(source)`: evaluates `source` as a script; a direct call through the
//!   name `eval` runs in the caller's scope (see [`expressions`](super::expressions)),
//!   every other call runs in the global scope
//! - `undefined`, `NaN`, `Infinity`
//!
//! All built-ins share the [`NativeCall`](crate::memory::value::NativeCall) signature.

use crate::interpreter::constants::{CONSOLE_NAME, EVAL_NAME};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Object, ScopeRef, Value};
use crate::parser::ast::SourceLocation;
use std::rc::Rc;
use tracing::trace;

impl Interpreter {
    pub(crate) fn install_globals(global: &ScopeRef) {
        let mut console = Object::new();
        console.set("log", Value::native("log", builtin_console_log));

        let mut scope = global.borrow_mut();
        scope.define(CONSOLE_NAME, Value::object(console));
        scope.define(EVAL_NAME, Value::native(EVAL_NAME, builtin_eval));
        scope.define("undefined", Value::Undefined);
        scope.define("NaN", Value::Number(f64::NAN));
        scope.define("Infinity", Value::Number(f64::INFINITY));
    }
}

fn builtin_console_log(
    interp: &mut Interpreter,
    _this: Value,
    args: Vec<Value>,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let text = args
        .iter()
        .map(Value::inspect)
        .collect::<Vec<_>>()
        .join(" ");
    trace!(line = location.line, %text, "console.log");
    interp.console_mut().log(text, location);
    Ok(Value::Undefined)
}

/// Indirect `eval`: always the global scope
fn builtin_eval(
    interp: &mut Interpreter,
    _this: Value,
    args: Vec<Value>,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let global = Rc::clone(interp.global());
    interp.with_scope(global, |interp| interp.direct_eval(args, location))
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::memory::Value;

    #[test]
    fn test_console_log_captures_output() {
        let mut interp = Interpreter::new();
        interp
            .run("console.log('a', 1, [2, 'x'], { k: true }); console.log();")
            .unwrap();

        assert_eq!(interp.console().get_output(), vec!["a 1 [2, 'x'] { k: true }", ""]);
        assert_eq!(interp.console().lines[0].location.line, 1);
    }

    #[test]
    fn test_global_constants() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.run("undefined;").unwrap(), Value::Undefined);
        assert_eq!(interp.run("Infinity > 1e300;").unwrap(), Value::Boolean(true));
        assert_eq!(interp.run("NaN === NaN;").unwrap(), Value::Boolean(false));
    }
}
