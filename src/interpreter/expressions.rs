//! Expression evaluation implementation
//!
//! This module handles evaluation of all supported expression types:
//!
//! - Literals, identifiers and `this`
//! - Array, object and function literals
//! - Short-circuiting logical operators and the conditional operator
//! - Function and method calls, including direct `eval`
//!
//! Operators live in the [`ops`](super::ops) submodules: arithmetic and
//! comparison in `binary`, prefix operators in `unary`, assignment and update
//! in `assign`, property reads and writes in `access`.
//!
//! # Direct eval
//!
//! A call whose callee is the bare identifier `eval` and which resolves to the
//! built-in evaluates its argument in the *current* scope, so it can read and
//! write the caller's locals. Any other way of reaching the built-in (an alias,
//! a property access) evaluates in the global scope.

use crate::interpreter::constants::EVAL_NAME;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Object, Scope, Value};
use crate::parser::ast::*;

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal, _) => Ok(match literal {
                Literal::Null => Value::Null,
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::string(s),
            }),

            Expr::Identifier(name, location) => self.lookup_variable(name, *location),

            Expr::This(_) => Ok(self.scope.borrow().this_value()),

            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate_expression(element)?);
                }
                Ok(Value::array(values))
            }

            Expr::Object { properties, .. } => {
                let mut object = Object::new();
                for property in properties {
                    let value = self.evaluate_expression(&property.value)?;
                    object.set(&property.key, value);
                }
                Ok(Value::object(object))
            }

            Expr::Function(function) => Ok(self.make_closure(function)),

            Expr::Unary {
                op,
                argument,
                location,
            } => self.evaluate_unary(*op, argument, *location),

            Expr::Update {
                op,
                prefix,
                argument,
                location,
            } => self.evaluate_update(*op, *prefix, argument, *location),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate_expression(left)?;
                let right = self.evaluate_expression(right)?;
                Self::binary_operation(*op, &left, &right, *location)
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.evaluate_expression(left)?;
                match op {
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    _ => self.evaluate_expression(right),
                }
            }

            Expr::Assignment {
                op,
                left,
                right,
                location,
            } => self.evaluate_assignment(*op, left, right, *location),

            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate_expression(test)?.is_truthy() {
                    self.evaluate_expression(consequent)
                } else {
                    self.evaluate_expression(alternate)
                }
            }

            Expr::Call {
                callee,
                arguments,
                location,
            } => self.evaluate_call(callee, arguments, *location),

            Expr::Member {
                object,
                property,
                computed,
                location,
            } => {
                let object = self.evaluate_expression(object)?;
                let key = self.property_key(property, *computed)?;
                self.get_property(&object, &key, *location)
            }
        }
    }

    /// Resolve a name along the current scope chain
    pub(crate) fn lookup_variable(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        Scope::lookup(&self.scope, name).ok_or_else(|| RuntimeError::ReferenceError {
            name: name.to_string(),
            location,
        })
    }

    fn evaluate_arguments(&mut self, arguments: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate_expression(argument)?);
        }
        Ok(values)
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        arguments: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // Method calls bind `this` to the receiver
        let (function, this) = match callee {
            Expr::Member {
                object,
                property,
                computed,
                location: member_location,
            } => {
                let receiver = self.evaluate_expression(object)?;
                let key = self.property_key(property, *computed)?;
                let function = self.get_property(&receiver, &key, *member_location)?;
                (function, receiver)
            }
            _ => (self.evaluate_expression(callee)?, Value::Undefined),
        };

        let args = self.evaluate_arguments(arguments)?;

        if !function.is_callable() {
            return Err(RuntimeError::NotCallable {
                callee: describe_callee(callee),
                location,
            });
        }

        if let (Expr::Identifier(name, _), Value::Native(native)) = (callee, &function) {
            if name == EVAL_NAME && native.name == EVAL_NAME {
                return self.direct_eval(args, location);
            }
        }

        self.call_function(&function, this, args, location)
    }

    /// `eval(source)` in the current scope; non-string arguments are returned as-is
    pub(crate) fn direct_eval(
        &mut self,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match args.into_iter().next() {
            Some(Value::String(source)) => {
                let saved_location = self.current_location;
                let result = self.eval_source(&source, location);
                self.current_location = saved_location;
                result
            }
            Some(other) => Ok(other),
            None => Ok(Value::Undefined),
        }
    }
}

/// Source-like description of a callee for error messages
fn describe_callee(callee: &Expr) -> String {
    match callee {
        Expr::Identifier(name, _) => name.clone(),
        Expr::Member {
            object,
            property,
            computed: false,
            ..
        } => match &**property {
            Expr::Identifier(name, _) => format!("{}.{}", describe_callee(object), name),
            _ => "expression".to_string(),
        },
        Expr::This(_) => "this".to_string(),
        _ => "expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::interpreter::errors::RuntimeError;
    use crate::memory::Value;

    fn run(source: &str) -> Result<Value, RuntimeError> {
        Interpreter::new().run(source)
    }

    #[test]
    fn test_logical_short_circuit() {
        assert_eq!(run("var hit = 0; false && (hit = 1); hit;").unwrap(), Value::Number(0.0));
        assert_eq!(run("null || 'fallback';").unwrap(), Value::string("fallback"));
        assert_eq!(run("0 && 'never';").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_method_call_binds_this() {
        let source = "
            var counter = { n: 1, bump: function () { this.n = this.n + 1; return this.n; } };
            counter.bump();
            counter.bump();
        ";
        assert_eq!(run(source).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_direct_eval_sees_locals() {
        let source = "
            function f() {
                var a = 7;
                return eval('a + 1');
            }
            f();
        ";
        assert_eq!(run(source).unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_direct_eval_declares_in_current_scope() {
        let source = "
            function f() {
                eval('var b = 2;');
                return b;
            }
            f();
        ";
        assert_eq!(run(source).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_indirect_eval_uses_global_scope() {
        let source = "
            var a = 'global';
            function f() {
                var a = 'local';
                var e = eval;
                return e('a');
            }
            f();
        ";
        assert_eq!(run(source).unwrap(), Value::string("global"));
    }

    #[test]
    fn test_eval_syntax_error() {
        let err = run("eval('var = 1');").unwrap_err();
        assert!(matches!(err, RuntimeError::EvalSyntax { .. }));
    }

    #[test]
    fn test_eval_passes_non_strings_through() {
        assert_eq!(run("eval(5);").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_undefined_variable_and_bad_call() {
        assert!(matches!(
            run("missing;").unwrap_err(),
            RuntimeError::ReferenceError { ref name, .. } if name == "missing"
        ));
        assert!(matches!(
            run("var o = {}; o.go();").unwrap_err(),
            RuntimeError::NotCallable { ref callee, .. } if callee == "o.go"
        ));
    }

    #[test]
    fn test_conditional_and_arrays() {
        assert_eq!(run("var xs = [1, 2, 3]; xs.length > 2 ? xs[1] : -1;").unwrap(), Value::Number(2.0));
    }
}
