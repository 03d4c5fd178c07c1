use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{value::Value, Scope};
use crate::parser::ast::{AssignOp, BinaryOp, Expr, SourceLocation, UpdateOp};
use std::rc::Rc;

impl Interpreter {
    /// `target = value` and the compound forms `target op= value`
    pub(crate) fn evaluate_assignment(
        &mut self,
        op: AssignOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match left {
            Expr::Identifier(name, id_location) => {
                let value = match op {
                    AssignOp::Assign => self.evaluate_expression(right)?,
                    AssignOp::Compound(binary) => {
                        let current = self.lookup_variable(name, *id_location)?;
                        let operand = self.evaluate_expression(right)?;
                        Self::binary_operation(binary, &current, &operand, location)?
                    }
                };
                self.assign_variable(name, value.clone());
                Ok(value)
            }

            Expr::Member {
                object,
                property,
                computed,
                location: member_location,
            } => {
                let target = self.evaluate_expression(object)?;
                let key = self.property_key(property, *computed)?;
                let value = match op {
                    AssignOp::Assign => self.evaluate_expression(right)?,
                    AssignOp::Compound(binary) => {
                        let current = self.get_property(&target, &key, *member_location)?;
                        let operand = self.evaluate_expression(right)?;
                        Self::binary_operation(binary, &current, &operand, location)?
                    }
                };
                self.set_property(&target, &key, value.clone(), *member_location)?;
                Ok(value)
            }

            _ => Err(RuntimeError::type_error("Invalid left-hand side in assignment", location)),
        }
    }

    /// `++x`, `x++`, `--x`, `x--`
    pub(crate) fn evaluate_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        argument: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let binary = match op {
            UpdateOp::Increment => BinaryOp::Add,
            UpdateOp::Decrement => BinaryOp::Sub,
        };

        let old = match argument {
            Expr::Identifier(name, id_location) => self.lookup_variable(name, *id_location)?,
            Expr::Member {
                object,
                property,
                computed,
                location: member_location,
            } => {
                let target = self.evaluate_expression(object)?;
                let key = self.property_key(property, *computed)?;
                let old = Value::Number(self.get_property(&target, &key, *member_location)?.to_number());
                let new = Self::binary_operation(binary, &old, &Value::Number(1.0), location)?;
                self.set_property(&target, &key, new.clone(), *member_location)?;
                return Ok(if prefix { new } else { old });
            }
            _ => {
                return Err(RuntimeError::type_error(
                    "Invalid left-hand side expression in update operation",
                    location,
                ))
            }
        };

        let old = Value::Number(old.to_number());
        let new = Self::binary_operation(binary, &old, &Value::Number(1.0), location)?;
        if let Expr::Identifier(name, _) = argument {
            self.assign_variable(name, new.clone());
        }
        Ok(if prefix { new } else { old })
    }

    /// Store into the nearest binding of `name`; an unbound name becomes a
    /// global, as in sloppy-mode scripts
    pub(crate) fn assign_variable(&mut self, name: &str, value: Value) {
        if !Scope::assign(&self.scope, name, value.clone()) {
            let global = Rc::clone(self.global());
            global.borrow_mut().define(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::memory::Value;

    fn run(source: &str) -> Value {
        Interpreter::new().run(source).unwrap()
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(run("var a = 1; a += 4; a *= 2; a;"), Value::Number(10.0));
        assert_eq!(run("var s = 'a'; s += 'b'; s;"), Value::string("ab"));
        assert_eq!(run("var o = { n: 2 }; o.n -= 5; o.n;"), Value::Number(-3.0));
    }

    #[test]
    fn test_update_prefix_and_postfix() {
        assert_eq!(run("var i = 1; var j = i++; j * 10 + i;"), Value::Number(12.0));
        assert_eq!(run("var i = 1; var j = --i; j * 10 + i;"), Value::Number(0.0));
        assert_eq!(run("var xs = [5]; xs[0]++; xs[0];"), Value::Number(6.0));
    }

    #[test]
    fn test_assignment_to_undeclared_creates_global() {
        assert_eq!(run("function f() { leaked = 3; } f(); leaked;"), Value::Number(3.0));
    }
}
