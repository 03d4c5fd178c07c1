use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{value::Value, Scope};
use crate::parser::ast::{Expr, SourceLocation, UnaryOp};

impl Interpreter {
    pub(crate) fn evaluate_unary(
        &mut self,
        op: UnaryOp,
        argument: &Expr,
        _location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // `typeof undeclared` is not an error
        if let (UnaryOp::Typeof, Expr::Identifier(name, _)) = (op, argument) {
            let value = Scope::lookup(&self.scope, name).unwrap_or_default();
            return Ok(Value::string(value.type_of()));
        }

        let value = self.evaluate_expression(argument)?;
        Ok(match op {
            UnaryOp::Neg => Value::Number(-value.to_number()),
            UnaryOp::Plus => Value::Number(value.to_number()),
            UnaryOp::Not => Value::Boolean(!value.is_truthy()),
            UnaryOp::Typeof => Value::string(value.type_of()),
            UnaryOp::Void => Value::Undefined,
        })
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
    fn test_typeof() {
        assert_eq!(run("typeof nothingHere;"), Value::string("undefined"));
        assert_eq!(run("typeof null;"), Value::string("object"));
        assert_eq!(run("typeof function () {};"), Value::string("function"));
        assert_eq!(run("typeof console.log;"), Value::string("function"));
    }

    #[test]
    fn test_negation_and_not() {
        assert_eq!(run("-'3';"), Value::Number(-3.0));
        assert_eq!(run("!'';"), Value::Boolean(true));
        assert_eq!(run("void 0;"), Value::Undefined);
    }
}
