use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinaryOp, SourceLocation};
use std::cmp::Ordering;

impl Interpreter {
    /// Apply a binary operator to two already evaluated operands
    pub(crate) fn binary_operation(
        op: BinaryOp,
        left: &Value,
        right: &Value,
        _location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let value = match op {
            BinaryOp::Add => add_values(left, right),
            BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
            BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
            BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
            // f64 `%` keeps the sign of the dividend, as the language requires
            BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
            BinaryOp::StrictEq => Value::Boolean(left == right),
            BinaryOp::StrictNe => Value::Boolean(left != right),
            BinaryOp::Eq => Value::Boolean(loose_equals(left, right)),
            BinaryOp::Ne => Value::Boolean(!loose_equals(left, right)),
            BinaryOp::Lt => Value::Boolean(compare(left, right) == Some(Ordering::Less)),
            BinaryOp::Gt => Value::Boolean(compare(left, right) == Some(Ordering::Greater)),
            BinaryOp::Le => Value::Boolean(matches!(
                compare(left, right),
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOp::Ge => Value::Boolean(matches!(
                compare(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            )),
        };
        Ok(value)
    }
}

/// ToPrimitive: reference types collapse to their string form
fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::Native(_) => {
            Value::from(value.to_js_string())
        }
        other => other.clone(),
    }
}

/// `+` concatenates as soon as either primitive operand is a string
#[inline]
fn add_values(left: &Value, right: &Value) -> Value {
    let left = to_primitive(left);
    let right = to_primitive(right);
    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Value::from(left.to_js_string() + &right.to_js_string())
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// Abstract equality (`==`)
fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            left.to_number() == right.to_number()
        }
        (Value::Boolean(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Boolean(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (Value::Object(_) | Value::Array(_), Value::Number(_) | Value::String(_))
        | (Value::Number(_) | Value::String(_), Value::Object(_) | Value::Array(_)) => {
            loose_equals(&to_primitive(left), &to_primitive(right))
        }
        _ => left == right,
    }
}

/// Relational comparison; `None` when either side is NaN
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let left = to_primitive(left);
    let right = to_primitive(right);
    match (&left, &right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinaryOp, left: Value, right: Value) -> Value {
        Interpreter::binary_operation(op, &left, &right, SourceLocation::default()).unwrap()
    }

    #[test]
    fn test_addition_and_concatenation() {
        assert_eq!(apply(BinaryOp::Add, Value::Number(7.0), Value::Number(1.0)), Value::Number(8.0));
        assert_eq!(apply(BinaryOp::Add, Value::string("a"), Value::Number(1.0)), Value::string("a1"));
        assert_eq!(apply(BinaryOp::Add, Value::Number(1.0), Value::Boolean(true)), Value::Number(2.0));
        assert_eq!(
            apply(BinaryOp::Add, Value::array(vec![Value::Number(1.0)]), Value::Number(2.0)),
            Value::string("12")
        );
    }

    #[test]
    fn test_loose_and_strict_equality() {
        assert_eq!(apply(BinaryOp::Eq, Value::string("1"), Value::Number(1.0)), Value::Boolean(true));
        assert_eq!(apply(BinaryOp::StrictEq, Value::string("1"), Value::Number(1.0)), Value::Boolean(false));
        assert_eq!(apply(BinaryOp::Eq, Value::Null, Value::Undefined), Value::Boolean(true));
        assert_eq!(apply(BinaryOp::Eq, Value::Null, Value::Number(0.0)), Value::Boolean(false));
        assert_eq!(apply(BinaryOp::Eq, Value::Boolean(true), Value::string("1")), Value::Boolean(true));
    }

    #[test]
    fn test_relational() {
        assert_eq!(apply(BinaryOp::Lt, Value::string("a"), Value::string("b")), Value::Boolean(true));
        assert_eq!(apply(BinaryOp::Lt, Value::string("10"), Value::Number(9.0)), Value::Boolean(false));
        assert_eq!(apply(BinaryOp::Ge, Value::Number(f64::NAN), Value::Number(1.0)), Value::Boolean(false));
    }

    #[test]
    fn test_modulo_sign() {
        assert_eq!(apply(BinaryOp::Mod, Value::Number(-7.0), Value::Number(3.0)), Value::Number(-1.0));
    }
}
