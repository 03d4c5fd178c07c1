use crate::interpreter::constants::MAX_ARRAY_LENGTH;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation};

impl Interpreter {
    /// Property name of a member expression: the identifier for `a.b`, the
    /// string form of the evaluated key for `a[b]`
    pub(crate) fn property_key(&mut self, property: &Expr, computed: bool) -> Result<String, RuntimeError> {
        match (property, computed) {
            (Expr::Identifier(name, _), false) => Ok(name.clone()),
            _ => Ok(self.evaluate_expression(property)?.to_js_string()),
        }
    }

    pub(crate) fn get_property(
        &self,
        object: &Value,
        key: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match object {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(
                format!("Cannot read properties of {} (reading '{}')", object.to_js_string(), key),
                location,
            )),
            Value::Object(properties) => Ok(properties.borrow().get(key).cloned().unwrap_or_default()),
            Value::Array(elements) => {
                let elements = elements.borrow();
                if key == "length" {
                    return Ok(Value::Number(elements.len() as f64));
                }
                Ok(array_index(key)
                    .and_then(|index| elements.get(index).cloned())
                    .unwrap_or_default())
            }
            Value::String(text) => {
                if key == "length" {
                    return Ok(Value::Number(text.chars().count() as f64));
                }
                Ok(array_index(key)
                    .and_then(|index| text.chars().nth(index))
                    .map(|c| Value::from(c.to_string()))
                    .unwrap_or_default())
            }
            Value::Function(closure) => Ok(match key {
                "name" => Value::string(closure.name()),
                "length" => Value::Number(closure.function.params.len() as f64),
                _ => Value::Undefined,
            }),
            Value::Native(native) => Ok(match key {
                "name" => Value::string(native.name),
                _ => Value::Undefined,
            }),
            Value::Boolean(_) | Value::Number(_) => Ok(Value::Undefined),
        }
    }

    pub(crate) fn set_property(
        &self,
        object: &Value,
        key: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match object {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(
                format!("Cannot set properties of {} (setting '{}')", object.to_js_string(), key),
                location,
            )),
            Value::Object(properties) => {
                properties.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(elements) => {
                let mut elements = elements.borrow_mut();
                if key == "length" {
                    let length = value.to_number();
                    if length < 0.0
                        || length.fract() != 0.0
                        || !length.is_finite()
                        || length > MAX_ARRAY_LENGTH as f64
                    {
                        return Err(RuntimeError::InvalidArrayLength { location });
                    }
                    elements.resize(length as usize, Value::Undefined);
                } else if let Some(index) = array_index(key) {
                    if index >= MAX_ARRAY_LENGTH {
                        return Err(RuntimeError::InvalidArrayLength { location });
                    }
                    if index >= elements.len() {
                        elements.resize(index + 1, Value::Undefined);
                    }
                    elements[index] = value;
                }
                // Named properties on arrays are not tracked
                Ok(())
            }
            // Writes to primitives and functions are dropped
            _ => Ok(()),
        }
    }
}

/// Canonical array index: digits only, no leading zeros
fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
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
    fn test_array_growth_and_length() {
        assert_eq!(run("var xs = []; xs[2] = 'c'; xs.length;").unwrap(), Value::Number(3.0));
        assert_eq!(run("var xs = [1, 2, 3]; xs.length = 1; xs[1];").unwrap(), Value::Undefined);
    }

    #[test]
    fn test_numeric_keys_on_objects() {
        assert_eq!(run("var o = { 1: 'one' }; o[1];").unwrap(), Value::string("one"));
        assert_eq!(run("var o = {}; o['k' + 1] = 2; o.k1;").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_string_access() {
        assert_eq!(run("'héllo'.length;").unwrap(), Value::Number(5.0));
        assert_eq!(run("'abc'[1];").unwrap(), Value::string("b"));
    }

    #[test]
    fn test_property_of_undefined() {
        let err = run("var u; u.x;").unwrap_err();
        assert!(err.to_string().contains("Cannot read properties of undefined (reading 'x')"));
    }

    #[test]
    fn test_array_growth_is_capped() {
        let err = run("var xs = []; xs[4294967294] = 1;").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArrayLength { .. }));
        assert!(err.to_string().starts_with("RangeError: Invalid array length"));

        let err = run("var xs = [1]; xs.length = 4e9;").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArrayLength { .. }));
        let err = run("var xs = [1]; xs.length = -1;").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArrayLength { .. }));

        // The failed write leaves the array untouched
        let mut interpreter = Interpreter::new();
        interpreter.run("var ys = [1, 2]; ys.length = 1e10;").unwrap_err();
        assert_eq!(interpreter.run("ys.length;").unwrap(), Value::Number(2.0));

        assert_eq!(
            run("var xs = []; xs[1000000] = 1; xs.length;").unwrap(),
            Value::Number(1000001.0)
        );
    }
}
