//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every runtime value
//! the script engine manipulates. Primitives are stored inline; objects, arrays
//! and closures are reference types shared through `Rc`, so two bindings that
//! hold the same object observe each other's mutations.
//!
//! # Value Types
//!
//! - [`Value::Undefined`] / [`Value::Null`]
//! - [`Value::Boolean`], [`Value::Number`] (IEEE-754 double), [`Value::String`]
//! - [`Value::Object`]: property bag with insertion-ordered keys
//! - [`Value::Array`]: growable list of values
//! - [`Value::Function`]: a closure over a lexical environment
//! - [`Value::Native`]: a built-in implemented in Rust
//!
//! # Conversions
//!
//! [`Value::is_truthy`], [`Value::to_number`] and [`Value::to_js_string`]
//! implement the ToBoolean, ToNumber and ToString conversions of the language
//! for the supported value set.

use super::object::Object;
use super::scope::ScopeRef;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Function, SourceLocation};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Nesting depth after which [`Value::inspect`] stops descending
const INSPECT_DEPTH: usize = 3;

/// Signature shared by every built-in: interpreter, `this`, arguments, call site
pub type NativeCall =
    fn(&mut Interpreter, Value, Vec<Value>, SourceLocation) -> Result<Value, RuntimeError>;

/// A built-in function
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub call: NativeCall,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A user function paired with the environment it was created in
pub struct Closure {
    pub function: Rc<Function>,
    pub scope: ScopeRef,
}

impl Closure {
    pub fn name(&self) -> &str {
        self.function.id.as_deref().unwrap_or("")
    }
}

// The captured scope usually contains the closure itself
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure({})", self.name())
    }
}

/// Runtime values in the script engine
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Object(Rc<RefCell<Object>>),
    Array(Rc<RefCell<Vec<Value>>>),
    Function(Rc<Closure>),
    Native(NativeFunction),
}

impl Value {
    pub fn string(text: &str) -> Self {
        Value::String(Rc::from(text))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn native(name: &'static str, call: NativeCall) -> Self {
        Value::Native(NativeFunction { name, call })
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    /// Get the number, returns None if not a Number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string slice, returns None if not a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// ToBoolean
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::Native(_) => true,
        }
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) | Value::Array(_) => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }

    /// ToNumber
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(_) => parse_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) | Value::Native(_) => f64::NAN,
        }
    }

    /// ToString
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Array(elements) => elements
                .borrow()
                .iter()
                .map(|element| match element {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(closure) => format!("function {}() {{ [code] }}", closure.name()),
            Value::Native(native) => format!("function {}() {{ [native code] }}", native.name),
        }
    }

    /// Human-readable rendering used by `console.log` and the scope pane.
    ///
    /// Strings nested inside objects and arrays are quoted; a top-level string
    /// is printed as-is.
    pub fn inspect(&self) -> String {
        self.inspect_at(0)
    }

    fn inspect_at(&self, depth: usize) -> String {
        match self {
            Value::String(s) if depth > 0 => format!("'{}'", s),
            Value::Array(elements) => {
                if depth >= INSPECT_DEPTH {
                    return "[Array]".to_string();
                }
                let parts: Vec<String> = elements
                    .borrow()
                    .iter()
                    .map(|element| element.inspect_at(depth + 1))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Object(object) => {
                if depth >= INSPECT_DEPTH {
                    return "[Object]".to_string();
                }
                let object = object.borrow();
                if object.is_empty() {
                    return "{}".to_string();
                }
                let parts: Vec<String> = object
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.inspect_at(depth + 1)))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Value::Function(closure) => {
                if closure.name().is_empty() {
                    "[Function (anonymous)]".to_string()
                } else {
                    format!("[Function: {}]", closure.name())
                }
            }
            Value::Native(native) => format!("[Function: {}]", native.name),
            other => other.to_js_string(),
        }
    }
}

/// Reference types compare by identity, primitives by value (`NaN != NaN`)
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

// Objects may be cyclic, so Debug goes through the depth-limited inspector
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.inspect()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

/// Format a number the way the language's ToString does
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // Rust writes `1e21`, the language writes `1e+21`
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", n)
}

/// StringToNumber: surrounding whitespace is ignored, the empty string is 0
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            // Rust accepts "inf" and "nan", the language does not
            if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                f64::NAN
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::string(" 42 ").to_number(), 42.0);
        assert_eq!(Value::string("").to_number(), 0.0);
        assert!(Value::string("abc").to_number().is_nan());
        assert!(Value::string("inf").to_number().is_nan());
        assert_eq!(Value::string("0x1f").to_number(), 31.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::Undefined.to_number().is_nan());
        assert_eq!(Value::array(vec![Value::Number(3.0)]).to_number(), 3.0);

        assert_eq!(
            Value::array(vec![Value::Number(1.0), Value::Null, Value::string("x")]).to_js_string(),
            "1,,x"
        );
        assert_eq!(Value::object(Object::new()).to_js_string(), "[object Object]");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(Value::array(Vec::new()).is_truthy());
    }

    #[test]
    fn test_inspect_quotes_nested_strings() {
        let mut object = Object::new();
        object.set("name", Value::string("a"));
        object.set("list", Value::array(vec![Value::Number(1.0), Value::string("b")]));
        let value = Value::object(object);

        assert_eq!(value.inspect(), "{ name: 'a', list: [1, 'b'] }");
        assert_eq!(Value::string("top").inspect(), "top");
    }

    #[test]
    fn test_reference_equality() {
        let a = Value::array(Vec::new());
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::array(Vec::new()));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }
}
