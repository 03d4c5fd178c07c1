//! Plain objects
//!
//! Properties live in an `FxHashMap`; a separate key list keeps insertion
//! order so objects print and enumerate the way they were built.

use super::value::Value;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct Object {
    properties: FxHashMap<String, Value>,
    keys: Vec<String>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Insert or overwrite a property; new keys go to the end
    pub fn set(&mut self, key: &str, value: Value) {
        if self.properties.insert(key.to_string(), value).is_none() {
            self.keys.push(key.to_string());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keys
            .iter()
            .filter_map(|key| self.properties.get(key).map(|value| (key.as_str(), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_overwrite() {
        let mut object = Object::new();
        object.set("b", Value::Number(1.0));
        object.set("a", Value::Number(2.0));
        object.set("b", Value::Number(3.0));

        let keys: Vec<&str> = object.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(object.get("b"), Some(&Value::Number(3.0)));
        assert_eq!(object.len(), 2);
    }
}
