//! Lexical environments
//!
//! - [`Scope`]: the bindings of one function activation (or the global scope)
//! - [`ScopeRef`]: shared handle; closures keep their defining scope alive
//!
//! Scopes are function-scoped: blocks do not open a new scope, so a `var`
//! anywhere in a function body lands in the function's scope. Each scope also
//! records the `this` value of the activation that created it.
//!
//! Bindings are kept in declaration order for display, the same way a stack
//! frame tracks the insertion order of its locals.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type ScopeRef = Rc<RefCell<Scope>>;

#[derive(Debug)]
pub struct Scope {
    /// Function name, `"global"` for the outermost scope
    pub name: String,
    vars: FxHashMap<String, Value>,
    insertion_order: Vec<String>,
    parent: Option<ScopeRef>,
    this: Value,
}

impl Scope {
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            name: "global".to_string(),
            vars: FxHashMap::default(),
            insertion_order: Vec::new(),
            parent: None,
            this: Value::Undefined,
        }))
    }

    /// Create the scope of a function activation nested in `parent`
    pub fn child(parent: &ScopeRef, name: &str, this: Value) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            name: name.to_string(),
            vars: FxHashMap::default(),
            insertion_order: Vec::new(),
            parent: Some(Rc::clone(parent)),
            this,
        }))
    }

    /// Declare `name` as `undefined` unless it is already bound here
    pub fn declare(&mut self, name: &str) {
        if !self.vars.contains_key(name) {
            self.define(name, Value::Undefined);
        }
    }

    /// Bind `name` in this scope, overwriting any existing binding
    pub fn define(&mut self, name: &str, value: Value) {
        if self.vars.insert(name.to_string(), value).is_none() {
            self.insertion_order.push(name.to_string());
        }
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get_own(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn this_value(&self) -> Value {
        self.this.clone()
    }

    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    /// Bindings of this scope in declaration order
    pub fn locals(&self) -> Vec<(String, Value)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.vars.get(name).map(|value| (name.clone(), value.clone())))
            .collect()
    }

    /// Resolve `name` along the scope chain
    pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
        let mut current = Rc::clone(scope);
        loop {
            let parent = {
                let borrowed = current.borrow();
                if let Some(value) = borrowed.vars.get(name) {
                    return Some(value.clone());
                }
                borrowed.parent.clone()
            };
            current = parent?;
        }
    }

    /// Overwrite the nearest binding of `name`.
    ///
    /// Returns false when no scope on the chain binds it.
    pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> bool {
        let mut current = Rc::clone(scope);
        loop {
            let parent = {
                let mut borrowed = current.borrow_mut();
                if let Some(slot) = borrowed.vars.get_mut(name) {
                    *slot = value;
                    return true;
                }
                borrowed.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The outermost scope of the chain
    pub fn root(scope: &ScopeRef) -> ScopeRef {
        let mut current = Rc::clone(scope);
        loop {
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}
