//! Variable frames

use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// Locals of one active function call.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    vars: HashMap<String, Value>,
    /// Names declared `global` in this call
    globals: HashSet<String>,
}

impl Frame {
    pub fn new(vars: HashMap<String, Value>) -> Self {
        Self {
            vars,
            globals: HashSet::new(),
        }
    }

    pub fn declare_global(&mut self, name: &str) {
        self.globals.insert(name.to_string());
    }

    /// Local value of `name`, unless the name was declared `global`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if self.globals.contains(name) {
            None
        } else {
            self.vars.get(name)
        }
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    pub fn has_local(&self, name: &str) -> bool {
        !self.is_global(name) && self.vars.contains_key(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// Bind `name` for a nested scope, returning whatever it shadowed.
    pub fn shadow(&mut self, name: &str, value: Value) -> Option<Value> {
        self.vars.insert(name.to_string(), value)
    }

    pub fn restore(&mut self, name: &str, previous: Option<Value>) {
        match previous {
            Some(value) => {
                self.vars.insert(name.to_string(), value);
            }
            None => {
                self.vars.remove(name);
            }
        }
    }
}
