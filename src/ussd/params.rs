//! Parameter bag: the only channel from the router into a leaf screen.
//!
//! Created per request, filled during traversal (captured pattern
//! parameters, the leaf flag), read by the dispatched screen, discarded
//! after the response. An explicit struct passed by reference, not values
//! smuggled through a request context.

use std::collections::HashMap;

use crate::ussd::error::UssdError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
}

#[derive(Debug, Default)]
pub struct Params {
    values: HashMap<String, Value>,
    leaf: bool,
}

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Whether the command was exhausted at a childless node. Computed by
    /// the router on every traversal, never pre-stored on the tree.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn set_leaf(&mut self, leaf: bool) {
        self.leaf = leaf;
    }

    pub fn get_str(&self, key: &str) -> Result<&str, UssdError> {
        match self.values.get(key) {
            Some(Value::Str(s)) => Ok(s),
            Some(_) => Err(UssdError::ParamTypeMismatch {
                key: key.to_string(),
                expected: "string",
            }),
            None => Err(UssdError::ParamNotFound(key.to_string())),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, UssdError> {
        match self.values.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(UssdError::ParamTypeMismatch {
                key: key.to_string(),
                expected: "bool",
            }),
            None => Err(UssdError::ParamNotFound(key.to_string())),
        }
    }

    /// Integer getter; a captured string parameter (subscriber-typed digits)
    /// is parsed on demand.
    pub fn get_i64(&self, key: &str) -> Result<i64, UssdError> {
        match self.values.get(key) {
            Some(Value::Int(n)) => Ok(*n),
            Some(Value::Str(s)) => s.parse().map_err(|_| UssdError::ParamTypeMismatch {
                key: key.to_string(),
                expected: "integer",
            }),
            Some(_) => Err(UssdError::ParamTypeMismatch {
                key: key.to_string(),
                expected: "integer",
            }),
            None => Err(UssdError::ParamNotFound(key.to_string())),
        }
    }
}
