//! # Validation Context
//!
//! One `Context` exists per node visited during validation. It pairs the
//! value under test with its schema and path and collects reprovals.
//! Passing is implicit: a context whose `errors` stay empty has passed.
//!
//! Predicate rules receive a side context that shares the node's data,
//! schema and path and additionally carries the rule's extra arguments.

use serde_json::{Map, Value};
use snapcheck_core::ValidationError;

use crate::schema::Schema;

/// Per-node validation state.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// The value being validated.
    pub data: &'a Value,
    /// The schema it is validated against.
    pub schema: &'a Schema,
    /// Dotted / bracketed path from the root, e.g. `root.users[2].email`.
    pub path: String,
    /// Reprovals collected at or below this node.
    pub errors: Vec<ValidationError>,
    args: Map<String, Value>,
}

impl<'a> Context<'a> {
    /// Context for a structural node.
    pub fn new(data: &'a Value, schema: &'a Schema, path: impl Into<String>) -> Self {
        Self {
            data,
            schema,
            path: path.into(),
            errors: Vec::new(),
            args: Map::new(),
        }
    }

    /// Context for the value under object key `key`.
    pub fn for_key(&self, key: &str, data: &'a Value, schema: &'a Schema) -> Self {
        Self::new(data, schema, format!("{}.{key}", self.path))
    }

    /// Context for the array element at `index`.
    pub fn for_index(&self, index: usize, data: &'a Value, schema: &'a Schema) -> Self {
        Self::new(data, schema, format!("{}[{index}]", self.path))
    }

    /// Side context for a predicate rule: same node, rule arguments attached.
    pub fn with_args(&self, args: Map<String, Value>) -> Self {
        Self {
            data: self.data,
            schema: self.schema,
            path: self.path.clone(),
            errors: Vec::new(),
            args,
        }
    }

    /// Mark the node as passing. Passing is the absence of reprovals, so
    /// this records nothing.
    pub fn approve(&self) {}

    /// Record a failure at this node's path.
    pub fn reprove(&mut self, message: impl Into<String>) {
        self.errors.push(ValidationError::new(self.path.clone(), message));
    }

    /// A rule argument by name.
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// A string rule argument by name.
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.arg(key).and_then(Value::as_str)
    }

    /// Returns true if nothing has been reproved.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_compose() {
        let data = json!({"users": [{"email": "x"}]});
        let schema = Schema::any();
        let root = Context::new(&data, &schema, "root");
        let users = root.for_key("users", &data["users"], &schema);
        let first = users.for_index(2, &data["users"][0], &schema);
        let email = first.for_key("email", &data["users"][0]["email"], &schema);
        assert_eq!(email.path, "root.users[2].email");
    }

    #[test]
    fn reprove_records_path() {
        let data = json!(1);
        let schema = Schema::any();
        let mut ctx = Context::new(&data, &schema, "root.a");
        ctx.approve();
        assert!(ctx.is_valid());
        ctx.reprove("boom");
        assert_eq!(ctx.errors, vec![ValidationError::new("root.a", "boom")]);
    }

    #[test]
    fn side_context_carries_args_not_errors() {
        let data = json!("x");
        let schema = Schema::any();
        let mut ctx = Context::new(&data, &schema, "root");
        ctx.reprove("earlier");
        let mut args = Map::new();
        args.insert("pattern".into(), json!("^x"));
        let side = ctx.with_args(args);
        assert!(side.is_valid());
        assert_eq!(side.arg_str("pattern"), Some("^x"));
        assert_eq!(side.path, "root");
    }
}
