//! # Schema Inference
//!
//! Derives a [`Schema`] from a concrete value. The function is total over
//! the value domain.
//!
//! - mapping → `object` with one property per key and every key required,
//!   in the mapping's insertion order;
//! - sequence → `array` whose `items` is inferred from the first element
//!   only (an empty sequence gets the unconstrained `{}`);
//! - scalars map to their type, with integral numbers as `integer` and all
//!   other numbers as `number`.
//!
//! Inferring `items` from the first element alone leaves heterogeneous
//! lists under-constrained: only values shaped like the first element are
//! rejected elsewhere in the list.

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::{Schema, SchemaType};

/// Infer the structural schema of `value`.
pub fn generate(value: &Value) -> Schema {
    match value {
        Value::Object(map) => {
            let properties: IndexMap<String, Schema> =
                map.iter().map(|(k, v)| (k.clone(), generate(v))).collect();
            Schema {
                required: Some(map.keys().cloned().collect()),
                properties: Some(properties),
                ..Schema::of(SchemaType::Object)
            }
        }
        Value::Array(items) => Schema {
            items: Some(Box::new(items.first().map(generate).unwrap_or_default())),
            ..Schema::of(SchemaType::Array)
        },
        Value::String(_) => Schema::of(SchemaType::String),
        Value::Number(n) if n.is_i64() || n.is_u64() => Schema::of(SchemaType::Integer),
        Value::Number(_) => Schema::of(SchemaType::Number),
        Value::Bool(_) => Schema::of(SchemaType::Boolean),
        Value::Null => Schema::of(SchemaType::Null),
    }
}
