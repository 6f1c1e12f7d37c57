//! Closed-world object validation.

use serde_json::Value;
use snapcheck_core::SnapError;

use crate::context::Context;
use crate::engine::ValidationEngine;

/// Validate each declared property that is present, reprove required
/// properties that are absent, and reprove keys the schema does not declare.
pub(super) fn validate(ctx: &mut Context<'_>, engine: &ValidationEngine) -> Result<(), SnapError> {
    let (value, schema) = (ctx.data, ctx.schema);
    let Value::Object(data) = value else {
        return Ok(());
    };

    if let Some(properties) = &schema.properties {
        for (key, subschema) in properties {
            match data.get(key) {
                Some(value) => {
                    let mut child = ctx.for_key(key, value, subschema);
                    engine.validate_node(&mut child)?;
                    ctx.errors.append(&mut child.errors);
                }
                None if schema.is_required(key) => {
                    ctx.reprove(format!("required field '{key}' absent"));
                }
                None => {}
            }
        }
    }

    for key in data.keys() {
        if schema.property(key).is_none() {
            ctx.reprove(format!("unexpected field '{key}'"));
        }
    }
    Ok(())
}
