//! Per-element array validation.

use serde_json::Value;
use snapcheck_core::SnapError;

use crate::context::Context;
use crate::engine::ValidationEngine;

/// Validate every element against `items`. Without `items` any element is accepted.
pub(super) fn validate(ctx: &mut Context<'_>, engine: &ValidationEngine) -> Result<(), SnapError> {
    let (value, schema) = (ctx.data, ctx.schema);
    let (Value::Array(elements), Some(items)) = (value, schema.items.as_deref()) else {
        return Ok(());
    };

    for (index, element) in elements.iter().enumerate() {
        let mut child = ctx.for_index(index, element, items);
        engine.validate_node(&mut child)?;
        ctx.errors.append(&mut child.errors);
    }
    Ok(())
}
