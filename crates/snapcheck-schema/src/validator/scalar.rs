//! String and numeric bound checks.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::context::Context;

/// Enforce `minLength`, `maxLength` and `pattern`.
///
/// Lengths count characters. `pattern` must match at the start of the
/// string; nothing is required of the remainder.
pub(super) fn validate_string(ctx: &mut Context<'_>) {
    let (value, schema) = (ctx.data, ctx.schema);
    let Value::String(s) = value else {
        return;
    };
    let len = s.chars().count() as u64;

    if let Some(min) = schema.min_length {
        if len < min {
            ctx.reprove(format!("string length {len} is less than minimum of {min}"));
        }
    }
    if let Some(max) = schema.max_length {
        if len > max {
            ctx.reprove(format!("string length {len} is greater than maximum of {max}"));
        }
    }
    if let Some(pattern) = &schema.pattern {
        match pattern.matches_at_start(s) {
            Ok(true) => {}
            Ok(false) => ctx.reprove(format!("string '{s}' does not match pattern '{pattern}'")),
            Err(e) => ctx.reprove(format!("invalid pattern '{pattern}': {e}")),
        }
    }
}

/// Enforce `minimum`, `maximum` and `multipleOf` for integers and numbers.
pub(super) fn validate_numeric(ctx: &mut Context<'_>) {
    let (value, schema) = (ctx.data, ctx.schema);
    let Value::Number(n) = value else {
        return;
    };

    if let Some(min) = &schema.minimum {
        if compare(n, min) == Some(Ordering::Less) {
            ctx.reprove(format!("value {n} is less than minimum of {min}"));
        }
    }
    if let Some(max) = &schema.maximum {
        if compare(n, max) == Some(Ordering::Greater) {
            ctx.reprove(format!("value {n} is greater than maximum of {max}"));
        }
    }
    if let Some(step) = &schema.multiple_of {
        match is_multiple_of(n, step) {
            Some(true) => {}
            Some(false) => ctx.reprove(format!("value {n} is not a multiple of {step}")),
            None => ctx.reprove(format!("invalid multipleOf {step}")),
        }
    }
}

fn as_i128(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison when both sides are integral, float comparison otherwise.
fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_i128(a), as_i128(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// `None` when `step` is zero. The float branch is a plain remainder test
/// and so only approximate for non-representable steps.
fn is_multiple_of(n: &Number, step: &Number) -> Option<bool> {
    if let (Some(x), Some(m)) = (as_i128(n), as_i128(step)) {
        return (m != 0).then(|| x % m == 0);
    }
    let (x, m) = (n.as_f64()?, step.as_f64()?);
    (m != 0.0).then(|| x % m == 0.0)
}
