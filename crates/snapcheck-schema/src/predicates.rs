//! # Built-in Predicates
//!
//! Predicates shipped with the engine and registered by
//! [`ValidationEngine::with_builtin_rules`]:
//!
//! | Name | Arguments | Passes when |
//! |------|-----------|-------------|
//! | `schema-only` | none | always |
//! | `regex` | `pattern` | string data matches `pattern` at its start |
//! | `date-order` | `date_key_names`, `date_format` | the second date is strictly after the first |

use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use serde_json::Value;

use crate::context::Context;
use crate::engine::ValidationEngine;
use crate::pattern::Pattern;

/// Default `date_format` for `date-order`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Register every built-in predicate on `engine`.
pub fn register_builtin_rules(engine: &mut ValidationEngine) {
    engine.register_rule("schema-only", schema_only);
    engine.register_rule("regex", regex);
    engine.register_rule("date-order", date_order);
}

/// Marker rule for schemas that only want structural validation.
pub fn schema_only(ctx: &mut Context<'_>) {
    ctx.approve();
}

/// Start-anchored regex match of string data against the `pattern` arg.
pub fn regex(ctx: &mut Context<'_>) {
    let Some(pattern) = ctx.arg_str("pattern").map(Pattern::new) else {
        ctx.reprove("regex rule requires a string 'pattern' argument");
        return;
    };
    let data = ctx.data;
    let Value::String(s) = data else {
        ctx.reprove(format!("regex rule expects a string, found {data}"));
        return;
    };
    match pattern.matches_at_start(s) {
        Ok(true) => ctx.approve(),
        Ok(false) => ctx.reprove(format!("value '{s}' does not match pattern '{pattern}'")),
        Err(e) => ctx.reprove(format!("invalid pattern '{pattern}': {e}")),
    }
}

/// Require `data[end]` to be strictly after `data[start]`, where
/// `date_key_names = [start, end]`.
pub fn date_order(ctx: &mut Context<'_>) {
    let keys: Option<Vec<String>> = ctx.arg("date_key_names").and_then(|v| {
        v.as_array()?
            .iter()
            .map(|k| k.as_str().map(str::to_owned))
            .collect()
    });
    let (start_key, end_key) = match keys.as_deref() {
        Some([start, end]) => (start.clone(), end.clone()),
        _ => {
            ctx.reprove("date-order rule requires 'date_key_names' with exactly two keys");
            return;
        }
    };
    let format = ctx
        .arg_str("date_format")
        .unwrap_or(DEFAULT_DATE_FORMAT)
        .to_owned();

    let data = ctx.data;
    let start = data.get(&start_key).and_then(Value::as_str);
    let end = data.get(&end_key).and_then(Value::as_str);
    let (Some(start), Some(end)) = (start, end) else {
        ctx.reprove(format!("dates '{start_key}' and '{end_key}' must both be present"));
        return;
    };

    match (parse_date(start, &format), parse_date(end, &format)) {
        (Ok(s), Ok(e)) if e <= s => {
            ctx.reprove(format!("date '{end}' is not after date '{start}'"));
        }
        (Ok(_), Ok(_)) => ctx.approve(),
        (Err(e), _) | (_, Err(e)) => ctx.reprove(format!("failed to parse dates: {e}")),
    }
}

/// Parse with `format`, accepting date-only formats as midnight.
fn parse_date(s: &str, format: &str) -> Result<NaiveDateTime, ParseError> {
    match NaiveDateTime::parse_from_str(s, format) {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            NaiveDate::parse_from_str(s, format).map(|d| d.and_time(NaiveTime::MIN))
        }
        other => other,
    }
}
