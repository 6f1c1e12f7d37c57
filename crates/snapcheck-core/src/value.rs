//! Helpers over the generic value tree.

use serde_json::Value;

/// Schema type name describing the runtime shape of a value.
///
/// Integral numbers report `integer`, all other numbers `number`.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Paths (rooted at `root`) at which `expected` and `actual` differ.
///
/// Object keys present on only one side are reported at the key's path.
/// Arrays of different length report the first index past the shorter one.
pub fn diff_paths(expected: &Value, actual: &Value) -> Vec<String> {
    let mut out = Vec::new();
    diff_into(expected, actual, "root", &mut out);
    out
}

fn diff_into(expected: &Value, actual: &Value, path: &str, out: &mut Vec<String>) {
    match (expected, actual) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, av) in a {
                let sub = format!("{path}.{key}");
                match b.get(key) {
                    Some(bv) => diff_into(av, bv, &sub, out),
                    None => out.push(sub),
                }
            }
            for key in b.keys().filter(|k| !a.contains_key(*k)) {
                out.push(format!("{path}.{key}"));
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, (av, bv)) in a.iter().zip(b).enumerate() {
                diff_into(av, bv, &format!("{path}[{i}]"), out);
            }
            if a.len() != b.len() {
                out.push(format!("{path}[{}]", a.len().min(b.len())));
            }
        }
        (a, b) if a != b => out.push(path.to_string()),
        _ => {}
    }
}
