//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in snapshot integrity hashes.
//!
//! ## Integrity Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` or
//! `CanonicalBytes::from_value()`, both of which serialize with `serde_jcs`
//! for RFC 8785 (JSON Canonicalization Scheme) output: sorted keys, compact
//! separators, ECMAScript number formatting.
//!
//! Mapping insertion order is irrelevant to the output. A snapshot that is
//! written by one codec and read back by another (where key order may
//! differ) still hashes to the same digest.
//!
//! Floats are permitted. JCS fixes their textual form, so `1.5` always
//! canonicalizes to `1.5` and `1.0` to `1`.
//!
//! ## Number Kinds
//!
//! Because JCS writes `1.0` as `1`, plain JCS bytes cannot tell an integer
//! from an integral float, while schema validation treats the two as
//! different types. `CanonicalBytes::with_number_kinds()` closes that gap
//! for integrity hashes: when the value holds any float, the JCS text is
//! followed by a newline and one kind letter per number (`i` integer,
//! `f` float) in canonical key order. JCS output never contains a raw
//! newline, so the suffix cannot collide with document content. Values
//! without floats produce plain JCS bytes.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Object keys are sorted by UTF-16 code units (RFC 8785 §3.2.3).
/// - No insignificant whitespace.
/// - Output is valid UTF-8. It is JSON unless built by
///   `with_number_kinds()` from a value holding floats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Construct canonical bytes from an already-built value tree.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(value)?;
        Ok(Self(s.into_bytes()))
    }

    /// JCS bytes plus a number-kind line when `value` holds floats.
    ///
    /// See the module docs for the layout.
    pub fn with_number_kinds(value: &Value) -> Result<Self, CanonicalizationError> {
        let mut bytes = serde_jcs::to_string(value)?.into_bytes();
        let mut kinds = String::new();
        collect_number_kinds(value, &mut kinds);
        if kinds.contains('f') {
            bytes.push(b'\n');
            bytes.extend_from_slice(kinds.as_bytes());
        }
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the canonical text.
    pub fn as_str(&self) -> Result<&str, CanonicalizationError> {
        std::str::from_utf8(&self.0).map_err(|_| CanonicalizationError::InvalidUtf8)
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Number kinds in JCS order: object members sorted by UTF-16 code units.
fn collect_number_kinds(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => out.push(if n.is_f64() { 'f' } else { 'i' }),
        Value::Array(items) => {
            for item in items {
                collect_number_kinds(item, out);
            }
        }
        Value::Object(map) => {
            let mut members: Vec<_> = map.iter().collect();
            members.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
            for (_, member) in members {
                collect_number_kinds(member, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canon(v: &Value) -> String {
        CanonicalBytes::from_value(v)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_sorted_keys() {
        assert_eq!(canon(&json!({"z": 1, "m": 2, "a": 3})), r#"{"a":3,"m":2,"z":1}"#);
    }

    #[test]
    fn test_nested_sorted() {
        let data = json!({"outer": {"b": 2, "a": 1}, "list": [3, 2, 1]});
        assert_eq!(canon(&data), r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": [true, null]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": [true, null], "x": 1}"#).unwrap();
        assert_eq!(
            CanonicalBytes::from_value(&a).unwrap(),
            CanonicalBytes::from_value(&b).unwrap()
        );
    }

    #[test]
    fn test_floats_accepted() {
        assert_eq!(canon(&json!({"amount": 1.5})), r#"{"amount":1.5}"#);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(canon(&json!(null)), "null");
        assert_eq!(canon(&json!("hello world")), r#""hello world""#);
        assert_eq!(canon(&json!({"flag": true, "n": -42})), r#"{"flag":true,"n":-42}"#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(CanonicalBytes::new(&json!({})).unwrap().as_bytes(), b"{}");
        assert_eq!(CanonicalBytes::new(&json!([])).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn test_unicode_passthrough() {
        let s = canon(&json!({"name": "\u{00e9}\u{00e8}"}));
        assert!(s.contains('\u{00e9}'));
    }

    #[test]
    fn test_number_kinds_only_when_floats_present() {
        let ints = json!({"b": 2, "a": [1, "x"]});
        assert_eq!(
            CanonicalBytes::with_number_kinds(&ints).unwrap(),
            CanonicalBytes::from_value(&ints).unwrap()
        );
        let mixed = json!({"b": 3, "a": [1, 2.5]});
        let cb = CanonicalBytes::with_number_kinds(&mixed).unwrap();
        assert_eq!(cb.as_str().unwrap(), "{\"a\":[1,2.5],\"b\":3}\nifi");
    }

    #[test]
    fn test_number_kinds_separate_integral_float() {
        assert_eq!(canon(&json!(1.0)), canon(&json!(1)));
        assert_ne!(
            CanonicalBytes::with_number_kinds(&json!({"r": 1.0})).unwrap(),
            CanonicalBytes::with_number_kinds(&json!({"r": 1})).unwrap()
        );
    }

    #[test]
    fn test_number_kinds_follow_utf16_key_order() {
        // U+FF61 precedes U+1F600 by code point but follows its surrogate pair.
        let value = json!({"\u{1F600}": 1.0, "\u{FF61}": 2});
        let cb = CanonicalBytes::with_number_kinds(&value).unwrap();
        assert!(cb.as_str().unwrap().ends_with("\nfi"));
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 7);
    }
}
