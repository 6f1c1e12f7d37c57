//! # Content Hash Test Vectors
//!
//! Fixed inputs and their expected snapshot hashes. The hash is the SHA-256
//! of the RFC 8785 canonical form, so every vector here can be reproduced
//! with any JCS implementation plus `sha256sum`:
//!
//! ```bash
//! printf '%s' '{"a":1,"b":2}' | sha256sum
//! ```
//!
//! Values holding floats append a newline and one kind letter per number
//! (`i` integer, `f` float) before hashing:
//!
//! ```bash
//! printf '{"ratio":1}\nf' | sha256sum
//! ```
//!
//! A failure here means stored snapshots written by an earlier build would
//! be reported as corrupted.

use serde_json::json;
use snapcheck_core::{content_hash, CanonicalBytes, Value};

fn vectors() -> Vec<(Value, &'static str, &'static str)> {
    vec![
        (
            json!({}),
            "{}",
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        ),
        (
            json!({"b": 2, "a": 1}),
            r#"{"a":1,"b":2}"#,
            "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777",
        ),
        (
            json!([1, "two", null, true]),
            r#"[1,"two",null,true]"#,
            "7b8032fffebbc32932bc49ec84cf4527e973466f623f05770de7f39d2b66af65",
        ),
        (
            json!({"users": [{"id": 1, "email": "a@x"}]}),
            r#"{"users":[{"email":"a@x","id":1}]}"#,
            "8a1375a24acc6895f8dccb9eba9ced5b49c278626937d02047101546395645ed",
        ),
    ]
}

fn float_vectors() -> Vec<(Value, &'static str, &'static str)> {
    vec![
        (
            json!({"ratio": 1.0}),
            "{\"ratio\":1}\nf",
            "27470866f08a10fcf5619d6a9f92cdd4d81c39aeeefc9c11f30e1064acdf4c1d",
        ),
        (
            json!(1.0),
            "1\nf",
            "c79b9d5e34c49e5dcdb7994e6871aedd2944a95d860f7751748606c35f8b79da",
        ),
        (
            json!({"b": 3, "a": [1, 2.5]}),
            "{\"a\":[1,2.5],\"b\":3}\nifi",
            "009ba709be9173c1d646c17b27f4d31cb962b05089a0e7c929796bbd72649237",
        ),
    ]
}

#[test]
fn canonical_form_matches_vectors() {
    for (value, canonical, _) in vectors() {
        let bytes = CanonicalBytes::from_value(&value).unwrap();
        assert_eq!(bytes.as_str().unwrap(), canonical);
    }
}

#[test]
fn content_hash_matches_vectors() {
    for (value, canonical, expected) in vectors() {
        assert_eq!(content_hash(&value).unwrap(), expected, "input {canonical}");
    }
}

#[test]
fn insertion_order_is_irrelevant() {
    let forward = json!({"a": {"x": 1, "y": [1, 2]}, "b": "s"});
    let reverse = json!({"b": "s", "a": {"y": [1, 2], "x": 1}});
    assert_eq!(content_hash(&forward).unwrap(), content_hash(&reverse).unwrap());
}

#[test]
fn array_order_is_significant() {
    assert_ne!(
        content_hash(&json!([1, 2])).unwrap(),
        content_hash(&json!([2, 1])).unwrap()
    );
}

#[test]
fn float_vectors_carry_number_kinds() {
    for (value, canonical, expected) in float_vectors() {
        let bytes = CanonicalBytes::with_number_kinds(&value).unwrap();
        assert_eq!(bytes.as_str().unwrap(), canonical);
        assert_eq!(content_hash(&value).unwrap(), expected, "input {canonical:?}");
    }
}

#[test]
fn integral_float_and_integer_hash_differently() {
    // Both canonicalize to `{"ratio":1}` under plain JCS.
    assert_eq!(
        CanonicalBytes::from_value(&json!({"ratio": 1.0})).unwrap(),
        CanonicalBytes::from_value(&json!({"ratio": 1})).unwrap()
    );
    assert_eq!(
        content_hash(&json!({"ratio": 1})).unwrap(),
        "2817aa8f7a13bd7b7a49821b7cbc8435bfcac318a507deb679ff55088d94b81b"
    );
    assert_ne!(
        content_hash(&json!({"ratio": 1.0})).unwrap(),
        content_hash(&json!({"ratio": 1})).unwrap()
    );
}
