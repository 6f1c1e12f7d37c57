//! # Content Digest — Snapshot Integrity Hashes
//!
//! Defines `ContentDigest`, the SHA-256 digest of a value's canonical bytes.
//! The lowercase hex form is what a snapshot record stores in its `hash`
//! field and what the store recomputes on every integrity check.
//!
//! ## Integrity Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`, ensuring that
//! every stored hash is produced through the JCS canonicalization pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// A SHA-256 content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest { bytes }
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Content hash of a snapshot value, as stored in a record's `hash` field.
///
/// Hashes `CanonicalBytes::with_number_kinds()`, so `1` and `1.0` differ.
pub fn content_hash(value: &Value) -> Result<String, CanonicalizationError> {
    let canonical = CanonicalBytes::with_number_kinds(value)?;
    Ok(sha256_hex(&canonical))
}
