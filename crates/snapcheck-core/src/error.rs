//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout snapcheck. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Configuration errors (unknown schema type, unregistered rule, unknown
//!   format) are caller bugs and always fatal.
//! - Corruption errors carry both the stored and the recomputed hash. A
//!   corrupted record is never repaired.
//! - Validation errors are aggregated across the whole value tree, so a
//!   single failure reports every mismatch at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for snapcheck.
#[derive(Error, Debug)]
pub enum SnapError {
    /// Caller configuration is wrong (unknown type, rule or format).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No snapshot exists for the key and no value was supplied.
    #[error("snapshot '{name}' version '{version}' ({format}) not found")]
    NotFound {
        /// Snapshot name.
        name: String,
        /// Snapshot version tag.
        version: String,
        /// Serializer format name.
        format: String,
    },

    /// The snapshot outlived its expiration window and no replacement was supplied.
    #[error(
        "snapshot '{name}' version '{version}' expired: age {age_secs}s exceeds {expiration_secs}s \
         and no value was supplied to recreate it"
    )]
    Expired {
        /// Snapshot name.
        name: String,
        /// Snapshot version tag.
        version: String,
        /// Age of the record at load time.
        age_secs: i64,
        /// Configured expiration window.
        expiration_secs: u64,
    },

    /// The stored hash does not match the recomputed content hash.
    #[error("snapshot at {path} is corrupted: stored hash {stored} but content hashes to {computed}")]
    Corruption {
        /// File the record was loaded from.
        path: String,
        /// Hash recorded in the file.
        stored: String,
        /// Hash recomputed from the stored value.
        computed: String,
    },

    /// A value did not conform to its schema (hard validation mode).
    #[error("validation failed:\n{0}")]
    Validation(ValidationErrors),

    /// An `assert_*` check failed.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A codec could not encode or decode a record.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Canonicalization for hashing failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON or JCS serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// JCS output was not valid UTF-8.
    #[error("canonical output is not valid UTF-8")]
    InvalidUtf8,
}

/// A single validation failure at a path in the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted / bracketed path, e.g. `root.users[2].email`.
    pub path: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Build an error at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collection of validation failures from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wrap a list of errors.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}
