//! # snapcheck-core — Foundational Types for snapcheck
//!
//! This crate is the leaf of the snapcheck workspace. It defines the
//! primitives every other crate builds on: the canonical byte encoding used
//! for integrity hashes, the SHA-256 content digest, UTC timestamps, a few
//! helpers over the generic [`Value`] tree, and the shared error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every integrity hash flows through
//!    `CanonicalBytes::new()`, which produces RFC 8785 (JCS) bytes with
//!    sorted object keys. Two values that are structurally equal always hash
//!    the same, regardless of mapping insertion order. Content hashes add a
//!    number-kind line so an integer and an integral float never collide.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** No code path can
//!    hash raw, non-canonical bytes by accident.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC, truncated to seconds, and
//!    renders as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! 4. **One error enum.** [`SnapError`] carries every failure kind the engine
//!    can report: configuration, not-found, expired, corruption, validation,
//!    assertion, serialization and I/O.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `snapcheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{content_hash, sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, SnapError, ValidationError, ValidationErrors};
pub use temporal::Timestamp;
pub use value::{diff_paths, value_kind};

/// The generic structured value the engine snapshots and validates.
///
/// Mapping insertion order is preserved (serde_json `preserve_order`).
pub use serde_json::Value;
