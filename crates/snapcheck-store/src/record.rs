//! # Snapshot Record
//!
//! The persisted unit: a value, the schema inferred from it, its content
//! hash, a version tag, timestamps and free-form metadata. One record is
//! stored per `(name, version, format)` file.
//!
//! ## Invariants
//!
//! - `hash == content_hash(&snapshot)` at write time. A mismatch on read is
//!   corruption and is never repaired.
//! - `created_at <= last_access`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snapcheck_core::{content_hash, SnapError, Timestamp, Value};
use snapcheck_schema::{generate, Schema};

/// A persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Schema inferred from `snapshot` at creation time.
    pub schema: Schema,
    /// The stored value.
    pub snapshot: Value,
    /// Lowercase hex SHA-256 of the canonical bytes of `snapshot`.
    pub hash: String,
    /// Version tag (part of the file name).
    pub version: String,
    /// When the record was (re)created.
    pub created_at: Timestamp,
    /// When the record was last read through `get_or_create_snapshot`.
    pub last_access: Timestamp,
    /// Caller-supplied annotations.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl SnapshotRecord {
    /// Build a fresh record for `value`: infer its schema, hash it and stamp
    /// both timestamps with the current time.
    pub fn new(
        value: Value,
        version: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, SnapError> {
        let now = Timestamp::now();
        Ok(Self {
            schema: generate(&value),
            hash: content_hash(&value)?,
            snapshot: value,
            version: version.into(),
            created_at: now,
            last_access: now,
            metadata,
        })
    }

    /// Recompute the content hash of `snapshot`.
    pub fn computed_hash(&self) -> Result<String, SnapError> {
        Ok(content_hash(&self.snapshot)?)
    }

    /// Whether the stored hash matches the stored value.
    pub fn is_intact(&self) -> Result<bool, SnapError> {
        Ok(self.computed_hash()? == self.hash)
    }

    /// Seconds elapsed since creation, measured at `now`.
    pub fn age_secs(&self, now: &Timestamp) -> i64 {
        now.seconds_since(&self.created_at)
    }

    /// Set `last_access` to `now`, never moving it before `created_at`.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_access = now.max(self.created_at);
    }
}

/// Binary-codec mirror of [`SnapshotRecord`] with timestamps as Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EpochRecord {
    pub schema: Schema,
    pub snapshot: Value,
    pub hash: String,
    pub version: String,
    pub created_at: i64,
    pub last_access: i64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<&SnapshotRecord> for EpochRecord {
    fn from(record: &SnapshotRecord) -> Self {
        Self {
            schema: record.schema.clone(),
            snapshot: record.snapshot.clone(),
            hash: record.hash.clone(),
            version: record.version.clone(),
            created_at: record.created_at.epoch_secs(),
            last_access: record.last_access.epoch_secs(),
            metadata: record.metadata.clone(),
        }
    }
}

impl TryFrom<EpochRecord> for SnapshotRecord {
    type Error = SnapError;

    fn try_from(record: EpochRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            schema: record.schema,
            snapshot: record.snapshot,
            hash: record.hash,
            version: record.version,
            created_at: Timestamp::from_epoch_secs(record.created_at)?,
            last_access: Timestamp::from_epoch_secs(record.last_access)?,
            metadata: record.metadata,
        })
    }
}
