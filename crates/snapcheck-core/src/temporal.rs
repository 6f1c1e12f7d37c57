//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, the UTC timestamp carried by every snapshot record
//! (`created_at`, `last_access`). Timestamps are truncated to whole seconds.
//!
//! ## Representations
//!
//! - Text codecs (JSON, YAML, TOML, HCL) store `YYYY-MM-DDTHH:MM:SSZ`.
//! - The binary codec stores Unix epoch seconds.
//!
//! Parsing is lenient: an explicit offset is converted to UTC, and a naive
//! `YYYY-MM-DDTHH:MM:SS[.ffffff]` string is assumed to be UTC.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SnapError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an ISO 8601 timestamp.
    ///
    /// Accepts RFC 3339 strings with any offset (converted to UTC) and naive
    /// date-times, which are taken as UTC.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Serialization` if the string is neither form.
    pub fn parse(s: &str) -> Result<Self, SnapError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Self(truncate_to_seconds(naive.and_utc())))
            .map_err(|e| SnapError::Serialization(format!("invalid timestamp {s:?}: {e}")))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, SnapError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| SnapError::Serialization(format!("invalid Unix timestamp: {secs}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Whole seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    pub fn seconds_since(&self, earlier: &Timestamp) -> i64 {
        self.epoch_secs() - earlier.epoch_secs()
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
