//! TOML codec.
//!
//! TOML has no null. A record whose value or metadata contains `null`
//! fails to encode with a serialization error instead of being written
//! lossily.

use snapcheck_core::SnapError;

use super::{codec_error, SnapshotSerializer};
use crate::record::SnapshotRecord;

/// TOML via the `toml` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlSerializer;

impl SnapshotSerializer for TomlSerializer {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError> {
        ::toml::to_string_pretty(record)
            .map(String::into_bytes)
            .map_err(|e| codec_error("toml", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError> {
        let text = std::str::from_utf8(bytes).map_err(|e| codec_error("toml", e))?;
        ::toml::from_str(text).map_err(|e| codec_error("toml", e))
    }
}
