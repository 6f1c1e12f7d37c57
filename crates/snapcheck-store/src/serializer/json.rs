//! Pretty-printed JSON codec.

use snapcheck_core::SnapError;

use super::{codec_error, SnapshotSerializer};
use crate::record::SnapshotRecord;

/// Human-readable JSON, two-space indented.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl SnapshotSerializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError> {
        let mut bytes = serde_json::to_vec_pretty(record).map_err(|e| codec_error("json", e))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError> {
        serde_json::from_slice(bytes).map_err(|e| codec_error("json", e))
    }
}
