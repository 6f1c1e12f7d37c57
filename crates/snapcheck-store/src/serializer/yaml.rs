//! YAML codec.

use snapcheck_core::SnapError;

use super::{codec_error, SnapshotSerializer};
use crate::record::SnapshotRecord;

/// YAML via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSerializer;

impl SnapshotSerializer for YamlSerializer {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError> {
        serde_yaml::to_string(record)
            .map(String::into_bytes)
            .map_err(|e| codec_error("yaml", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError> {
        serde_yaml::from_slice(bytes).map_err(|e| codec_error("yaml", e))
    }
}
