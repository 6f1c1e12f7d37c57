//! MessagePack codec.
//!
//! The binary format stores timestamps as Unix seconds and round-trips
//! every value exactly, including integers beyond `i64` and floats with a
//! zero fractional part.

use snapcheck_core::SnapError;

use super::{codec_error, SnapshotSerializer};
use crate::record::{EpochRecord, SnapshotRecord};

/// MessagePack via `rmp-serde`, struct fields encoded by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackSerializer;

impl SnapshotSerializer for MsgpackSerializer {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError> {
        rmp_serde::to_vec_named(&EpochRecord::from(record)).map_err(|e| codec_error("msgpack", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError> {
        let mirror: EpochRecord =
            rmp_serde::from_slice(bytes).map_err(|e| codec_error("msgpack", e))?;
        SnapshotRecord::try_from(mirror)
    }
}
