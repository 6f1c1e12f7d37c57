//! # snapcheck-store — Snapshot Persistence
//!
//! Stores values as versioned, named snapshots and checks later values
//! against them.
//!
//! ## Layers
//!
//! - [`SnapshotRecord`]: value + inferred schema + content hash + version +
//!   timestamps + metadata.
//! - [`serializer`]: pluggable codecs selected by format name (`json`,
//!   `yaml`/`yml`, `toml`, `hcl`, `msgpack`/`bin`).
//! - [`SnapshotStore`]: one file per key at `{dir}/{name}_{version}.{format}`.
//! - [`SnapshotManager`] / [`Snapshot`]: create, get-or-create with
//!   expiration, corruption and schema checks, comparison and assertions.
//!
//! ## Integrity
//!
//! Every record carries the SHA-256 of the canonical (JCS) bytes of its
//! value. A record whose recomputed hash differs from the stored one is
//! reported as `SnapError::Corruption` and never silently re-accepted.
//!
//! ## Concurrency
//!
//! Synchronous and unlocked. Concurrent writers to one key race; callers
//! needing coordination must serialize access themselves.

pub mod config;
pub mod manager;
pub mod record;
pub mod serializer;
pub mod store;

pub use config::{SnapshotConfig, ValidationMode};
pub use manager::{Snapshot, SnapshotManager};
pub use record::SnapshotRecord;
pub use serializer::{SerializerRegistry, SnapshotSerializer};
pub use store::SnapshotStore;
