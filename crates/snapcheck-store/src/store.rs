//! # Snapshot Store
//!
//! File-backed persistence of [`SnapshotRecord`]s. One file per
//! `(name, version, format)` key at `{dir}/{name}_{version}.{format}`.
//! The directory is created on the first write.
//!
//! The store is a thin codec dispatcher: it does not check hashes,
//! expiration or schemas. Those belong to the manager.
//!
//! There is no locking. Concurrent writers to the same key race and the
//! last write wins.

use std::path::{Path, PathBuf};

use snapcheck_core::SnapError;

use crate::record::SnapshotRecord;
use crate::serializer::{SerializerRegistry, SnapshotSerializer};

/// Reject names that are empty or would escape the snapshot directory.
fn validate_component(kind: &str, value: &str) -> Result<(), SnapError> {
    if value.is_empty() {
        return Err(SnapError::Configuration(format!("snapshot {kind} is required")));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(SnapError::Configuration(format!(
            "snapshot {kind} {value:?} must not contain path separators"
        )));
    }
    Ok(())
}

/// A directory of snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    serializers: SerializerRegistry,
}

impl SnapshotStore {
    /// A store at `dir` with every built-in format.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_serializers(dir, SerializerRegistry::with_defaults())
    }

    /// A store at `dir` with a caller-supplied format registry.
    pub fn with_serializers(dir: impl Into<PathBuf>, serializers: SerializerRegistry) -> Self {
        Self {
            dir: dir.into(),
            serializers,
        }
    }

    /// The snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The format registry.
    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    /// Mutable access to the format registry, e.g. to add a format.
    pub fn serializers_mut(&mut self) -> &mut SerializerRegistry {
        &mut self.serializers
    }

    /// File path for a key.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Configuration` if any component is empty or
    /// contains a path separator.
    pub fn path_for(&self, name: &str, version: &str, format: &str) -> Result<PathBuf, SnapError> {
        validate_component("name", name)?;
        validate_component("version", version)?;
        validate_component("format", format)?;
        Ok(self.dir.join(format!("{name}_{version}.{format}")))
    }

    /// Whether a file exists for the key.
    pub fn exists(&self, name: &str, version: &str, format: &str) -> Result<bool, SnapError> {
        Ok(self.path_for(name, version, format)?.is_file())
    }

    /// Persist `record` under `(name, record.version, format)` using the
    /// registered codec for `format`. Returns the written path.
    pub fn save(&self, name: &str, record: &SnapshotRecord, format: &str) -> Result<PathBuf, SnapError> {
        let serializer = self.serializers.get(format)?;
        self.save_with(serializer.as_ref(), name, record, format)
    }

    /// Persist `record` with an explicit codec. The file extension still
    /// follows `format`.
    pub fn save_with(
        &self,
        serializer: &dyn SnapshotSerializer,
        name: &str,
        record: &SnapshotRecord,
        format: &str,
    ) -> Result<PathBuf, SnapError> {
        let path = self.path_for(name, &record.version, format)?;
        std::fs::create_dir_all(&self.dir)?;
        serializer.save(record, &path)?;
        tracing::debug!(path = %path.display(), codec = serializer.name(), "snapshot written");
        Ok(path)
    }

    /// Load the record for a key using the registered codec for `format`.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::NotFound` if no file exists for the key.
    pub fn load(&self, name: &str, version: &str, format: &str) -> Result<SnapshotRecord, SnapError> {
        let serializer = self.serializers.get(format)?;
        self.load_with(serializer.as_ref(), name, version, format)
    }

    /// Load the record for a key with an explicit codec.
    pub fn load_with(
        &self,
        serializer: &dyn SnapshotSerializer,
        name: &str,
        version: &str,
        format: &str,
    ) -> Result<SnapshotRecord, SnapError> {
        let path = self.path_for(name, version, format)?;
        if !path.is_file() {
            return Err(SnapError::NotFound {
                name: name.to_string(),
                version: version.to_string(),
                format: format.to_string(),
            });
        }
        let record = serializer.load(&path)?;
        tracing::debug!(path = %path.display(), codec = serializer.name(), "snapshot read");
        Ok(record)
    }
}
