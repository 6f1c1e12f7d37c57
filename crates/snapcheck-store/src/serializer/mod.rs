//! # Snapshot Serializers
//!
//! Pure codecs between a [`SnapshotRecord`] and on-disk bytes. A codec knows
//! nothing about validation or hashing; the store picks one by format name
//! through a [`SerializerRegistry`].
//!
//! | Format | Codec | Timestamps |
//! |--------|-------|------------|
//! | `json` | pretty-printed JSON | ISO-8601 |
//! | `yaml`, `yml` | YAML | ISO-8601 |
//! | `toml` | TOML (no `null` support) | ISO-8601 |
//! | `hcl` | `key = value` blocks | ISO-8601 |
//! | `msgpack`, `bin` | MessagePack | Unix seconds |
//!
//! Only the binary codec round-trips every value exactly; the text codecs
//! round-trip everything they can represent.

mod hcl;
mod json;
mod msgpack;
mod toml;
mod yaml;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use snapcheck_core::SnapError;

use crate::record::SnapshotRecord;

pub use self::hcl::HclSerializer;
pub use self::json::JsonSerializer;
pub use self::msgpack::MsgpackSerializer;
pub use self::toml::TomlSerializer;
pub use self::yaml::YamlSerializer;

/// Encodes and decodes snapshot records for one on-disk format.
pub trait SnapshotSerializer: fmt::Debug + Send + Sync {
    /// Short codec name for diagnostics.
    fn name(&self) -> &'static str;

    /// Encode a record to bytes.
    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError>;

    /// Decode a record from bytes.
    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError>;

    /// Encode `record` and write it to `path`, replacing any existing file.
    fn save(&self, record: &SnapshotRecord, path: &Path) -> Result<(), SnapError> {
        let bytes = self.encode(record)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Read and decode the record at `path`.
    fn load(&self, path: &Path) -> Result<SnapshotRecord, SnapError> {
        let bytes = fs::read(path)?;
        self.decode(&bytes)
    }
}

/// Wrap a codec failure as a serialization error tagged with the codec name.
pub(crate) fn codec_error(codec: &str, err: impl fmt::Display) -> SnapError {
    SnapError::Serialization(format!("{codec}: {err}"))
}

/// Format name → serializer.
#[derive(Debug, Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn SnapshotSerializer>>,
}

impl SerializerRegistry {
    /// A registry with no formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in format registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("json", Arc::new(JsonSerializer));
        registry.register("yaml", Arc::new(YamlSerializer));
        registry.register("yml", Arc::new(YamlSerializer));
        registry.register("toml", Arc::new(TomlSerializer));
        registry.register("hcl", Arc::new(HclSerializer));
        registry.register("msgpack", Arc::new(MsgpackSerializer));
        registry.register("bin", Arc::new(MsgpackSerializer));
        registry
    }

    /// Register (or replace) the serializer for `format`.
    pub fn register(&mut self, format: impl Into<String>, serializer: Arc<dyn SnapshotSerializer>) {
        self.serializers.insert(format.into(), serializer);
    }

    /// The serializer for `format`.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Configuration` for an unregistered format.
    pub fn get(&self, format: &str) -> Result<Arc<dyn SnapshotSerializer>, SnapError> {
        self.serializers.get(format).cloned().ok_or_else(|| {
            SnapError::Configuration(format!(
                "unsupported format '{format}' (known: {})",
                self.formats().join(", ")
            ))
        })
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<String> {
        let mut names: Vec<String> = self.serializers.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_format() {
        let registry = SerializerRegistry::with_defaults();
        assert_eq!(
            registry.formats(),
            ["bin", "hcl", "json", "msgpack", "toml", "yaml", "yml"]
        );
        assert_eq!(registry.get("yml").unwrap().name(), "yaml");
        assert_eq!(registry.get("bin").unwrap().name(), "msgpack");
    }

    #[test]
    fn unknown_format_is_configuration_error() {
        let err = SerializerRegistry::with_defaults().get("xml").unwrap_err();
        assert!(matches!(err, SnapError::Configuration(ref m) if m.contains("xml")));
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = SerializerRegistry::new();
        registry.register("data", Arc::new(JsonSerializer));
        registry.register("data", Arc::new(YamlSerializer));
        assert_eq!(registry.get("data").unwrap().name(), "yaml");
    }
}
