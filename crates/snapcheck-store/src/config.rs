//! # Manager Configuration
//!
//! Settings for a [`SnapshotManager`](crate::SnapshotManager), loadable
//! from a TOML file:
//!
//! ```toml
//! snapshot_dir = "mock"
//! default_format = "json"
//! validation_mode = "hard"
//! expiration_seconds = 3600
//! ```
//!
//! Every key is optional and falls back to the value shown.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snapcheck_core::SnapError;

/// What `get_or_create_snapshot` does when a stored value no longer
/// conforms to its stored schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Fail with `SnapError::Validation`.
    #[default]
    Hard,
    /// Log a warning and return the stored value anyway.
    Soft,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        })
    }
}

impl FromStr for ValidationMode {
    type Err = SnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard" => Ok(Self::Hard),
            "soft" => Ok(Self::Soft),
            other => Err(SnapError::Configuration(format!(
                "unknown validation mode '{other}' (expected 'hard' or 'soft')"
            ))),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("mock")
}

fn default_format() -> String {
    "json".to_string()
}

fn default_expiration_seconds() -> u64 {
    3600
}

/// Snapshot manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Directory holding snapshot files. Created on first write.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Format used when a call does not name one.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Reaction to a stored value failing its stored schema.
    #[serde(default)]
    pub validation_mode: ValidationMode,
    /// Maximum record age before `get_or_create_snapshot` treats it as expired.
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            default_format: default_format(),
            validation_mode: ValidationMode::default(),
            expiration_seconds: default_expiration_seconds(),
        }
    }
}

impl SnapshotConfig {
    /// Parse TOML configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, SnapError> {
        toml::from_str(text).map_err(|e| SnapError::Configuration(format!("invalid config: {e}")))
    }

    /// Read a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Io` if the file cannot be read and
    /// `SnapError::Configuration` if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, SnapError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SnapshotConfig::default();
        assert_eq!(config.snapshot_dir, PathBuf::from("mock"));
        assert_eq!(config.default_format, "json");
        assert_eq!(config.validation_mode, ValidationMode::Hard);
        assert_eq!(config.expiration_seconds, 3600);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = SnapshotConfig::from_toml_str("validation_mode = \"soft\"\n").unwrap();
        assert_eq!(config.validation_mode, ValidationMode::Soft);
        assert_eq!(config.default_format, "json");
        assert_eq!(SnapshotConfig::from_toml_str("").unwrap(), SnapshotConfig::default());
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let err = SnapshotConfig::from_toml_str("validation_mode = \"lenient\"").unwrap_err();
        assert!(matches!(err, SnapError::Configuration(_)));
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapcheck.toml");
        std::fs::write(&path, "snapshot_dir = \"snaps\"\nexpiration_seconds = 60\n").unwrap();
        let config = SnapshotConfig::load(&path).unwrap();
        assert_eq!(config.snapshot_dir, PathBuf::from("snaps"));
        assert_eq!(config.expiration_seconds, 60);
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("soft".parse::<ValidationMode>().unwrap(), ValidationMode::Soft);
        assert!("lenient".parse::<ValidationMode>().is_err());
        assert_eq!(ValidationMode::Hard.to_string(), "hard");
    }
}
