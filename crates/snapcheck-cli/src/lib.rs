//! # snapcheck-cli — Snapshot Tool
//!
//! Provides the `snapcheck` command-line interface over
//! [`snapcheck_store::SnapshotManager`].
//!
//! ## Subcommands
//!
//! - `snapcheck create`: store a document as a new snapshot version.
//! - `snapcheck get`: read a snapshot, creating it from a document if absent
//!   or expired.
//! - `snapcheck inspect`: print a stored record.
//! - `snapcheck check`: assert a document conforms to a stored schema.
//! - `snapcheck equal`: assert a document equals a stored value.
//! - `snapcheck compare`: compare the values of two stored versions.
//!
//! ```bash
//! snapcheck create users --input users.json --version v1 --meta owner=qa
//! snapcheck check users --input candidate.yaml --version v1
//! snapcheck --format yaml compare users v1 v2
//! ```

pub mod assert;
pub mod snapshot;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use snapcheck_core::Value;
use snapcheck_store::{SnapshotConfig, SnapshotManager, ValidationMode};

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot directory (overrides the configuration).
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Snapshot file format: json, yaml, yml, toml, hcl, msgpack, bin.
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Validation mode for stored snapshots: hard or soft.
    #[arg(long, global = true)]
    pub mode: Option<ValidationMode>,
}

impl GlobalOpts {
    /// Load the configuration file (if any) and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<SnapshotConfig> {
        let mut config = match &self.config {
            Some(path) => SnapshotConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SnapshotConfig::default(),
        };
        if let Some(dir) = &self.dir {
            config.snapshot_dir = dir.clone();
        }
        if let Some(format) = &self.format {
            config.default_format = format.clone();
        }
        if let Some(mode) = self.mode {
            config.validation_mode = mode;
        }
        Ok(config)
    }

    /// Build a manager with the built-in predicates.
    pub fn manager(&self) -> Result<SnapshotManager> {
        let config = self.resolve_config()?;
        tracing::debug!(
            dir = %config.snapshot_dir.display(),
            format = %config.default_format,
            mode = %config.validation_mode,
            "resolved configuration"
        );
        Ok(SnapshotManager::new(config))
    }
}

/// Read a document, choosing the parser from the file extension
/// (`.yaml`/`.yml`, `.toml`, anything else as JSON).
pub fn read_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let value = match extension {
        "yaml" | "yml" => serde_yaml::from_str(&text).map_err(anyhow::Error::from),
        "toml" => toml::from_str(&text).map_err(anyhow::Error::from),
        _ => serde_json::from_str(&text).map_err(anyhow::Error::from),
    };
    value.with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse a `key=value` metadata pair.
pub fn parse_meta(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("metadata must be key=value, got {s:?}");
    };
    if key.is_empty() {
        bail!("metadata key must not be empty in {s:?}");
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_apply_over_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapcheck.toml");
        std::fs::write(&path, "snapshot_dir = \"from-file\"\ndefault_format = \"yaml\"\n").unwrap();
        let opts = GlobalOpts {
            config: Some(path),
            format: Some("hcl".into()),
            mode: Some(ValidationMode::Soft),
            ..GlobalOpts::default()
        };
        let config = opts.resolve_config().unwrap();
        assert_eq!(config.snapshot_dir, PathBuf::from("from-file"));
        assert_eq!(config.default_format, "hcl");
        assert_eq!(config.validation_mode, ValidationMode::Soft);
    }

    #[test]
    fn read_value_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let cases = [
            ("doc.json", "{\"a\": [1, 2]}"),
            ("doc.yaml", "a:\n  - 1\n  - 2\n"),
            ("doc.toml", "a = [1, 2]\n"),
        ];
        for (name, text) in cases {
            let path = tmp.path().join(name);
            std::fs::write(&path, text).unwrap();
            assert_eq!(read_value(&path).unwrap(), json!({"a": [1, 2]}), "{name}");
        }
    }

    #[test]
    fn read_value_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();
        let err = read_value(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn meta_pairs() {
        assert_eq!(parse_meta("owner=qa").unwrap(), ("owner".into(), "qa".into()));
        assert_eq!(parse_meta("k=a=b").unwrap(), ("k".into(), "a=b".into()));
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }
}
