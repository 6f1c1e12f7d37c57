//! # Snapshot Manager
//!
//! The facade composing schema inference, the validation engine and the
//! file store. A [`SnapshotManager`] owns the engine and the store; a
//! [`Snapshot`] handle binds it to one snapshot name and format.
//!
//! ## Lifecycle per `(name, version, format)`
//!
//! - **Absent** → `create_snapshot` infers the schema, hashes the value and
//!   writes a fresh record.
//! - **Present** → `get_or_create_snapshot`:
//!   1. load the record;
//!   2. if older than the expiration window, recreate it from the supplied
//!      value or fail with `Expired`;
//!   3. recompute the hash and fail with `Corruption` on mismatch, before
//!      any schema check;
//!   4. validate the stored value against the stored schema (hard mode
//!      fails, soft mode warns);
//!   5. refresh `last_access`, re-save and return the stored value.
//!
//! `load_snapshot_data`, `compare_snapshots` and the `assert_*` family read
//! without writing. They still refuse corrupted records.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use snapcheck_core::{diff_paths, SnapError, Timestamp, Value};
use snapcheck_schema::{Schema, ValidationEngine, ValidationReport, Validations};

use crate::config::{SnapshotConfig, ValidationMode};
use crate::record::SnapshotRecord;
use crate::serializer::SnapshotSerializer;
use crate::store::SnapshotStore;

/// Owns the store, the validation engine and the configuration.
#[derive(Debug)]
pub struct SnapshotManager {
    store: SnapshotStore,
    engine: ValidationEngine,
    config: SnapshotConfig,
    serializer_override: Option<Arc<dyn SnapshotSerializer>>,
}

impl SnapshotManager {
    /// A manager for `config` with the built-in predicates registered.
    pub fn new(config: SnapshotConfig) -> Self {
        Self::with_engine(config, ValidationEngine::with_builtin_rules())
    }

    /// A manager for `config` using a caller-prepared engine.
    pub fn with_engine(config: SnapshotConfig, engine: ValidationEngine) -> Self {
        let store = SnapshotStore::new(config.snapshot_dir.clone());
        Self::from_parts(store, engine, config)
    }

    /// Assemble a manager from its parts.
    pub fn from_parts(store: SnapshotStore, engine: ValidationEngine, config: SnapshotConfig) -> Self {
        Self {
            store,
            engine,
            config,
            serializer_override: None,
        }
    }

    /// Use `serializer` for every format name. File extensions still follow
    /// the requested format.
    pub fn with_serializer(mut self, serializer: Arc<dyn SnapshotSerializer>) -> Self {
        self.serializer_override = Some(serializer);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// The validation engine.
    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Mutable access to the engine, e.g. to register predicates.
    pub fn engine_mut(&mut self) -> &mut ValidationEngine {
        &mut self.engine
    }

    /// The underlying store.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// A handle for the snapshot called `name` in the default format.
    pub fn snapshot(&self, name: impl Into<String>) -> Snapshot<'_> {
        Snapshot {
            manager: self,
            name: name.into(),
            format: self.config.default_format.clone(),
        }
    }

    fn save(&self, name: &str, record: &SnapshotRecord, format: &str) -> Result<PathBuf, SnapError> {
        match &self.serializer_override {
            Some(serializer) => self.store.save_with(serializer.as_ref(), name, record, format),
            None => self.store.save(name, record, format),
        }
    }

    fn load(&self, name: &str, version: &str, format: &str) -> Result<SnapshotRecord, SnapError> {
        match &self.serializer_override {
            Some(serializer) => self.store.load_with(serializer.as_ref(), name, version, format),
            None => self.store.load(name, version, format),
        }
    }
}

/// A snapshot name bound to a manager and a format.
#[derive(Debug, Clone)]
pub struct Snapshot<'m> {
    manager: &'m SnapshotManager,
    name: String,
    format: String,
}

impl<'m> Snapshot<'m> {
    /// Use `format` instead of the configured default.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// The snapshot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The format name.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// File path of `version`.
    pub fn path(&self, version: &str) -> Result<PathBuf, SnapError> {
        self.manager.store.path_for(&self.name, version, &self.format)
    }

    /// Infer a schema for `value`, hash it and write a fresh record,
    /// overwriting any existing file for `version`.
    pub fn create_snapshot(
        &self,
        value: &Value,
        version: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<SnapshotRecord, SnapError> {
        let record = SnapshotRecord::new(value.clone(), version, metadata)?;
        let path = self.manager.save(&self.name, &record, &self.format)?;
        tracing::info!(
            name = %self.name,
            version,
            path = %path.display(),
            metadata = ?record.metadata,
            "snapshot created"
        );
        Ok(record)
    }

    /// Return the stored value for `version`, creating the record from
    /// `value` when it is absent or expired.
    ///
    /// `expiration_secs` defaults to the configured window.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent and no value was supplied.
    /// - `Expired` if expired and no value was supplied.
    /// - `Corruption` if the stored hash does not match the stored value.
    /// - `Validation` in hard mode if the stored value fails its schema.
    pub fn get_or_create_snapshot(
        &self,
        value: Option<&Value>,
        version: &str,
        expiration_secs: Option<u64>,
    ) -> Result<Value, SnapError> {
        let expiration_secs = expiration_secs.unwrap_or(self.manager.config.expiration_seconds);

        if !self.manager.store.exists(&self.name, version, &self.format)? {
            return match value {
                Some(value) => Ok(self.create_snapshot(value, version, BTreeMap::new())?.snapshot),
                None => Err(self.not_found(version)),
            };
        }

        let mut record = self.manager.load(&self.name, version, &self.format)?;
        let now = Timestamp::now();

        let age_secs = record.age_secs(&now);
        if age_secs > i64::try_from(expiration_secs).unwrap_or(i64::MAX) {
            let Some(value) = value else {
                return Err(SnapError::Expired {
                    name: self.name.clone(),
                    version: version.to_string(),
                    age_secs,
                    expiration_secs,
                });
            };
            tracing::info!(name = %self.name, version, age_secs, "snapshot expired; recreating");
            let metadata = std::mem::take(&mut record.metadata);
            return Ok(self.create_snapshot(value, version, metadata)?.snapshot);
        }

        self.verify_integrity(&record)?;

        let report = self.manager.engine.validate(&record.snapshot, &record.schema)?;
        if !report.is_valid() {
            let errors = report.into_errors();
            match self.manager.config.validation_mode {
                ValidationMode::Hard => return Err(SnapError::Validation(errors)),
                ValidationMode::Soft => tracing::warn!(
                    name = %self.name,
                    version,
                    "stored snapshot does not conform to its schema:\n{errors}"
                ),
            }
        }

        record.touch(now);
        let path = self.manager.save(&self.name, &record, &self.format)?;
        tracing::debug!(name = %self.name, version, path = %path.display(), "snapshot retrieved");
        Ok(record.snapshot)
    }

    /// Load the record for `version` without modifying it.
    ///
    /// The content hash is still checked; a corrupted record is an error.
    pub fn load_snapshot_data(&self, version: &str) -> Result<SnapshotRecord, SnapError> {
        let record = self.manager.load(&self.name, version, &self.format)?;
        self.verify_integrity(&record)?;
        Ok(record)
    }

    /// Fail with `Corruption` if the record's stored hash does not match
    /// its stored value.
    pub fn verify_integrity(&self, record: &SnapshotRecord) -> Result<(), SnapError> {
        let computed = record.computed_hash()?;
        if computed == record.hash {
            return Ok(());
        }
        Err(SnapError::Corruption {
            path: self.path(&record.version)?.display().to_string(),
            stored: record.hash.clone(),
            computed,
        })
    }

    /// Validate `data` against an explicit schema with this manager's engine.
    pub fn validate_data(&self, data: &Value, schema: &Schema) -> Result<ValidationReport, SnapError> {
        self.manager.engine.validate(data, schema)
    }

    /// Validate `data` against the schema stored for `version`.
    pub fn validate_snapshot(&self, data: &Value, version: &str) -> Result<ValidationReport, SnapError> {
        let record = self.load_snapshot_data(version)?;
        self.validate_data(data, &record.schema)
    }

    /// Whether the stored values of two versions are structurally equal.
    pub fn compare_snapshots(&self, version_a: &str, version_b: &str) -> Result<bool, SnapError> {
        let a = self.load_snapshot_data(version_a)?;
        let b = self.load_snapshot_data(version_b)?;
        Ok(a.snapshot == b.snapshot)
    }

    /// Fail with `Assertion` unless `candidate` equals the stored value.
    pub fn assert_deep_equal(&self, candidate: &Value, version: &str) -> Result<(), SnapError> {
        let record = self.load_snapshot_data(version)?;
        if record.snapshot == *candidate {
            tracing::debug!(name = %self.name, version, "deep equality holds");
            return Ok(());
        }
        let paths = diff_paths(&record.snapshot, candidate);
        Err(SnapError::Assertion(format!(
            "value does not equal snapshot '{}' version '{version}'; differs at: {}",
            self.name,
            paths.join(", ")
        )))
    }

    /// Fail with `Assertion` unless `candidate` conforms to the stored schema.
    pub fn assert_schema_compliance(&self, candidate: &Value, version: &str) -> Result<(), SnapError> {
        let report = self.validate_snapshot(candidate, version)?;
        self.assert_report(report, version, "does not conform to the schema of")
    }

    /// Fail with `Assertion` unless `candidate` passes the stored schema with
    /// `rules` attached to its root alongside any stored rules.
    pub fn assert_custom_validation(
        &self,
        candidate: &Value,
        version: &str,
        rules: &Validations,
    ) -> Result<(), SnapError> {
        let mut schema = self.load_snapshot_data(version)?.schema;
        if !rules.is_empty() {
            schema
                .validations
                .get_or_insert_with(Validations::default)
                .extend(rules);
        }
        let report = self.validate_data(candidate, &schema)?;
        self.assert_report(report, version, "failed custom validations for")
    }

    fn assert_report(&self, report: ValidationReport, version: &str, what: &str) -> Result<(), SnapError> {
        if report.is_valid() {
            return Ok(());
        }
        Err(SnapError::Assertion(format!(
            "value {what} snapshot '{}' version '{version}':\n{}",
            self.name,
            report.into_errors()
        )))
    }

    fn not_found(&self, version: &str) -> SnapError {
        SnapError::NotFound {
            name: self.name.clone(),
            version: version.to_string(),
            format: self.format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snapcheck_schema::Rule;

    fn manager(dir: &std::path::Path) -> SnapshotManager {
        SnapshotManager::new(SnapshotConfig {
            snapshot_dir: dir.to_path_buf(),
            ..SnapshotConfig::default()
        })
    }

    #[test]
    fn get_or_create_creates_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("users");
        let value = json!({"x": 1});
        assert_eq!(snap.get_or_create_snapshot(Some(&value), "v1", None).unwrap(), value);
        assert!(snap.path("v1").unwrap().is_file());
    }

    #[test]
    fn get_or_create_without_value_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let err = manager
            .snapshot("users")
            .get_or_create_snapshot(None, "v1", None)
            .unwrap_err();
        assert!(matches!(err, SnapError::NotFound { .. }));
    }

    #[test]
    fn get_or_create_returns_stored_value() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("users");
        snap.create_snapshot(&json!({"x": 1}), "v1", BTreeMap::new()).unwrap();
        let got = snap.get_or_create_snapshot(Some(&json!({"x": 2})), "v1", None).unwrap();
        assert_eq!(got, json!({"x": 1}));
    }

    #[test]
    fn metadata_is_persisted() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("users").with_format("yaml");
        let metadata = BTreeMap::from([("owner".to_string(), "qa".to_string())]);
        snap.create_snapshot(&json!([1, 2]), "v1", metadata.clone()).unwrap();
        assert_eq!(snap.load_snapshot_data("v1").unwrap().metadata, metadata);
    }

    #[test]
    fn compare_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("cfg");
        snap.create_snapshot(&json!({"a": 1}), "v1", BTreeMap::new()).unwrap();
        snap.create_snapshot(&json!({"a": 1}), "v2", BTreeMap::new()).unwrap();
        snap.create_snapshot(&json!({"a": 2}), "v3", BTreeMap::new()).unwrap();
        assert!(snap.compare_snapshots("v1", "v2").unwrap());
        assert!(!snap.compare_snapshots("v1", "v3").unwrap());
    }

    #[test]
    fn deep_equal_mentions_version_and_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("cfg");
        snap.create_snapshot(&json!({"x": 1}), "v1", BTreeMap::new()).unwrap();
        snap.assert_deep_equal(&json!({"x": 1}), "v1").unwrap();
        let err = snap.assert_deep_equal(&json!({"x": 2}), "v1").unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SnapError::Assertion(_)));
        assert!(message.contains("v1"), "{message}");
        assert!(message.contains("root.x"), "{message}");
    }

    #[test]
    fn schema_compliance_lists_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("person");
        snap.create_snapshot(&json!({"age": 30, "name": "Alice"}), "v1", BTreeMap::new())
            .unwrap();
        snap.assert_schema_compliance(&json!({"age": 41, "name": "Bob"}), "v1").unwrap();
        let err = snap
            .assert_schema_compliance(&json!({"age": "thirty", "name": "Alice"}), "v1")
            .unwrap_err();
        assert!(err.to_string().contains("root.age: expected integer, found string"));
    }

    #[test]
    fn custom_validation_applies_extra_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path());
        let snap = manager.snapshot("trip");
        snap.create_snapshot(&json!({"start": "2024-01-01", "end": "2024-01-05"}), "v1", BTreeMap::new())
            .unwrap();
        let rules = Validations {
            and: vec![Rule::predicate("date-order").with_arg("date_key_names", json!(["start", "end"]))],
            ..Validations::default()
        };
        snap.assert_custom_validation(&json!({"start": "2024-02-01", "end": "2024-02-03"}), "v1", &rules)
            .unwrap();
        let err = snap
            .assert_custom_validation(&json!({"start": "2024-02-03", "end": "2024-02-01"}), "v1", &rules)
            .unwrap_err();
        assert!(err.to_string().contains("is not after"));
    }

    #[test]
    fn serializer_override_ignores_format_name() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager(tmp.path()).with_serializer(Arc::new(crate::serializer::HclSerializer));
        let snap = manager.snapshot("x").with_format("cfg");
        snap.create_snapshot(&json!({"k": "v"}), "v1", BTreeMap::new()).unwrap();
        let text = std::fs::read_to_string(snap.path("v1").unwrap()).unwrap();
        assert!(text.contains("version = \"v1\""));
        assert_eq!(snap.load_snapshot_data("v1").unwrap().snapshot, json!({"k": "v"}));
    }
}
