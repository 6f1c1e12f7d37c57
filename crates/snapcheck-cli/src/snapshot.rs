//! # Snapshot CLI — create, read and inspect snapshots.
//!
//! ```bash
//! snapcheck create users --input users.json --version v1 --meta owner=qa
//! snapcheck get users --version v1 --input users.json --expiration 600
//! snapcheck inspect users --version v1
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{parse_meta, read_value, GlobalOpts};

/// Arguments for `snapcheck create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Snapshot name.
    pub name: String,

    /// Document to snapshot (JSON, YAML or TOML by extension).
    #[arg(long, short)]
    pub input: PathBuf,

    /// Version tag.
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Metadata entry as key=value. Repeatable.
    #[arg(long = "meta", value_parser = parse_meta)]
    pub metadata: Vec<(String, String)>,
}

/// Arguments for `snapcheck get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Snapshot name.
    pub name: String,

    /// Document used to create the snapshot if it is absent or expired.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Version tag.
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Expiration window in seconds (overrides the configuration).
    #[arg(long)]
    pub expiration: Option<u64>,
}

/// Arguments for `snapcheck inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot name.
    pub name: String,

    /// Version tag.
    #[arg(long, default_value = "latest")]
    pub version: String,
}

/// Execute `snapcheck create`.
pub fn run_create(args: &CreateArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let value = read_value(&args.input)?;
    let metadata: BTreeMap<String, String> = args.metadata.iter().cloned().collect();
    let snap = manager.snapshot(&args.name);
    let record = snap
        .create_snapshot(&value, &args.version, metadata)
        .with_context(|| format!("failed to create snapshot '{}'", args.name))?;
    println!("{}  {}", record.hash, snap.path(&args.version)?.display());
    Ok(0)
}

/// Execute `snapcheck get`. Prints the stored value as JSON.
pub fn run_get(args: &GetArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let value = args.input.as_deref().map(read_value).transpose()?;
    let stored = manager
        .snapshot(&args.name)
        .get_or_create_snapshot(value.as_ref(), &args.version, args.expiration)?;
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(0)
}

/// Execute `snapcheck inspect`. Prints the whole record as JSON.
pub fn run_inspect(args: &InspectArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let record = manager.snapshot(&args.name).load_snapshot_data(&args.version)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_and_inspect() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("doc.json");
        std::fs::write(&input, "{\"x\": 1}").unwrap();
        let opts = GlobalOpts {
            dir: Some(tmp.path().join("snaps")),
            ..GlobalOpts::default()
        };

        let create = CreateArgs {
            name: "doc".into(),
            input: input.clone(),
            version: "v1".into(),
            metadata: vec![("owner".into(), "qa".into())],
        };
        assert_eq!(run_create(&create, &opts).unwrap(), 0);
        assert!(tmp.path().join("snaps").join("doc_v1.json").is_file());

        let get = GetArgs {
            name: "doc".into(),
            input: None,
            version: "v1".into(),
            expiration: None,
        };
        assert_eq!(run_get(&get, &opts).unwrap(), 0);

        let inspect = InspectArgs {
            name: "doc".into(),
            version: "v1".into(),
        };
        assert_eq!(run_inspect(&inspect, &opts).unwrap(), 0);
    }

    #[test]
    fn get_missing_without_input_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = GlobalOpts {
            dir: Some(tmp.path().to_path_buf()),
            ..GlobalOpts::default()
        };
        let get = GetArgs {
            name: "none".into(),
            input: None,
            version: "v1".into(),
            expiration: None,
        };
        assert!(run_get(&get, &opts).is_err());
    }
}
