//! # Assertion CLI — check documents against stored snapshots.
//!
//! Each assertion exits 0 when it holds. A failed assertion is an error and
//! the process exits 1 with the full failure text logged.
//!
//! ```bash
//! snapcheck check users --input candidate.json --version v1
//! snapcheck equal users --input candidate.json --version v1
//! snapcheck compare users v1 v2
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{read_value, GlobalOpts};

/// Arguments for `snapcheck check` and `snapcheck equal`.
#[derive(Args, Debug)]
pub struct AssertArgs {
    /// Snapshot name.
    pub name: String,

    /// Candidate document (JSON, YAML or TOML by extension).
    #[arg(long, short)]
    pub input: PathBuf,

    /// Version tag.
    #[arg(long, default_value = "latest")]
    pub version: String,
}

/// Arguments for `snapcheck compare`.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Snapshot name.
    pub name: String,

    /// First version tag.
    pub version_a: String,

    /// Second version tag.
    pub version_b: String,
}

/// Execute `snapcheck check`: schema compliance against the stored schema.
pub fn run_check(args: &AssertArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let candidate = read_value(&args.input)?;
    manager
        .snapshot(&args.name)
        .assert_schema_compliance(&candidate, &args.version)?;
    println!("OK: {} conforms to '{}' {}", args.input.display(), args.name, args.version);
    Ok(0)
}

/// Execute `snapcheck equal`: deep equality against the stored value.
pub fn run_equal(args: &AssertArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let candidate = read_value(&args.input)?;
    manager
        .snapshot(&args.name)
        .assert_deep_equal(&candidate, &args.version)?;
    println!("OK: {} equals '{}' {}", args.input.display(), args.name, args.version);
    Ok(0)
}

/// Execute `snapcheck compare`. Exits 1 when the versions differ.
pub fn run_compare(args: &CompareArgs, opts: &GlobalOpts) -> Result<u8> {
    let manager = opts.manager()?;
    let equal = manager
        .snapshot(&args.name)
        .compare_snapshots(&args.version_a, &args.version_b)?;
    if equal {
        println!("'{}' {} and {} are equal", args.name, args.version_a, args.version_b);
        Ok(0)
    } else {
        println!("'{}' {} and {} differ", args.name, args.version_a, args.version_b);
        Ok(1)
    }
}
