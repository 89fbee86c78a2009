//! # Conflicts Command Implementation
//!
//! This module implements the `conflicts` subcommand. It prints every
//! requested file that declares a conflict with another requested file and
//! exits with an error if there is at least one.

use anyhow::{bail, Context, Result};
use clap::Args;

use super::ManifestArgs;

/// Report conflicts among requested files
#[derive(Args, Debug)]
pub struct ConflictsArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// Files that would be served together
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,
}

/// Execute the `conflicts` command.
pub fn execute(args: ConflictsArgs) -> Result<()> {
    let mut resolver = args.source.resolver()?;
    let conflicts = resolver
        .conflicts(&args.files)
        .context("Failed to check conflicts")?;

    if conflicts.is_empty() {
        println!("No conflicts among {} file(s)", args.files.len());
        return Ok(());
    }

    for (file, others) in &conflicts {
        println!("{} conflicts with {}", file, others.join(", "));
    }
    bail!("{} file(s) declare conflicts", conflicts.len())
}
