//! # Info Command Implementation
//!
//! This module implements the `info` subcommand, which dumps what the
//! resolver derived from the manifests: loaded sources, the fingerprint,
//! the package order, per-file metadata and the expanded bundles.
//!
//! This command is read-only.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use asset_concentrator::resolver::{CombinesInfo, FileInfo, SortOrder};

use super::ManifestArgs;

/// Output format for `info`
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum InfoFormat {
    #[default]
    Yaml,
    Json,
}

/// Dump file and bundle metadata
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = InfoFormat::Yaml)]
    pub format: InfoFormat,
}

#[derive(Serialize)]
struct InfoReport<'a> {
    fingerprint: &'a str,
    sources: Vec<String>,
    packages: &'a SortOrder,
    files: &'a FileInfo,
    combines: &'a CombinesInfo,
}

/// Execute the `info` command.
pub fn execute(args: InfoArgs) -> Result<()> {
    let mut resolver = args.source.resolver()?;
    let packages = resolver
        .package_sort_order()
        .context("Failed to order packages")?;
    let files = resolver.file_info().context("Failed to collect file info")?;
    let combines = resolver
        .combines_info()
        .context("Failed to collect combines")?;

    let report = InfoReport {
        fingerprint: resolver.fingerprint(),
        sources: resolver.sources(),
        packages: &packages,
        files: &files,
        combines: &combines,
    };

    let output = match args.format {
        InfoFormat::Yaml => serde_yaml::to_string(&report)?,
        InfoFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };
    print!("{output}");
    Ok(())
}
