//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `concentrate` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`. Commands that read manifests flatten [`ManifestArgs`].
//! - An `execute` function that takes the parsed `Args`, builds a
//!   [`Resolver`] and prints the answer.
//!
//! ## Manifest sources
//!
//! Sources are files or directories. Directories are walked recursively for
//! `*.yaml` and `*.yml` files in file-name order. Each file's modification
//! time is its revision, so an edited manifest moves the resolver to a new
//! cache namespace.

pub mod combines;
pub mod completions;
pub mod conflicts;
pub mod info;
pub mod order;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_yaml::Value as YamlValue;
use walkdir::WalkDir;

use asset_concentrator::{Manifest, Resolver};

/// Where to read manifests from
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Manifest file or directory to load; may be repeated.
    ///
    /// Can also be set with the `CONCENTRATE_DATA` environment variable
    /// (comma-separated).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "PATH",
        env = "CONCENTRATE_DATA",
        value_delimiter = ','
    )]
    pub manifests: Vec<PathBuf>,
}

impl ManifestArgs {
    /// Load every manifest and return a resolver over them
    pub fn resolver(&self) -> Result<Resolver> {
        if self.manifests.is_empty() {
            bail!("No manifest sources given (use --manifest or set CONCENTRATE_DATA)");
        }
        let manifests = load_manifests(&self.manifests)?;
        log::info!("Loaded {} manifest file(s)", manifests.len());

        let mut resolver = Resolver::new();
        resolver.load_manifests(&manifests);
        Ok(resolver)
    }
}

/// Expand sources into manifest files, keeping the order sources were given
pub fn discover(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_file() {
            files.push(source.clone());
        } else if source.is_dir() {
            for entry in WalkDir::new(source).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk {}", source.display()))?;
                if entry.file_type().is_file() && is_manifest(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            bail!("Manifest source not found: {}", source.display());
        }
    }
    Ok(files)
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read every manifest under `sources`
pub fn load_manifests(sources: &[PathBuf]) -> Result<Vec<Manifest>> {
    discover(sources)?
        .iter()
        .map(|path| read_manifest(path))
        .collect()
}

/// Read one manifest file, using its modification time as the revision
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let document: YamlValue = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    let source = path.display().to_string();

    let manifest = match modified(path) {
        Some(revision) => Manifest::with_revision(source, revision, document),
        None => Manifest::new(source, document),
    };
    manifest.with_context(|| format!("Invalid manifest {}", path.display()))
}

fn modified(path: &Path) -> Option<String> {
    let time = fs::metadata(path).ok()?.modified().ok()?;
    let since = time.duration_since(UNIX_EPOCH).ok()?;
    Some(since.as_nanos().to_string())
}
