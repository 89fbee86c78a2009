//! # Order Command Implementation
//!
//! This module implements the `order` subcommand, which prints the load
//! order computed from the manifests.
//!
//! ## Functionality
//!
//! - **Full order**: Without arguments, prints every file and bundle with
//!   its rank, rank 0 first.
//! - **Request order**: With file arguments, prints just those files sorted
//!   into load order. Files no manifest knows about go last.
//! - **Packages**: With `--packages`, prints the package order instead.
//!
//! This command is read-only.

use anyhow::{Context, Result};
use clap::Args;

use super::ManifestArgs;

/// Print files (or packages) in load order
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// Print the package order instead of the file order
    #[arg(long)]
    pub packages: bool,

    /// Only sort these files
    #[arg(value_name = "FILE", conflicts_with = "packages")]
    pub files: Vec<String>,
}

/// Execute the `order` command.
pub fn execute(args: OrderArgs) -> Result<()> {
    let mut resolver = args.source.resolver()?;

    if args.packages {
        let order = resolver
            .package_sort_order()
            .context("Failed to order packages")?;
        for (package, rank) in order.iter() {
            println!("{rank}\t{package}");
        }
        return Ok(());
    }

    if !args.files.is_empty() {
        let mut files = args.files;
        resolver
            .sort_files(&mut files)
            .context("Failed to order files")?;
        for file in files {
            println!("{file}");
        }
        return Ok(());
    }

    let order = resolver.file_sort_order().context("Failed to order files")?;
    for (file, rank) in order.iter() {
        println!("{rank}\t{file}");
    }
    Ok(())
}
