//! # Asset Concentrator CLI
//!
//! This is the binary entry point for the `concentrate` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging for the library.
//! - Executing the appropriate command and turning errors into user-friendly
//!   output.
//!
//! The resolution logic lives in the `asset_concentrator` library crate; the
//! binary only loads manifests from disk and prints results.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
