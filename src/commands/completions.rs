//! # Completions Command Implementation
//!
//! Writes a completion script for `concentrate` to stdout, for example:
//!
//! ```bash
//! concentrate completions bash > ~/.local/share/bash-completion/completions/concentrate
//! concentrate completions zsh > ~/.zfunc/_concentrate
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

const BIN_NAME: &str = "concentrate";

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, BIN_NAME, &mut io::stdout());
    Ok(())
}
