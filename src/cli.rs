//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Env, WriteStyle};

use crate::commands;

/// Asset Concentrator - order, check and bundle web assets from manifests
#[derive(Parser, Debug)]
#[command(name = "concentrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize log output
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorChoice,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for WriteStyle {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => WriteStyle::Auto,
            ColorChoice::Always => WriteStyle::Always,
            ColorChoice::Never => WriteStyle::Never,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print files (or packages) in load order
    Order(commands::order::OrderArgs),

    /// Report conflicts among requested files
    Conflicts(commands::conflicts::ConflictsArgs),

    /// Plan which bundles to serve for requested files
    Combines(commands::combines::CombinesArgs),

    /// Dump file and bundle metadata
    Info(commands::info::InfoArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Order(args) => commands::order::execute(args),
            Commands::Conflicts(args) => commands::conflicts::execute(args),
            Commands::Combines(args) => commands::combines::execute(args),
            Commands::Info(args) => commands::info::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    fn init_logging(&self) {
        let env = Env::default().default_filter_or(self.log_level.as_str());
        // try_init fails when a logger is already installed
        let _ = env_logger::Builder::from_env(env)
            .write_style(self.color.into())
            .format_timestamp(None)
            .try_init();
    }
}
