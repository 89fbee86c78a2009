//! # Error Handling
//!
//! This module defines the centralized error type for the resolver. It uses
//! the `thiserror` library to create an `Error` enum covering every failure
//! the library can report, with messages that point at the likely cause.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries enough context to act
//!   on the failure without re-running the resolver in a debugger.
//!
//! - **`GraphKind`**: Distinguishes the package graph from the file graph in
//!   cycle reports, since the fix lives in different manifest sections.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Conflicts between requested files are deliberately *not* errors: the
//! resolver reports them as data and callers decide whether to abort.

use std::fmt;

use thiserror::Error;

/// Which dependency graph failed to sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// The graph built from package-level `Depends` lists.
    Package,
    /// The graph built from file-level dependencies and combine sets.
    File,
}

impl GraphKind {
    fn hint(self) -> &'static str {
        match self {
            GraphKind::Package => {
                "check the package 'Depends' sections of your manifests for typos"
            }
            GraphKind::File => {
                "check the 'Provides' and 'Depends' sections of your manifests for typos"
            }
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Package => write!(f, "package"),
            GraphKind::File => write!(f, "file"),
        }
    }
}

/// Main error type for resolver operations
#[derive(Error, Debug)]
pub enum Error {
    /// A dependency graph could not be topologically sorted.
    ///
    /// `nodes` lists the nodes left unsorted, which includes every node on
    /// a cycle.
    #[error("Cyclic {graph} dependency detected among: {nodes}\n  hint: {}", graph.hint())]
    CyclicDependency { graph: GraphKind, nodes: String },

    /// A manifest document could not be interpreted.
    #[error("Manifest error in {source_name}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        source_name: String,
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A cache tier failed to store or return a value.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error from the cache payload codec.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
