//! # Asset Concentrator Library
//!
//! This library works out how to serve a page's JavaScript and CSS. Packages
//! describe their files in YAML manifests: what each file depends on, which
//! files conflict, and which files can be served together as one bundle.
//! Given the merged manifests and a list of requested files, the library
//! answers three questions:
//!
//! - In what order must these files load?
//! - Do any of them conflict?
//! - Which pre-declared bundles should be served instead of single files?
//!
//! ## Quick Example
//!
//! ```
//! use asset_concentrator::{Manifest, Resolver};
//!
//! let manifest = Manifest::from_yaml_str(
//!     "core.yaml",
//!     r#"
//! core:
//!   Provides:
//!     base.js: {}
//!     widgets.js:
//!       Depends: [base.js]
//!   Combines:
//!     core-all.js:
//!       Includes: [base.js, widgets.js]
//! "#,
//! )
//! .unwrap();
//!
//! let mut resolver = Resolver::new();
//! resolver.load_manifest(&manifest);
//!
//! let mut files = vec!["widgets.js".to_string(), "base.js".to_string()];
//! resolver.sort_files(&mut files).unwrap();
//! assert_eq!(files, vec!["base.js", "widgets.js"]);
//!
//! let plan = resolver.combines(&files).unwrap();
//! assert_eq!(plan.files, vec!["core-all.js"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Graph (`graph`)**: A small directed graph with a topological sort that
//!   reports cycles instead of failing on them.
//! - **Manifests (`manifest`, `merge`)**: YAML documents deep-merged into one
//!   data set, read leniently into typed packages, and fingerprinted.
//! - **Cache (`cache`)**: A chain of key/value tiers with write-through and
//!   read promotion, namespaced by the manifest fingerprint.
//! - **Resolver (`resolver`)**: Derived views (package order, file metadata,
//!   bundles, file order) and the request-level operations built on them.
//!
//! ## Execution Flow
//!
//! 1.  **Load**: Each manifest is merged into the data set and the fingerprint
//!     is refreshed.
//! 2.  **Package order**: Packages are sorted by their `Depends` lists.
//! 3.  **File views**: File metadata and dependencies are flattened in package
//!     order; bundles gain any implicit members.
//! 4.  **File order**: Files and bundles are sorted into one load order.
//! 5.  **Requests**: File lists are sorted, checked for conflicts, and packed
//!     into bundles.

pub mod cache;
pub mod defaults;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod merge;
pub mod resolver;

pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestSet};
pub use resolver::{CombinePlan, Resolver};

#[cfg(test)]
mod graph_proptest;
