//! Flattened per-file metadata

use indexmap::IndexMap;

use super::ordering::packages_in_order;
use super::{CombinesInfo, FileInfo, SortOrder};
use crate::manifest::Package;

/// Every provided file with its metadata and owning package
///
/// Packages are walked in load order; when several packages provide the
/// same file the last one wins.
pub fn file_info(packages: &IndexMap<String, Package>, order: &SortOrder) -> FileInfo {
    let mut info = FileInfo::new();
    for (_, package) in packages_in_order(packages, order) {
        for (file, entry) in &package.provides {
            info.insert(file.clone(), entry.clone());
        }
    }
    info
}

/// Whether `path` (a file or a bundle name) should be minified
///
/// Bundle flags take precedence over file flags; unknown paths default to
/// `true`, like an undeclared `Minify`.
pub fn is_minified(file_info: &FileInfo, combines: &CombinesInfo, path: &str) -> bool {
    if let Some(combine) = combines.get(path) {
        return combine.minify;
    }
    file_info.get(path).map_or(true, |entry| entry.minify)
}
