//! Conflict detection over a candidate file set

use std::collections::HashSet;

use super::{Conflicts, FileInfo};

/// Map each requested file to the other requested files it declares a
/// conflict with
///
/// Only the declaring side is reported: if `a.js` lists `b.js` but not the
/// other way round, the result holds `a.js -> [b.js]` only. Lookups go
/// through a membership index, so the cost is linear in the request plus
/// the conflicts declared by requested files.
pub fn find_conflicts<S: AsRef<str>>(file_info: &FileInfo, files: &[S]) -> Conflicts {
    let requested: HashSet<&str> = files.iter().map(AsRef::as_ref).collect();
    let mut visited: HashSet<&str> = HashSet::with_capacity(requested.len());
    let mut conflicts = Conflicts::new();

    for file in files.iter().map(AsRef::as_ref) {
        if !visited.insert(file) {
            continue;
        }
        let Some(entry) = file_info.get(file) else {
            continue;
        };
        for other in &entry.conflicts {
            if other != file && requested.contains(other.as_str()) {
                let list = conflicts.entry(file.to_string()).or_default();
                if !list.contains(other) {
                    list.push(other.clone());
                }
            }
        }
    }

    conflicts
}
