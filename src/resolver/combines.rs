//! Combine sets: declared bundles, implicit members and request planning
//!
//! ## Implicit members
//!
//! A file outside a bundle is pulled in when a member depends on it *and*
//! it depends back on a member. Such a file glues two members together, so
//! leaving it out would force the bundle to load both before and after it.
//! Files that are merely dependencies of the bundle stay outside.
//!
//! ## Planning
//!
//! [`plan_combines`] is a greedy single pass over the declared bundles,
//! largest first. A bundle is accepted only if it overlaps no accepted
//! bundle, shares at least one file with the request, and keeps the
//! accumulated file set conflict-free. Which bundles win depends on that
//! order when bundles compete for the same files.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::conflicts::find_conflicts;
use super::ordering::packages_in_order;
use super::{CombinesInfo, DependsInfo, FileInfo, SortOrder};
use crate::manifest::{CombineDecl, CombineMember, Package};

/// Outcome of planning a request against the declared bundles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinePlan {
    /// Accepted bundle names, in acceptance order.
    pub combines: Vec<String>,
    /// Requested files plus every member of an accepted bundle.
    pub superset: Vec<String>,
    /// Requested files not covered by a bundle, followed by the bundles.
    pub files: Vec<String>,
}

/// Collect declared bundles, expand implicit members and order them
/// largest first
///
/// A bundle declared by several packages gets the union of their
/// `Includes`; its `Minify` is false if any declaration or any member says
/// so.
pub fn combines_info(
    packages: &IndexMap<String, Package>,
    order: &SortOrder,
    depends: &DependsInfo,
    file_info: &FileInfo,
) -> CombinesInfo {
    let mut info = CombinesInfo::new();
    for (_, package) in packages_in_order(packages, order) {
        for (name, decl) in &package.combines {
            let combine = info.entry(name.clone()).or_insert_with(CombineDecl::default);
            for member in decl.includes.keys() {
                combine
                    .includes
                    .entry(member.clone())
                    .or_insert(CombineMember::EXPLICIT);
            }
            combine.minify &= decl.minify;
        }
    }

    for (name, combine) in info.iter_mut() {
        let added = expand_implicit(&mut combine.includes, depends);
        if added > 0 {
            debug!("Combine {} gained {} implicit member(s)", name, added);
        }
        combine.minify &= combine
            .includes
            .keys()
            .all(|member| file_info.get(member).map_or(true, |entry| entry.minify));
    }

    info.sort_by(|_, a, _, b| b.includes.len().cmp(&a.includes.len()));
    info
}

/// Add implicit members to `includes` until nothing more qualifies
///
/// Each round only looks at the dependencies of the files added by the
/// previous round. When a round adds nothing, one sweep over the whole
/// membership confirms the fixed point. Returns the number of files added.
pub fn expand_implicit(
    includes: &mut IndexMap<String, CombineMember>,
    depends: &DependsInfo,
) -> usize {
    let mut added = 0;
    let mut seed: Vec<String> = includes.keys().cloned().collect();
    let mut full_sweep = true;

    loop {
        let found = implicit_candidates(includes, depends, &seed);
        if found.is_empty() {
            if full_sweep {
                break;
            }
            seed = includes.keys().cloned().collect();
            full_sweep = true;
            continue;
        }

        for file in &found {
            includes.insert(file.clone(), CombineMember::IMPLICIT);
        }
        added += found.len();
        seed = found;
        full_sweep = false;
    }

    added
}

/// Dependencies of `seed` outside the set that themselves depend on a member
fn implicit_candidates(
    includes: &IndexMap<String, CombineMember>,
    depends: &DependsInfo,
    seed: &[String],
) -> Vec<String> {
    let mut outside: IndexSet<&String> = IndexSet::new();
    for file in seed {
        for dependency in depends.get(file).into_iter().flatten() {
            if !includes.contains_key(dependency) {
                outside.insert(dependency);
            }
        }
    }

    outside
        .into_iter()
        .filter(|candidate| {
            depends
                .get(*candidate)
                .is_some_and(|deps| deps.iter().any(|dep| includes.contains_key(dep)))
        })
        .cloned()
        .collect()
}

/// Choose bundles for a request
pub fn plan_combines<S: AsRef<str>>(
    files: &[S],
    combines: &CombinesInfo,
    file_info: &FileInfo,
) -> CombinePlan {
    let requested: HashSet<&str> = files.iter().map(AsRef::as_ref).collect();
    let mut combined_set: HashSet<&str> = HashSet::new();
    let mut superset: Vec<String> = files.iter().map(|f| f.as_ref().to_string()).collect();
    let mut accepted: Vec<String> = Vec::new();

    for (name, combine) in combines {
        let members = &combine.includes;

        if members.keys().any(|m| combined_set.contains(m.as_str())) {
            continue;
        }
        if !members.keys().any(|m| requested.contains(m.as_str())) {
            continue;
        }

        let mut potential = superset.clone();
        potential.extend(members.keys().cloned());
        let conflicts = find_conflicts(file_info, &potential);
        if !conflicts.is_empty() {
            info!(
                "Not combining {}: it would introduce conflicts for {}",
                name,
                conflicts.keys().cloned().collect::<Vec<_>>().join(", ")
            );
            continue;
        }

        combined_set.extend(members.keys().map(String::as_str));
        superset = potential;
        accepted.push(name.clone());
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(superset.len());
    superset.retain(|file| seen.insert(file.clone()));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut deliverables: Vec<String> = files
        .iter()
        .map(AsRef::as_ref)
        .filter(|file| !combined_set.contains(file) && seen.insert(*file))
        .map(str::to_string)
        .collect();
    deliverables.extend(accepted.iter().cloned());

    CombinePlan {
        combines: accepted,
        superset,
        files: deliverables,
    }
}
