//! Package and file load order
//!
//! Both orders come from the same recipe: build a [`Graph`] whose arcs point
//! from a dependent to what it needs, sort it, and number the result. Rank 0
//! loads first.
//!
//! The file graph also holds one node per combine set. Each member file
//! points at its combine node and the combine node points at the members'
//! external dependencies, so a bundle sorts after everything it consumes
//! and before anything that uses one of its members.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::{CombinesInfo, DependsInfo, SortOrder};
use crate::defaults::SITE_PACKAGE;
use crate::error::{Error, GraphKind, Result};
use crate::graph::{sort, Graph};
use crate::manifest::Package;

/// Rank packages by their `Depends` lists, with `__site__` last
pub fn package_sort_order(packages: &IndexMap<String, Package>) -> Result<SortOrder> {
    let mut graph = Graph::new();
    for (id, package) in packages {
        if id == SITE_PACKAGE {
            continue;
        }
        let node = graph.add_node(id.clone());
        for dependency in &package.depends {
            if dependency == SITE_PACKAGE {
                continue;
            }
            let target = graph.add_node(dependency.clone());
            graph.connect(node, target);
        }
    }

    let sorted = sort(&graph)
        .into_result()
        .map_err(|remaining| Error::CyclicDependency {
            graph: GraphKind::Package,
            nodes: remaining.join(", "),
        })?;

    let mut order = rank(sorted);
    if packages.contains_key(SITE_PACKAGE) {
        let last = order.len();
        order.insert(SITE_PACKAGE.to_string(), last);
    }
    debug!("Computed package sort order for {} package(s)", order.len());
    Ok(order)
}

/// Packages in load order; packages missing from `order` keep their
/// relative position at the end
pub fn packages_in_order<'a>(
    packages: &'a IndexMap<String, Package>,
    order: &SortOrder,
) -> Vec<(&'a String, &'a Package)> {
    let mut ordered: Vec<_> = packages.iter().collect();
    ordered.sort_by_key(|(id, _)| order.get(*id).copied().unwrap_or(usize::MAX));
    ordered
}

/// Flatten each file's hard and optional dependencies
///
/// Packages are walked in load order so that a file declared by several
/// packages accumulates its dependencies deterministically.
pub fn depends_info(packages: &IndexMap<String, Package>, order: &SortOrder) -> DependsInfo {
    let mut info = DependsInfo::new();
    for (_, package) in packages_in_order(packages, order) {
        for (file, entry) in &package.provides {
            let depends = info.entry(file.clone()).or_default();
            for dependency in entry.all_depends() {
                if !depends.contains(dependency) {
                    depends.push(dependency.clone());
                }
            }
        }
    }
    info
}

/// Rank every file and combine set
pub fn file_sort_order(depends: &DependsInfo, combines: &CombinesInfo) -> Result<SortOrder> {
    let mut graph = Graph::new();
    for (file, dependencies) in depends {
        let node = graph.add_node(file.clone());
        for dependency in dependencies {
            let target = graph.add_node(dependency.clone());
            graph.connect(node, target);
        }
    }

    for (name, combine) in combines {
        let combine_node = graph.add_node(name.clone());

        let mut external: IndexSet<&String> = IndexSet::new();
        for member in combine.includes.keys() {
            for dependency in depends.get(member).into_iter().flatten() {
                if !combine.includes.contains_key(dependency) {
                    external.insert(dependency);
                }
            }
        }
        for dependency in external {
            let target = graph.add_node(dependency.clone());
            graph.connect(combine_node, target);
        }

        for member in combine.includes.keys() {
            let member_node = graph.add_node(member.clone());
            graph.connect(member_node, combine_node);
        }
    }

    let sorted = sort(&graph)
        .into_result()
        .map_err(|remaining| Error::CyclicDependency {
            graph: GraphKind::File,
            nodes: remaining.join(", "),
        })?;
    debug!("Computed file sort order for {} node(s)", sorted.len());
    Ok(rank(sorted))
}

/// Compare two paths by rank; unknown paths sort after known ones
pub fn compare_files(order: &SortOrder, a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (order.get(a), order.get(b)) {
        (Some(rank_a), Some(rank_b)) => rank_a.cmp(rank_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn rank(sorted: Vec<String>) -> SortOrder {
    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, item)| (item, rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{CombineDecl, CombineMember, FileEntry};

    fn package(depends: &[&str]) -> Package {
        Package {
            depends: depends.iter().map(|d| d.to_string()).collect(),
            ..Package::default()
        }
    }

    fn providing(id: &str, files: &[(&str, &[&str])]) -> Package {
        let mut package = Package::default();
        for (file, depends) in files {
            let mut entry = FileEntry::new(id);
            entry.depends = depends.iter().map(|d| d.to_string()).collect();
            package.provides.insert(file.to_string(), entry);
        }
        package
    }

    fn combine(members: &[&str]) -> CombineDecl {
        CombineDecl {
            includes: members
                .iter()
                .map(|m| (m.to_string(), CombineMember::EXPLICIT))
                .collect(),
            minify: true,
        }
    }

    #[test]
    fn test_package_order_dependencies_first() {
        let mut packages = IndexMap::new();
        packages.insert("widgets".to_string(), package(&["core"]));
        packages.insert("core".to_string(), package(&[]));

        let order = package_sort_order(&packages).unwrap();
        assert!(order["core"] < order["widgets"]);
    }

    #[test]
    fn test_package_order_site_is_last() {
        let mut packages = IndexMap::new();
        packages.insert(SITE_PACKAGE.to_string(), package(&["widgets"]));
        packages.insert("widgets".to_string(), package(&["core"]));
        packages.insert("core".to_string(), package(&[SITE_PACKAGE]));

        let order = package_sort_order(&packages).unwrap();
        assert_eq!(order[SITE_PACKAGE], 2);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_package_order_without_site() {
        let mut packages = IndexMap::new();
        packages.insert("core".to_string(), package(&[]));
        let order = package_sort_order(&packages).unwrap();
        assert!(!order.contains_key(SITE_PACKAGE));
    }

    #[test]
    fn test_package_cycle_is_reported() {
        let mut packages = IndexMap::new();
        packages.insert("a".to_string(), package(&["b"]));
        packages.insert("b".to_string(), package(&["a"]));

        let err = package_sort_order(&packages).unwrap_err();
        match err {
            Error::CyclicDependency { graph, nodes } => {
                assert_eq!(graph, GraphKind::Package);
                assert_eq!(nodes, "a, b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_depends_info_accumulates_in_package_order() {
        let mut packages = IndexMap::new();
        packages.insert("late".to_string(), {
            let mut p = providing("late", &[("shared.js", &["late.js"])]);
            p.depends = vec!["early".to_string()];
            p
        });
        packages.insert(
            "early".to_string(),
            providing("early", &[("shared.js", &["early.js"])]),
        );

        let order = package_sort_order(&packages).unwrap();
        let info = depends_info(&packages, &order);
        assert_eq!(info["shared.js"], vec!["early.js", "late.js"]);
    }

    #[test]
    fn test_depends_info_includes_optional() {
        let mut entry = FileEntry::new("core");
        entry.depends = vec!["a.js".to_string()];
        entry.optional_depends = vec!["b.js".to_string(), "a.js".to_string()];
        let mut core = Package::default();
        core.provides.insert("c.js".to_string(), entry);
        let mut packages = IndexMap::new();
        packages.insert("core".to_string(), core);

        let order = package_sort_order(&packages).unwrap();
        let info = depends_info(&packages, &order);
        assert_eq!(info["c.js"], vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_file_order_with_combine() {
        let mut depends = DependsInfo::new();
        depends.insert("base.js".to_string(), vec![]);
        depends.insert("a.js".to_string(), vec!["base.js".to_string()]);
        depends.insert("b.js".to_string(), vec!["a.js".to_string()]);
        depends.insert("app.js".to_string(), vec!["b.js".to_string()]);
        let mut combines = CombinesInfo::new();
        combines.insert("bundle.js".to_string(), combine(&["a.js", "b.js"]));

        let order = file_sort_order(&depends, &combines).unwrap();
        assert!(order["base.js"] < order["bundle.js"]);
        assert!(order["bundle.js"] < order["a.js"]);
        assert!(order["a.js"] < order["b.js"]);
        assert!(order["b.js"] < order["app.js"]);
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn test_file_cycle_is_reported() {
        let mut depends = DependsInfo::new();
        depends.insert("a.js".to_string(), vec!["b.js".to_string()]);
        depends.insert("b.js".to_string(), vec!["a.js".to_string()]);

        let err = file_sort_order(&depends, &CombinesInfo::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::CyclicDependency {
                graph: GraphKind::File,
                ..
            }
        ));
    }

    #[test]
    fn test_compare_files() {
        let order = rank(vec!["a.js".to_string(), "b.js".to_string()]);
        assert_eq!(compare_files(&order, "a.js", "a.js"), Ordering::Equal);
        assert_eq!(compare_files(&order, "a.js", "b.js"), Ordering::Less);
        assert_eq!(compare_files(&order, "b.js", "a.js"), Ordering::Greater);
        assert_eq!(compare_files(&order, "zzz.js", "a.js"), Ordering::Greater);
        assert_eq!(compare_files(&order, "a.js", "zzz.js"), Ordering::Less);
        assert_eq!(compare_files(&order, "x.js", "y.js"), Ordering::Equal);
    }
}
