//! Property-based tests for graph sorting and the ordering built on it.
//!
//! These tests use proptest to generate random graphs and verify that
//! invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::cmp::Ordering;
    use std::collections::HashMap;

    use indexmap::IndexMap;
    use proptest::prelude::*;

    use crate::graph::{sort, Graph, SortOutcome};
    use crate::manifest::CombineMember;
    use crate::resolver::combines::expand_implicit;
    use crate::resolver::ordering::{compare_files, file_sort_order};
    use crate::resolver::{CombinesInfo, DependsInfo};

    /// Node count plus arcs that only point from a higher index to a lower
    /// one, which can never form a cycle
    fn dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..16).prop_flat_map(|n| {
            let arcs = prop::collection::vec((0..n, 0..n), 0..40).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| if a > b { (a, b) } else { (b, a) })
                    .collect::<Vec<_>>()
            });
            (Just(n), arcs)
        })
    }

    fn build(n: usize, arcs: &[(usize, usize)]) -> Graph<usize> {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.add_node(i);
        }
        for &(from, to) in arcs {
            graph.connect(from, to);
        }
        graph
    }

    fn file_name(i: usize) -> String {
        format!("f{i}.js")
    }

    fn depends_from(n: usize, arcs: &[(usize, usize)]) -> DependsInfo {
        let mut depends: DependsInfo = (0..n).map(|i| (file_name(i), Vec::new())).collect();
        for &(from, to) in arcs {
            let list = depends.entry(file_name(from)).or_default();
            if !list.contains(&file_name(to)) {
                list.push(file_name(to));
            }
        }
        depends
    }

    // ============================================================================
    // sort property tests
    // ============================================================================

    proptest! {
        /// Property: every arc's target is placed before its source
        #[test]
        fn sort_places_targets_first((n, arcs) in dag()) {
            let graph = build(n, &arcs);
            let order = match sort(&graph) {
                SortOutcome::Sorted(order) => order,
                SortOutcome::Cyclic(rest) => {
                    return Err(TestCaseError::fail(format!("unexpected cycle: {rest:?}")));
                }
            };

            prop_assert_eq!(order.len(), n);
            let position: HashMap<usize, usize> =
                order.iter().enumerate().map(|(pos, node)| (*node, pos)).collect();
            prop_assert_eq!(position.len(), n);
            for (from, to) in arcs {
                prop_assert!(position[&to] < position[&from], "{} must precede {}", to, from);
            }
        }

        /// Property: sorting is deterministic and leaves the graph untouched
        #[test]
        fn sort_is_deterministic((n, arcs) in dag()) {
            let graph = build(n, &arcs);
            let arcs_before = graph.arc_count();
            prop_assert_eq!(sort(&graph), sort(&graph));
            prop_assert_eq!(graph.arc_count(), arcs_before);
        }

        /// Property: closing any path into a loop is reported as a cycle
        #[test]
        fn sort_reports_closed_loop((n, arcs) in dag(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!arcs.is_empty());
            let (from, to) = arcs[pick.index(arcs.len())];
            let mut graph = build(n, &arcs);
            graph.connect(to, from);

            match sort(&graph) {
                SortOutcome::Cyclic(rest) => {
                    prop_assert!(rest.contains(&from));
                    prop_assert!(rest.contains(&to));
                }
                SortOutcome::Sorted(order) => {
                    return Err(TestCaseError::fail(format!("cycle missed: {order:?}")));
                }
            }
        }
    }

    // ============================================================================
    // file ordering property tests
    // ============================================================================

    proptest! {
        /// Property: the file order respects every dependency and the
        /// comparator is antisymmetric
        #[test]
        fn file_order_respects_dependencies((n, arcs) in dag()) {
            let depends = depends_from(n, &arcs);
            let order = file_sort_order(&depends, &CombinesInfo::new()).unwrap();

            for (file, deps) in &depends {
                prop_assert_eq!(compare_files(&order, file, file), Ordering::Equal);
                for dep in deps {
                    prop_assert_eq!(compare_files(&order, dep, file), Ordering::Less);
                    prop_assert_eq!(compare_files(&order, file, dep), Ordering::Greater);
                }
            }
        }
    }

    // ============================================================================
    // implicit member property tests
    // ============================================================================

    proptest! {
        /// Property: expansion reaches a fixed point and keeps explicit members
        #[test]
        fn expand_implicit_is_idempotent(
            (n, arcs) in dag(),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
        ) {
            let depends = depends_from(n, &arcs);
            let mut includes: IndexMap<String, CombineMember> = picks
                .iter()
                .map(|pick| (file_name(pick.index(n)), CombineMember::EXPLICIT))
                .collect();
            let explicit: Vec<String> = includes.keys().cloned().collect();

            expand_implicit(&mut includes, &depends);
            prop_assert_eq!(expand_implicit(&mut includes, &depends), 0);

            for file in &explicit {
                prop_assert!(includes[file].explicit);
            }
            // No outside dependency of a member leads back into the set
            for member in includes.keys() {
                for dep in &depends[member] {
                    if !includes.contains_key(dep) {
                        prop_assert!(!depends[dep].iter().any(|d| includes.contains_key(d)));
                    }
                }
            }
        }
    }
}
