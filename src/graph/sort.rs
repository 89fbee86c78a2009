//! Topological sorting (Kahn's algorithm)
//!
//! The sorter works on a clone of the caller's graph because it removes arcs
//! as it goes. Nodes whose in-degree reaches zero are kept on a stack; each
//! popped node is *prepended* to the output, so for every arc `u -> v` the
//! target `v` ends up before `u`. With arcs pointing from a dependent to its
//! dependency this puts leaf dependencies first.
//!
//! The exact pop/prepend order is part of the contract: two graphs with the
//! same nodes and arcs inserted in the same order always sort identically.

use std::collections::VecDeque;
use std::hash::Hash;

use log::trace;

use super::{Graph, NodeId};

/// Result of sorting a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome<T> {
    /// Every node, in load order.
    Sorted(Vec<T>),
    /// Nodes that could not be placed, in insertion order. Every node on a
    /// cycle is included, along with nodes reachable only through one.
    Cyclic(Vec<T>),
}

impl<T> SortOutcome<T> {
    pub fn is_sorted(&self) -> bool {
        matches!(self, SortOutcome::Sorted(_))
    }

    /// Convert into a `Result`, with the unsortable nodes as the error
    pub fn into_result(self) -> Result<Vec<T>, Vec<T>> {
        match self {
            SortOutcome::Sorted(order) => Ok(order),
            SortOutcome::Cyclic(remaining) => Err(remaining),
        }
    }
}

/// Sort `graph` topologically without modifying it
pub fn sort<T: Clone + Eq + Hash>(graph: &Graph<T>) -> SortOutcome<T> {
    let mut work = graph.clone();
    let mut stack: Vec<NodeId> = work
        .node_ids()
        .filter(|&id| work.in_degree(id) == 0)
        .collect();
    let mut sorted: VecDeque<NodeId> = VecDeque::with_capacity(work.len());
    let mut placed = vec![false; work.len()];

    while let Some(id) = stack.pop() {
        sorted.push_front(id);
        placed[id] = true;

        let neighbours = work.node(id).out_arcs().to_vec();
        for neighbour in neighbours {
            work.disconnect(id, neighbour);
            if work.in_degree(neighbour) == 0 {
                stack.push(neighbour);
            }
        }
    }

    if work.node_ids().any(|id| work.out_degree(id) > 0) {
        let remaining: Vec<T> = work
            .node_ids()
            .filter(|&id| !placed[id])
            .map(|id| work.payload(id).clone())
            .collect();
        trace!("sort left {} node(s) on or behind a cycle", remaining.len());
        return SortOutcome::Cyclic(remaining);
    }

    SortOutcome::Sorted(sorted.into_iter().map(|id| graph.payload(id).clone()).collect())
}
