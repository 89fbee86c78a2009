//! Minimal arena-backed directed graph
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]; arcs are stored as
//! id lists on each node, so cloning a graph is a plain deep copy and no node
//! ever holds a reference to its owner. Payloads are deduplicated: adding an
//! equal payload twice returns the existing node.
//!
//! The graph carries no ordering policy of its own. See [`sort`] for the
//! topological sorter built on top of it.

pub mod sort;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

pub use sort::{sort, SortOutcome};

/// Index of a node inside its [`Graph`].
pub type NodeId = usize;

/// A node and its arcs
#[derive(Debug, Clone)]
pub struct Node<T> {
    payload: T,
    out_arcs: Vec<NodeId>,
    in_arcs: Vec<NodeId>,
}

impl<T> Node<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Nodes this node has arcs to, in connection order.
    pub fn out_arcs(&self) -> &[NodeId] {
        &self.out_arcs
    }

    /// Nodes with arcs to this node, in connection order.
    pub fn in_arcs(&self) -> &[NodeId] {
        &self.in_arcs
    }
}

/// Directed (or undirected) graph over deduplicated payloads
#[derive(Debug, Clone)]
pub struct Graph<T> {
    directed: bool,
    nodes: Vec<Node<T>>,
    index: HashMap<T, NodeId>,
}

impl<T: Clone + Eq + Hash> Graph<T> {
    /// Create an empty directed graph
    pub fn new() -> Self {
        Self {
            directed: true,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty undirected graph, where every arc gets a reverse twin
    pub fn undirected() -> Self {
        Self {
            directed: false,
            ..Self::new()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a node for `payload`, returning the existing id if already present
    pub fn add_node(&mut self, payload: T) -> NodeId {
        if let Some(&id) = self.index.get(&payload) {
            return id;
        }
        let id = self.nodes.len();
        self.index.insert(payload.clone(), id);
        self.nodes.push(Node {
            payload,
            out_arcs: Vec::new(),
            in_arcs: Vec::new(),
        });
        id
    }

    /// Look up the node holding `payload`
    pub fn node_id(&self, payload: &T) -> Option<NodeId> {
        self.index.get(payload).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id]
    }

    pub fn payload(&self, id: NodeId) -> &T {
        &self.nodes[id].payload
    }

    /// Connect `from` to `to`. Repeated calls are no-ops.
    pub fn connect(&mut self, from: NodeId, to: NodeId) {
        self.add_arc(from, to);
        if !self.directed {
            self.add_arc(to, from);
        }
    }

    /// Add both payloads (if needed) and connect them
    pub fn connect_payloads(&mut self, from: T, to: T) -> (NodeId, NodeId) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.connect(from, to);
        (from, to)
    }

    /// Remove the arc from `from` to `to` (and its twin in undirected graphs)
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) {
        self.remove_arc(from, to);
        if !self.directed {
            self.remove_arc(to, from);
        }
    }

    pub fn has_arc(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes[from].out_arcs.contains(&to)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.nodes[id].out_arcs.len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.nodes[id].in_arcs.len()
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len()
    }

    /// Payloads in insertion order
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().map(|node| &node.payload)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of arcs
    pub fn arc_count(&self) -> usize {
        self.nodes.iter().map(|node| node.out_arcs.len()).sum()
    }

    fn add_arc(&mut self, from: NodeId, to: NodeId) {
        if self.nodes[from].out_arcs.contains(&to) {
            return;
        }
        self.nodes[from].out_arcs.push(to);
        self.nodes[to].in_arcs.push(from);
    }

    fn remove_arc(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from].out_arcs.retain(|&id| id != to);
        self.nodes[to].in_arcs.retain(|&id| id != from);
    }
}

impl<T: Clone + Eq + Hash> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node.payload)?;
            let arrow = if self.directed { "->" } else { "--" };
            for (i, &target) in node.out_arcs.iter().enumerate() {
                let sep = if i == 0 { format!(" {} ", arrow) } else { ", ".to_string() };
                write!(f, "{}{}", sep, self.nodes[target].payload)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
