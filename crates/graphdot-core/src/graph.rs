//! Deduplicated package graph assembled from a (grouped) tree.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::hash::Identity;
use crate::tree::{NodeId, PackageTree};

/// A package in the graph, labelled with its import path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphNode {
    pub id: Identity,
    pub label: String,
}

/// A directed import edge between two packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
    pub from: Identity,
    pub to: Identity,
}

/// Package graph keyed by [`Identity`].
///
/// Iteration order of nodes and edges is unspecified; renderers sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: HashMap<Identity, GraphNode>,
    edges: HashSet<GraphEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from the current dependency lists of `tree`.
    ///
    /// The root is always present unless it is itself a system package. Every
    /// `caller -> dependency` pair reachable from the root contributes both
    /// endpoints and the edge. System packages never appear in dependency
    /// lists and therefore never reach the graph.
    pub fn assemble(tree: &PackageTree) -> Self {
        let mut graph = Self::new();
        let root = tree.root_node();
        if root.is_system {
            return graph;
        }
        graph.add_node(&root.name);

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let caller = tree.node(id);
            for &dep_id in &caller.dependencies {
                let dependency = tree.node(dep_id);
                if caller.is_system || dependency.is_system {
                    continue;
                }
                graph.add_edge(&caller.name, &dependency.name);
                stack.push(dep_id);
            }
        }
        graph
    }

    /// Insert a node; re-adding an existing identity is a no-op.
    pub fn add_node(&mut self, name: &str) -> Identity {
        let id = Identity::of(name);
        self.nodes.entry(id).or_insert_with(|| GraphNode {
            id,
            label: name.to_string(),
        });
        id
    }

    /// Insert both endpoints and the edge between them.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.edges.insert(GraphEdge { from, to });
    }

    pub fn node(&self, id: &Identity) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(&Identity::of(name))
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.contains(&GraphEdge {
            from: Identity::of(from),
            to: Identity::of(to),
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
