//! Rendering of a [`DependencyGraph`] for external consumers.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT builder with sorted, deduplicated declarations
//! - [`props`]: graph properties written at the top of the `digraph` block
//!
//! DOT output is canonical: for the same graph the text is byte-identical no
//! matter in which order packages were discovered.

pub mod dot;
pub mod props;

use std::fmt::Write;

use serde::Serialize;

use graphdot_core::{DependencyGraph, GraphEdge, GraphNode, NodeId, PackageTree};
use graphdot_error::{Error, ErrorKind, Result};

pub use dot::DotBuilder;
pub use props::{DEFAULT_PROPS, GraphHeader, GraphProps};

// ============================================================================
// Public API
// ============================================================================

/// Render the graph as a Graphviz `digraph`.
///
/// Nodes are declared as `"<identity>" [label="<import path>"];` and edges as
/// `"<identity>" -> "<identity>";`. Both groups are sorted by their text,
/// nodes first.
pub fn render_dot(graph: &DependencyGraph, header: &GraphHeader) -> String {
    let mut dot = DotBuilder::new();
    header.write_to(&mut dot);

    for node in graph.nodes() {
        dot.node(&node.id.to_hex(), &node.label);
    }
    for edge in graph.edges() {
        dot.edge(&edge.from.to_hex(), &edge.to.to_hex());
    }

    dot.build()
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<&'a GraphNode>,
    edges: Vec<&'a GraphEdge>,
}

/// Render the graph as pretty-printed JSON with sorted nodes and edges.
pub fn render_json(graph: &DependencyGraph) -> Result<String> {
    let mut nodes: Vec<&GraphNode> = graph.nodes().collect();
    nodes.sort_unstable_by(|a, b| a.id.cmp(&b.id));
    let mut edges: Vec<&GraphEdge> = graph.edges().collect();
    edges.sort_unstable();

    let mut json = serde_json::to_string_pretty(&JsonGraph { nodes, edges }).map_err(|err| {
        Error::new(ErrorKind::SerializationFailed, err.to_string())
            .with_operation("render::json")
            .set_source(err)
    })?;
    json.push('\n');
    Ok(json)
}

/// List the tree's current edges as `caller -> dependency` lines.
///
/// Lines follow the traversal order from the root, so the listing shows the
/// shape of the tree after grouping rather than a canonical graph.
pub fn render_tree_listing(tree: &PackageTree) -> String {
    let mut output = String::new();
    write_listing(tree, tree.root(), &mut output);
    output
}

fn write_listing(tree: &PackageTree, id: NodeId, output: &mut String) {
    let node = tree.node(id);
    for &dep in &node.dependencies {
        let _ = writeln!(output, "{} -> {}", node.name, tree.node(dep).name);
        write_listing(tree, dep, output);
    }
}
