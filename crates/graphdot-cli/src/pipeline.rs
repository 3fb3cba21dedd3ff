//! Core processing pipeline: resolve → build tree → group → assemble.

use std::time::Instant;

use tracing::info;

use graphdot_core::{
    DependencyGraph, PackageResolver, PackageTree, Result, TreeBuilder, group_packages,
};
use graphdot_dot::render_tree_listing;

use crate::GraphdotOptions;

/// Name under which the package in the target directory is resolved.
const CURRENT_PACKAGE: &str = ".";

/// Build the dependency graph of the package in `opts.dir`.
///
/// 1. Resolve the root package and expand its imports into a tree
/// 2. Collapse same-project hops (unless disabled)
/// 3. Assemble the deduplicated graph
pub fn build_graph<R: PackageResolver>(
    opts: &GraphdotOptions,
    resolver: R,
) -> Result<(PackageTree, DependencyGraph)> {
    // 1. Tree
    let builder = TreeBuilder::new(resolver, opts.build);
    let mut tree = builder.build(CURRENT_PACKAGE, &opts.dir)?;

    // 2. Grouping
    if opts.group {
        let group_start = Instant::now();
        group_packages(&mut tree);
        info!("Grouping: {:.2}s", group_start.elapsed().as_secs_f64());
    }

    if opts.print_tree {
        eprint!("{}", render_tree_listing(&tree));
    }

    // 3. Graph
    let assemble_start = Instant::now();
    let graph = DependencyGraph::assemble(&tree);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph assembly: {:.2}s",
        assemble_start.elapsed().as_secs_f64()
    );

    Ok((tree, graph))
}
