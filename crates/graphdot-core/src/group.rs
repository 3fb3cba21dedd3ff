//! Collapse packages of the same project into their importer.
//!
//! Without grouping, every sub-package of a large project shows up as its own
//! hop. The pass walks the tree post-order; when a package belongs to the same
//! project as its caller, the caller drops it and adopts its dependencies.

use tracing::trace;

use crate::project::same_project;
use crate::tree::{NodeId, PackageTree};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Run the grouping pass over the whole tree.
///
/// Only dependency lists are rewritten; no node is removed from the arena.
/// Running the pass a second time changes nothing.
pub fn group_packages(tree: &mut PackageTree) {
    group_node(tree, tree.root());
}

fn group_node(tree: &mut PackageTree, id: NodeId) {
    // Snapshot: rewrites made while visiting children must not change which
    // children get visited.
    let children = tree.dependencies(id).to_vec();
    for child in children {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || group_node(tree, child));
    }

    let Some(caller) = tree.caller(id) else {
        return;
    };

    let node = tree.node(id);
    if !same_project(&node.name, &tree.node(caller).name) {
        return;
    }

    trace!(package = %node.name, into = %tree.node(caller).name, "grouping");
    let mut adopted: Vec<NodeId> = tree
        .dependencies(caller)
        .iter()
        .copied()
        .filter(|dep| tree.node(*dep).name != node.name)
        .collect();
    adopted.extend_from_slice(&node.dependencies);
    tree.set_dependencies(caller, adopted);
}
