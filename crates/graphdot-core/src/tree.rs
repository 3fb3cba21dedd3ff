//! Dependency tree construction.
//!
//! The tree is built depth-first from a root package. Packages reachable along
//! several import paths appear once per path; [`crate::graph::DependencyGraph`]
//! merges them afterwards.
//!
//! Nodes live in a flat arena ([`PackageTree`]) and refer to each other by
//! [`NodeId`]. `dependencies` is the owning parent → child relation, `caller`
//! the non-owning child → parent back-reference used by the grouping pass.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use graphdot_error::Result;

use crate::hash::Identity;
use crate::resolver::{CGO_PSEUDO_PACKAGE, PackageResolver};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Index of a node in a [`PackageTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One occurrence of a package in the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub name: String,
    pub identity: Identity,
    /// Standard-library package; never expanded, never part of the graph.
    pub is_system: bool,
    /// Re-entry of a package that is still being expanded higher up (an import
    /// cycle). Kept as a leaf so the cycle shows up as an edge.
    pub back_edge: bool,
    pub caller: Option<NodeId>,
    pub dependencies: Vec<NodeId>,
}

impl PackageNode {
    fn new(name: String, caller: Option<NodeId>) -> Self {
        Self {
            identity: Identity::of(&name),
            name,
            is_system: false,
            back_edge: false,
            caller,
            dependencies: Vec::new(),
        }
    }
}

/// Arena of package nodes with a designated root.
#[derive(Debug, Clone)]
pub struct PackageTree {
    nodes: Vec<PackageNode>,
    root: NodeId,
}

impl PackageTree {
    /// Create a tree holding only a root package.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            nodes: vec![PackageNode::new(root.into(), None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &PackageNode {
        self.node(self.root)
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &PackageNode {
        &self.nodes[id.index()]
    }

    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).dependencies
    }

    pub fn caller(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).caller
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in allocation (pre-order) order, including system packages.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PackageNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx as u32), node))
    }

    /// Append a child to `caller`. System children are recorded in the arena
    /// but not in the caller's dependency list.
    pub fn add_child(
        &mut self,
        caller: NodeId,
        name: impl Into<String>,
        is_system: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = PackageNode::new(name.into(), Some(caller));
        node.is_system = is_system;
        self.nodes.push(node);
        if !is_system {
            self.nodes[caller.index()].dependencies.push(id);
        }
        id
    }

    pub(crate) fn set_dependencies(&mut self, id: NodeId, dependencies: Vec<NodeId>) {
        self.nodes[id.index()].dependencies = dependencies;
    }

    /// Names of all packages reachable from the root through the current
    /// dependency lists, the root included.
    pub fn reachable_names(&self) -> BTreeSet<&str> {
        let mut seen = HashSet::new();
        let mut names = BTreeSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.node(id);
            names.insert(node.name.as_str());
            stack.extend(node.dependencies.iter().rev().copied());
        }
        names
    }

    fn graft(&mut self, caller: Option<NodeId>, subtree: Subtree) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = PackageNode::new(subtree.name, caller);
        node.is_system = subtree.is_system;
        node.back_edge = subtree.back_edge;
        self.nodes.push(node);

        let mut dependencies = Vec::with_capacity(subtree.children.len());
        for child in subtree.children {
            let is_system = child.is_system;
            let child_id = self.graft(Some(id), child);
            if !is_system {
                dependencies.push(child_id);
            }
        }
        self.nodes[id.index()].dependencies = dependencies;
        id
    }
}

/// Options for [`TreeBuilder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Also expand the root package's test imports.
    pub include_tests: bool,
    /// Resolve sibling imports concurrently.
    pub parallel: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Owned result of expanding one import; merged into the arena once complete.
#[derive(Debug)]
struct Subtree {
    name: String,
    is_system: bool,
    back_edge: bool,
    children: Vec<Subtree>,
}

impl Subtree {
    fn leaf(name: String) -> Self {
        Self {
            name,
            is_system: false,
            back_edge: false,
            children: Vec::new(),
        }
    }
}

/// Packages currently being expanded, innermost first.
struct Ancestors<'a> {
    name: &'a str,
    parent: Option<&'a Ancestors<'a>>,
}

impl Ancestors<'_> {
    fn contains(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(frame) = current {
            if frame.name == name {
                return true;
            }
            current = frame.parent;
        }
        false
    }
}

/// Builds a [`PackageTree`] by recursively resolving imports.
pub struct TreeBuilder<R> {
    resolver: R,
    options: BuildOptions,
}

impl<R: PackageResolver> TreeBuilder<R> {
    pub fn new(resolver: R, options: BuildOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolve `root` in `work_dir` and expand everything it imports.
    ///
    /// Any resolver error aborts the whole build.
    pub fn build(&self, root: &str, work_dir: &Path) -> Result<PackageTree> {
        let start = Instant::now();
        let ctx = BuildCtx {
            resolver: &self.resolver,
            options: self.options,
            work_dir: work_dir.to_path_buf(),
        };

        let subtree = ctx
            .expand(root, true, None)
            .map_err(|err| err.with_operation("tree::build"))?
            .unwrap_or_else(|| Subtree::leaf(root.to_string()));

        let mut tree = PackageTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.graft(None, subtree);

        info!(
            root = %tree.root_node().name,
            nodes = tree.len(),
            "Dependency tree: {:.2}s",
            start.elapsed().as_secs_f64()
        );
        Ok(tree)
    }
}

struct BuildCtx<'r, R> {
    resolver: &'r R,
    options: BuildOptions,
    work_dir: PathBuf,
}

impl<R: PackageResolver> BuildCtx<'_, R> {
    fn expand(
        &self,
        import_path: &str,
        is_root: bool,
        ancestors: Option<&Ancestors<'_>>,
    ) -> Result<Option<Subtree>> {
        if import_path == CGO_PSEUDO_PACKAGE {
            return Ok(None);
        }

        if ancestors.is_some_and(|frames| frames.contains(import_path)) {
            warn!(import_path, "import cycle, not expanding again");
            let mut node = Subtree::leaf(import_path.to_string());
            node.back_edge = true;
            return Ok(Some(node));
        }

        let resolved = self.resolver.resolve(import_path, &self.work_dir)?;
        let name = if is_root {
            resolved.import_path
        } else {
            import_path.to_string()
        };

        if resolved.is_system {
            return Ok(Some(Subtree {
                name,
                is_system: true,
                back_edge: false,
                children: Vec::new(),
            }));
        }

        let mut imports = resolved.imports;
        if is_root && self.options.include_tests {
            for path in resolved.test_imports {
                if path != name && !imports.contains(&path) {
                    imports.push(path);
                }
            }
        }
        debug!(package = %name, imports = imports.len(), "expanding");

        let frame = Ancestors {
            name: &name,
            parent: ancestors,
        };

        let expanded: Vec<Option<Subtree>> = if self.options.parallel {
            imports
                .par_iter()
                .map(|path| self.expand_child(path, &frame))
                .collect::<Result<_>>()?
        } else {
            imports
                .iter()
                .map(|path| self.expand_child(path, &frame))
                .collect::<Result<_>>()?
        };

        Ok(Some(Subtree {
            name,
            is_system: false,
            back_edge: false,
            children: expanded.into_iter().flatten().collect(),
        }))
    }

    fn expand_child(&self, import_path: &str, frame: &Ancestors<'_>) -> Result<Option<Subtree>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.expand(import_path, false, Some(frame))
        })
    }
}
