pub mod graph;
pub mod group;
pub mod hash;
pub mod project;
pub mod resolver;
pub mod tree;

pub use graphdot_error::{Error, ErrorKind, Result};

pub use graph::{DependencyGraph, GraphEdge, GraphNode};
pub use group::group_packages;
pub use hash::Identity;
pub use project::{project_prefixes, same_project};
pub use resolver::{
    CachingResolver, GoListResolver, MemoryResolver, PackageResolver, ResolvedPackage,
};
pub use tree::{BuildOptions, NodeId, PackageNode, PackageTree, TreeBuilder};
