//! File-level import graph
//!
//! Built from discovery + tree-sitter extraction + a resolver backend, stored
//! in petgraph. We own the domain types and queries.

pub mod builder;
pub mod dependency_graph;
pub mod status;

pub use builder::{BuildOptions, BuildStats, GraphBuilder, build_graph};
pub use dependency_graph::{DependencyGraph, FileNode};
pub use status::{ClassifyOptions, Status, StatusMap, classify};
