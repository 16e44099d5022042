//! pydepin - see which Python files a change reaches, and which reach it
//!
//! ```text
//! discovery -> imports (tree-sitter) -> resolve (heuristic | semantic)
//!           -> graph::builder -> DependencyGraph -> graph::status::classify
//! ```
//!
//! The binary in `main.rs` is a thin clap front end over this library.

pub mod commands;
pub mod core;
pub mod discovery;
pub mod graph;
pub mod imports;
pub mod resolve;
pub mod utils;

pub use crate::core::context::ProjectContext;
pub use crate::core::error::{DepError, DepResult, ExitCode};
pub use crate::graph::{
  BuildOptions, BuildStats, ClassifyOptions, DependencyGraph, FileNode, GraphBuilder, Status, StatusMap, build_graph,
  classify,
};
pub use crate::resolve::ResolverBackend;
pub use crate::utils::normalize_file_id;
