//! CLI commands for pydepin
//!
//! - **inspect**: classify every file against the selected files
//! - **why**: shortest import chain between two files
//! - **cycles**: circular import groups
//! - **dot**: Graphviz export of the import graph
//!
//! All commands accept `&ProjectContext` so the root is validated and the
//! config loaded exactly once.

pub mod cycles;
pub mod dot;
pub mod inspect;
pub mod why;

pub use cycles::run_cycles;
pub use dot::run_dot;
pub use inspect::{InspectArgs, run_inspect};
pub use why::run_why;

use crate::core::context::ProjectContext;
use crate::core::error::DepResult;
use crate::graph::{BuildStats, DependencyGraph, GraphBuilder};
use crate::resolve::ResolverBackend;

/// Graph-shaping flags shared by the query commands
#[derive(Debug, Clone, Default)]
pub struct GraphArgs {
  pub show_ignored: bool,
  pub resolver: Option<String>,
  pub jobs: Option<usize>,
}

/// Build the graph for a query command.
pub(crate) fn load_graph(ctx: &ProjectContext, args: &GraphArgs) -> DepResult<DependencyGraph> {
  build_with_stats(ctx, args).map(|(graph, _, _)| graph)
}

/// Build the graph, keeping the diagnostics and the backend that was used.
pub(crate) fn build_with_stats(
  ctx: &ProjectContext,
  args: &GraphArgs,
) -> DepResult<(DependencyGraph, BuildStats, ResolverBackend)> {
  let backend = args
    .resolver
    .as_deref()
    .map(str::parse::<ResolverBackend>)
    .transpose()?;
  let options = ctx.build_options(args.show_ignored, backend, args.jobs);
  let (graph, stats) = GraphBuilder::new(ctx.project_root(), &options).build()?;
  Ok((graph, stats, options.backend))
}
