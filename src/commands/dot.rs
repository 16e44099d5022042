//! `pydepin dot` - Export the import graph for Graphviz

use super::{GraphArgs, load_graph};
use crate::core::context::ProjectContext;
use crate::core::error::DepResult;

/// Run the dot command
pub fn run_dot(ctx: &ProjectContext, graph_args: &GraphArgs) -> DepResult<()> {
  let graph = load_graph(ctx, graph_args)?;
  println!("{}", graph.to_dot());
  Ok(())
}
