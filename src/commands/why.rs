//! `pydepin why` - Explain how one file ends up depending on another

use super::{GraphArgs, load_graph};
use crate::core::context::ProjectContext;
use crate::core::error::DepResult;
use crate::utils::normalize_file_id;

/// Run the why command
pub fn run_why(ctx: &ProjectContext, graph_args: &GraphArgs, from: &str, to: &str) -> DepResult<()> {
  let graph = load_graph(ctx, graph_args)?;
  let from = normalize_file_id(ctx.project_root(), from);
  let to = normalize_file_id(ctx.project_root(), to);

  let path = graph
    .dependency_path(&from, &to)
    .map_err(|e| super::inspect::with_suggestions(e, &graph))?;
  print!("{}", render_path(&from, &to, path.as_deref()));
  Ok(())
}

pub fn render_path(from: &str, to: &str, path: Option<&[String]>) -> String {
  match path {
    Some(chain) => {
      let mut out = String::new();
      for (depth, id) in chain.iter().enumerate() {
        if depth == 0 {
          out.push_str(&format!("{}\n", id));
        } else {
          out.push_str(&format!("{}└─ {}\n", "   ".repeat(depth - 1), id));
        }
      }
      out
    }
    None => format!("{} does not depend on {}\n", from, to),
  }
}
