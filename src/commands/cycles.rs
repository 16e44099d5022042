//! `pydepin cycles` - List groups of files that import each other

use super::{GraphArgs, load_graph};
use crate::core::context::ProjectContext;
use crate::core::error::DepResult;

/// Run the cycles command
pub fn run_cycles(ctx: &ProjectContext, graph_args: &GraphArgs, json: bool) -> DepResult<()> {
  let graph = load_graph(ctx, graph_args)?;
  let cycles = graph.find_cycles();

  if json {
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "cycles": cycles }))?);
  } else {
    print!("{}", render_cycles(&cycles));
  }
  Ok(())
}

pub fn render_cycles(cycles: &[Vec<String>]) -> String {
  if cycles.is_empty() {
    return "✅ No circular imports\n".to_string();
  }

  let mut out = format!("🔁 {} circular import group(s)\n", cycles.len());
  for (n, group) in cycles.iter().enumerate() {
    out.push_str(&format!("\n{}. {} files\n", n + 1, group.len()));
    for id in group {
      out.push_str(&format!("   {}\n", id));
    }
  }
  out
}
