//! `pydepin inspect` - Show how every file relates to the selected files
//!
//! Builds the import graph of the project, classifies every file against the
//! given roots and prints one line per file:
//! - 🔵 selected
//! - 🟢 descendant (imported by a root, directly or not)
//! - 🟢 ancestor (imports a root, directly or not)
//! - ⚫ ignored boilerplate
//! - ⚪ unrelated

use super::{GraphArgs, build_with_stats};
use crate::core::context::ProjectContext;
use crate::core::error::{DepError, DepResult};
use crate::graph::{BuildStats, ClassifyOptions, DependencyGraph, Status, StatusMap, classify};
use crate::resolve::ResolverBackend;
use crate::utils::normalize_file_id;
use serde_json::json;
use std::str::FromStr;

/// Output format for inspect command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl FromStr for OutputFormat {
  type Err = DepError;

  fn from_str(s: &str) -> DepResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(DepError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, names",
        s
      ))),
    }
  }
}

/// Arguments of `pydepin inspect`
#[derive(Debug, Clone, Default)]
pub struct InspectArgs {
  pub files: Vec<String>,
  pub downstream: bool,
  pub upstream: bool,
  pub only_highlighted: bool,
  pub format: String,
  pub verbose: bool,
  pub graph: GraphArgs,
}

/// Run the inspect command
pub fn run_inspect(ctx: &ProjectContext, args: InspectArgs) -> DepResult<()> {
  let format: OutputFormat = args.format.parse()?;
  let (graph, stats, backend) = build_with_stats(ctx, &args.graph)?;

  let roots: Vec<String> = args
    .files
    .iter()
    .map(|f| normalize_file_id(ctx.project_root(), f))
    .collect();

  let statuses = classify(
    &graph,
    &roots,
    ClassifyOptions::from_flags(args.downstream, args.upstream),
  )
  .map_err(|e| with_suggestions(e, &graph))?;

  if args.verbose {
    eprintln!(
      "{} files, {} edges ({} backend), {} unresolved references, {} unparsable files",
      stats.files, stats.edges, backend, stats.unresolved, stats.parse_failures
    );
  }

  let output = match format {
    OutputFormat::Text => render_text(&statuses, args.only_highlighted),
    OutputFormat::Json => render_json(&roots, &statuses, backend, &stats)?,
    OutputFormat::NamesOnly => render_names(&statuses),
  };
  print!("{}", output);

  Ok(())
}

/// Attach close matches to an `UnknownRoot` error.
pub fn with_suggestions(err: DepError, graph: &DependencyGraph) -> DepError {
  match err {
    DepError::UnknownRoot { missing, .. } => {
      let candidates = graph.node_ids();
      let suggestions = missing
        .iter()
        .map(|bad| {
          let close = similar::get_close_matches(bad.as_str(), &candidates, 3, 0.6)
            .into_iter()
            .map(str::to_string)
            .collect();
          (bad.clone(), close)
        })
        .collect();
      DepError::UnknownRoot { missing, suggestions }
    }
    other => other,
  }
}

/// One line per file, in id order.
pub fn render_text(statuses: &StatusMap, only_highlighted: bool) -> String {
  let mut out = String::new();
  for (id, status) in statuses.iter() {
    if only_highlighted && !status.is_highlighted() {
      continue;
    }
    out.push_str(status.marker());
    out.push(' ');
    out.push_str(id);
    if status == Status::Ancestor {
      out.push_str(" (ancestor)");
    }
    out.push('\n');
  }
  out
}

/// Highlighted ids only, one per line.
pub fn render_names(statuses: &StatusMap) -> String {
  statuses
    .iter()
    .filter(|(_, status)| status.is_highlighted())
    .map(|(id, _)| format!("{}\n", id))
    .collect()
}

pub fn render_json(
  roots: &[String],
  statuses: &StatusMap,
  backend: ResolverBackend,
  stats: &BuildStats,
) -> DepResult<String> {
  let summary: serde_json::Map<String, serde_json::Value> = Status::ALL
    .iter()
    .map(|s| (s.as_str().to_string(), json!(statuses.count(*s))))
    .collect();

  let output = json!({
      "roots": roots,
      "resolver": backend.as_str(),
      "files": statuses,
      "summary": summary,
      "stats": stats,
  });

  Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}
