//! Status classification
//!
//! Given a set of root files, label every node of the graph:
//! - `selected`: one of the roots
//! - `descendant`: reachable from a root by following imports
//! - `ancestor`: reaches a root by following imports
//! - `ignored`: boilerplate file not reached either way
//! - `unrelated`: everything else
//!
//! Labels are assigned in that priority order, so a root that sits in a cycle
//! is still `selected`, and a file both imported by and importing the roots
//! is a `descendant`.

use super::dependency_graph::DependencyGraph;
use crate::core::error::{DepError, DepResult};
use petgraph::Direction;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Role of a file relative to the roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Selected,
  Descendant,
  Ancestor,
  Ignored,
  Unrelated,
}

impl Status {
  pub const ALL: [Status; 5] = [
    Status::Selected,
    Status::Descendant,
    Status::Ancestor,
    Status::Ignored,
    Status::Unrelated,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Status::Selected => "selected",
      Status::Descendant => "descendant",
      Status::Ancestor => "ancestor",
      Status::Ignored => "ignored",
      Status::Unrelated => "unrelated",
    }
  }

  /// Terminal marker used by text output
  pub fn marker(self) -> &'static str {
    match self {
      Status::Selected => "🔵",
      Status::Descendant | Status::Ancestor => "🟢",
      Status::Ignored => "⚫",
      Status::Unrelated => "⚪",
    }
  }

  /// Selected, descendant or ancestor
  pub fn is_highlighted(self) -> bool {
    matches!(self, Status::Selected | Status::Descendant | Status::Ancestor)
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Which directions to traverse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
  pub descendants: bool,
  pub ancestors: bool,
}

impl Default for ClassifyOptions {
  fn default() -> Self {
    Self {
      descendants: true,
      ancestors: true,
    }
  }
}

impl ClassifyOptions {
  /// `-d` / `-u` flags; asking for neither means both.
  pub fn from_flags(downstream: bool, upstream: bool) -> Self {
    if !downstream && !upstream {
      return Self::default();
    }
    Self {
      descendants: downstream,
      ancestors: upstream,
    }
  }
}

/// Status of every node, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusMap {
  statuses: BTreeMap<String, Status>,
}

impl StatusMap {
  pub fn get(&self, id: &str) -> Option<Status> {
    self.statuses.get(id).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, Status)> {
    self.statuses.iter().map(|(id, status)| (id.as_str(), *status))
  }

  /// Ids carrying `status`, sorted.
  pub fn with_status(&self, status: Status) -> Vec<&str> {
    self.iter().filter(|(_, s)| *s == status).map(|(id, _)| id).collect()
  }

  pub fn count(&self, status: Status) -> usize {
    self.statuses.values().filter(|s| **s == status).count()
  }

  pub fn len(&self) -> usize {
    self.statuses.len()
  }

  pub fn is_empty(&self) -> bool {
    self.statuses.is_empty()
  }
}

/// Classify every node of `graph` against `roots`.
///
/// # Errors
/// - [`DepError::NoRoots`] when `roots` is empty
/// - [`DepError::UnknownRoot`] listing every root that is not a node
pub fn classify(graph: &DependencyGraph, roots: &[String], options: ClassifyOptions) -> DepResult<StatusMap> {
  if roots.is_empty() {
    return Err(DepError::NoRoots);
  }

  let missing: Vec<String> = roots.iter().filter(|r| !graph.contains(r)).cloned().collect();
  if !missing.is_empty() {
    return Err(DepError::UnknownRoot {
      missing,
      suggestions: Vec::new(),
    });
  }

  let starts = roots.iter().map(|r| graph.find_node(r)).collect::<DepResult<Vec<_>>>()?;

  let descendants = if options.descendants {
    graph.reachable(&starts, Direction::Outgoing)
  } else {
    Default::default()
  };
  let ancestors = if options.ancestors {
    graph.reachable(&starts, Direction::Incoming)
  } else {
    Default::default()
  };

  let mut statuses = BTreeMap::new();
  for node in graph.nodes() {
    statuses.insert(node.id.clone(), Status::Unrelated);
    if node.ignored {
      statuses.insert(node.id.clone(), Status::Ignored);
    }
  }
  for idx in &ancestors {
    statuses.insert(graph.id_of(*idx).to_string(), Status::Ancestor);
  }
  for idx in &descendants {
    statuses.insert(graph.id_of(*idx).to_string(), Status::Descendant);
  }
  for root in roots {
    statuses.insert(root.clone(), Status::Selected);
  }

  tracing::debug!(
    roots = roots.len(),
    descendants = descendants.len(),
    ancestors = ancestors.len(),
    "classified graph"
  );

  Ok(StatusMap { statuses })
}
