//! Import resolution - map a dotted reference to at most one project file
//!
//! Two interchangeable backends sit behind [`ModuleResolver`]:
//!
//! - [`PathResolver`]: the default path heuristic. Cheap, stateless, safe to
//!   call from every worker at once.
//! - [`SemanticResolver`]: resolves the imported identifier at its import site
//!   the way go-to-definition does (relative imports, packages, re-exports).
//!   More precise, slower, and internally serialized.
//!
//! The graph builder only sees the trait, so every graph/status test can run
//! against both.

pub mod heuristic;
pub mod semantic;

pub use heuristic::PathResolver;
pub use semantic::SemanticResolver;

use crate::core::error::ConfigError;
use crate::imports::ImportRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which resolver turns references into files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverBackend {
  /// Path heuristic (`a.b` → `a/b.py`, else `a.py`)
  #[default]
  #[serde(alias = "path")]
  Heuristic,
  /// Identifier-level resolution at the import site
  #[serde(alias = "lsp")]
  Semantic,
}

impl ResolverBackend {
  pub fn as_str(self) -> &'static str {
    match self {
      ResolverBackend::Heuristic => "heuristic",
      ResolverBackend::Semantic => "semantic",
    }
  }
}

impl fmt::Display for ResolverBackend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ResolverBackend {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "heuristic" | "path" => Ok(Self::Heuristic),
      "semantic" | "lsp" => Ok(Self::Semantic),
      _ => Err(ConfigError::UnknownResolver { name: s.to_string() }),
    }
  }
}

/// The frozen set of node ids references are validated against.
///
/// Built once from discovery before any worker starts; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
  ids: HashSet<String>,
}

impl NodeSet {
  pub fn contains(&self, id: &str) -> bool {
    self.ids.contains(id)
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }
}

impl<S: Into<String>> FromIterator<S> for NodeSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self {
      ids: iter.into_iter().map(Into::into).collect(),
    }
  }
}

/// Maps one import reference of one file to zero or one node.
pub trait ModuleResolver: Send + Sync {
  /// Backend this resolver implements
  fn backend(&self) -> ResolverBackend;

  /// Resolve `import` found in `source_id`; only ids in `nodes` may be returned.
  fn resolve(&self, source_id: &str, import: &ImportRef, nodes: &NodeSet) -> Option<String>;

  /// Lookup counters, for backends that keep a cache
  fn stats(&self) -> Option<ResolverStats> {
    None
  }
}

/// Lookup counters of a caching resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
  pub lookups: usize,
  pub cache_hits: usize,
}

/// Instantiate the resolver for a backend.
///
/// The semantic resolver reads modules under `project_root` that are not
/// necessarily nodes (package `__init__.py` files, for instance).
pub fn create_resolver(backend: ResolverBackend, project_root: &Path) -> Box<dyn ModuleResolver> {
  match backend {
    ResolverBackend::Heuristic => Box::new(PathResolver),
    ResolverBackend::Semantic => Box::new(SemanticResolver::new(project_root)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_backend_from_str() {
    assert_eq!("heuristic".parse::<ResolverBackend>().unwrap(), ResolverBackend::Heuristic);
    assert_eq!("PATH".parse::<ResolverBackend>().unwrap(), ResolverBackend::Heuristic);
    assert_eq!("semantic".parse::<ResolverBackend>().unwrap(), ResolverBackend::Semantic);
    assert_eq!("lsp".parse::<ResolverBackend>().unwrap(), ResolverBackend::Semantic);
    assert!("jedi".parse::<ResolverBackend>().is_err());
  }

  #[test]
  fn test_backend_default_and_display() {
    assert_eq!(ResolverBackend::default(), ResolverBackend::Heuristic);
    assert_eq!(ResolverBackend::Semantic.to_string(), "semantic");
  }

  #[test]
  fn test_heuristic_keeps_no_stats() {
    assert_eq!(create_resolver(ResolverBackend::Heuristic, Path::new(".")).stats(), None);
  }

  #[test]
  fn test_node_set() {
    let nodes: NodeSet = ["a.py", "b/c.py"].into_iter().collect();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.contains("b/c.py"));
    assert!(!nodes.contains("c.py"));
  }

  #[test]
  fn test_create_resolver_backends() {
    let dir = std::env::temp_dir();
    assert_eq!(
      create_resolver(ResolverBackend::Heuristic, &dir).backend(),
      ResolverBackend::Heuristic
    );
    assert_eq!(
      create_resolver(ResolverBackend::Semantic, &dir).backend(),
      ResolverBackend::Semantic
    );
  }
}
