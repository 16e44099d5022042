//! Path heuristic resolver
//!
//! 1. Candidate A: the whole reference as a file (`a.b.c` → `a/b/c.py`)
//! 2. Candidate B: the parent as a file, last segment taken to be a symbol
//!    inside it (`a.b.c` → `a/b.py`)
//! 3. First candidate that is a node wins; A always beats B.
//!
//! When a project has both `pkg/sub.py` and `pkg.py`, `pkg.sub` resolves to
//! the submodule even if `pkg.py` also defines a `sub` attribute.

use super::{ModuleResolver, NodeSet, ResolverBackend};
use crate::discovery::SOURCE_EXTENSION;
use crate::imports::ImportRef;

/// Stateless path heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
  /// Resolve a bare dotted reference.
  pub fn resolve_dotted(&self, dotted: &str, nodes: &NodeSet) -> Option<String> {
    let (full, parent) = candidate_paths(dotted);
    if nodes.contains(&full) {
      return Some(full);
    }
    parent.filter(|p| nodes.contains(p))
  }
}

impl ModuleResolver for PathResolver {
  fn backend(&self) -> ResolverBackend {
    ResolverBackend::Heuristic
  }

  fn resolve(&self, _source_id: &str, import: &ImportRef, nodes: &NodeSet) -> Option<String> {
    self.resolve_dotted(&import.dotted, nodes)
  }
}

/// Candidate A and (when the reference has a parent) candidate B.
pub fn candidate_paths(dotted: &str) -> (String, Option<String>) {
  let full = module_to_path(dotted);
  let parent = dotted
    .rsplit_once('.')
    .map(|(parent, _)| parent)
    .filter(|p| !p.is_empty())
    .map(module_to_path);
  (full, parent)
}

fn module_to_path(dotted: &str) -> String {
  format!("{}.{}", dotted.replace('.', "/"), SOURCE_EXTENSION)
}
