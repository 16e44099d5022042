//! Identifier-level resolver
//!
//! Resolves the imported identifier where it is written, the way an editor's
//! go-to-definition would:
//!
//! - relative imports are anchored at the importing file's package
//! - `import a.b.c` lands on the deepest module that exists (`a/b/c.py`,
//!   `a/b/c/__init__.py`, then `a/b`, ...)
//! - `from m import n` lands on submodule `m.n` if there is one, otherwise on
//!   the module that actually defines `n`, following re-exports and star
//!   imports a bounded number of hops
//!
//! Every lookup records the chain of modules it passed through. The edge goes
//! to the last module on that chain that is a node, so a definition living in
//! an excluded file (a package `__init__.py`, say) still yields the
//! re-exporting module the importer named.
//!
//! Lookups go through one engine behind a mutex, so calls from parallel
//! workers are serialized. Chains are cached by absolute name for the life
//! of the resolver.

use super::{ModuleResolver, NodeSet, ResolverBackend, ResolverStats};
use crate::discovery::SOURCE_EXTENSION;
use crate::imports::{Binding, ImportForm, ImportRef, ModuleSymbols, extract_module_symbols, read_source};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Re-export chains longer than this stop at the last module reached
const MAX_REEXPORT_DEPTH: usize = 8;

const PACKAGE_INIT: &str = "__init__.py";

/// Identifier-level resolver rooted at one project
pub struct SemanticResolver {
  engine: Mutex<Engine>,
}

impl SemanticResolver {
  pub fn new(project_root: &Path) -> Self {
    Self {
      engine: Mutex::new(Engine::new(project_root.to_path_buf())),
    }
  }
}

impl ModuleResolver for SemanticResolver {
  fn backend(&self) -> ResolverBackend {
    ResolverBackend::Semantic
  }

  fn resolve(&self, source_id: &str, import: &ImportRef, nodes: &NodeSet) -> Option<String> {
    let chain = self.engine.lock().resolve(source_id, import)?;
    chain.iter().rev().find(|file| nodes.contains(file)).cloned()
  }

  fn stats(&self) -> Option<ResolverStats> {
    Some(self.engine.lock().stats)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LookupKey {
  Module(String),
  Symbol { module: String, name: String },
}

/// Modules a lookup passed through, nearest the importer first
type Chain = Arc<[String]>;

struct Engine {
  root: PathBuf,
  symbols: HashMap<String, Arc<ModuleSymbols>>,
  lookups: HashMap<LookupKey, Chain>,
  stats: ResolverStats,
}

impl Engine {
  fn new(root: PathBuf) -> Self {
    Self {
      root,
      symbols: HashMap::new(),
      lookups: HashMap::new(),
      stats: ResolverStats::default(),
    }
  }

  fn resolve(&mut self, source_id: &str, import: &ImportRef) -> Option<Chain> {
    let key = match import.form {
      ImportForm::Import => LookupKey::Module(import.module.clone()),
      ImportForm::From => LookupKey::Symbol {
        module: absolute_module(source_id, &import.module, import.level)?,
        name: import.name.clone()?,
      },
    };

    self.stats.lookups += 1;
    if let Some(cached) = self.lookups.get(&key) {
      self.stats.cache_hits += 1;
      return Some(Arc::clone(cached));
    }

    let mut chain = Vec::new();
    match &key {
      LookupKey::Module(module) => chain.extend(self.module_chain(module)),
      LookupKey::Symbol { module, name } => {
        let mut visited = HashSet::new();
        self.resolve_symbol(module, name, 0, &mut visited, &mut chain);
      }
    }
    let chain: Chain = chain.into();
    self.lookups.insert(key, Arc::clone(&chain));
    Some(chain)
  }

  /// `a.b.c` → existing modules among `a`, `a.b`, `a.b.c`, shallowest first.
  fn module_chain(&self, dotted: &str) -> Vec<String> {
    let parts: Vec<&str> = dotted.split('.').collect();
    (1..=parts.len())
      .filter_map(|depth| self.module_file(&parts[..depth].join(".")))
      .collect()
  }

  /// Push the modules `module.name` passes through onto `chain`; the
  /// definition site, when found, is pushed last.
  fn resolve_symbol(
    &mut self,
    module: &str,
    name: &str,
    depth: usize,
    visited: &mut HashSet<(String, String)>,
    chain: &mut Vec<String>,
  ) {
    if name == "*" {
      chain.extend(self.module_file(module));
      return;
    }
    if let Some(submodule) = self.module_file(&join_module(module, name)) {
      chain.push(submodule);
      return;
    }

    let Some(file) = self.module_file(module) else {
      return;
    };
    chain.push(file.clone());
    if depth >= MAX_REEXPORT_DEPTH || !visited.insert((file.clone(), name.to_string())) {
      return;
    }

    let symbols = self.symbols_of(&file);
    if symbols.defines(name) {
      return;
    }

    match symbols.bindings.get(name) {
      Some(Binding::Module { module: target }) => {
        chain.extend(self.module_chain(target));
        return;
      }
      Some(Binding::Symbol {
        module: target,
        level,
        name: original,
      }) => {
        if let Some(target) = absolute_module(&file, target, *level) {
          self.resolve_symbol(&target, original, depth + 1, visited, chain);
        }
        return;
      }
      None => {}
    }

    for (star, level) in &symbols.star_imports {
      let Some(star) = absolute_module(&file, star, *level) else {
        continue;
      };
      if self.exports(&star, name) {
        self.resolve_symbol(&star, name, depth + 1, visited, chain);
        return;
      }
    }
  }

  /// Whether `module` has `name` as a submodule, definition or binding.
  fn exports(&mut self, module: &str, name: &str) -> bool {
    if self.module_file(&join_module(module, name)).is_some() {
      return true;
    }
    let Some(file) = self.module_file(module) else {
      return false;
    };
    let symbols = self.symbols_of(&file);
    symbols.defines(name) || symbols.bindings.contains_key(name)
  }

  /// File id of a module: `a/b.py`, else `a/b/__init__.py`.
  fn module_file(&self, dotted: &str) -> Option<String> {
    if dotted.is_empty() || dotted.split('.').any(str::is_empty) {
      return None;
    }
    let base = dotted.replace('.', "/");
    let file = format!("{}.{}", base, SOURCE_EXTENSION);
    if self.root.join(&file).is_file() {
      return Some(file);
    }
    let init = format!("{}/{}", base, PACKAGE_INIT);
    self.root.join(&init).is_file().then_some(init)
  }

  fn symbols_of(&mut self, file_id: &str) -> Arc<ModuleSymbols> {
    if let Some(symbols) = self.symbols.get(file_id) {
      return Arc::clone(symbols);
    }
    let symbols = match read_source(&self.root.join(file_id)) {
      Ok(decoded) => extract_module_symbols(&decoded.text),
      Err(e) => {
        tracing::debug!(file = file_id, error = %e, "cannot read module for symbol lookup");
        ModuleSymbols::default()
      }
    };
    let symbols = Arc::new(symbols);
    self.symbols.insert(file_id.to_string(), Arc::clone(&symbols));
    symbols
  }
}

/// Absolute dotted module of a possibly relative `from` import.
///
/// `None` when the leading dots climb above the project root.
fn absolute_module(importer_id: &str, module: &str, level: usize) -> Option<String> {
  if level == 0 {
    return Some(module.to_string());
  }
  let mut package: Vec<&str> = importer_id.split('/').collect();
  package.pop();
  let up = level - 1;
  if up > package.len() {
    return None;
  }
  package.truncate(package.len() - up);
  if !module.is_empty() {
    package.extend(module.split('.'));
  }
  Some(package.join("."))
}

fn join_module(module: &str, name: &str) -> String {
  if module.is_empty() {
    name.to_string()
  } else {
    format!("{}.{}", module, name)
  }
}
