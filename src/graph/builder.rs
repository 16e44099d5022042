//! Graph construction
//!
//! ```text
//! discover(root)            -> sorted file list, frozen NodeSet
//!   |
//!   v  rayon pool (jobs)
//! per file: read -> decode -> extract (ImportCache) -> resolve each reference
//!   |
//!   v  coordinating thread
//! nodes in id order, edges from a BTreeSet -> DependencyGraph
//! ```
//!
//! Per-file trouble never fails the build: an unreadable or unparsable file
//! keeps its node and contributes no edges, and the event is counted in
//! [`BuildStats`]. The one exception is the project root vanishing mid-build,
//! which aborts with `InvalidRoot`.

use super::dependency_graph::{DependencyGraph, FileNode};
use crate::core::context::validate_root;
use crate::core::error::{DepError, DepResult};
use crate::discovery::{DiscoveredFile, DiscoveryOptions, discover};
use crate::imports::{ParseFailure, ParsedImports, extract_imports, read_source};
use crate::resolve::{ModuleResolver, NodeSet, ResolverBackend, create_resolver};
use dashmap::DashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything that shapes one build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  pub discovery: DiscoveryOptions,
  pub backend: ResolverBackend,
  /// Worker threads; 0 = available parallelism
  pub jobs: usize,
}

/// Diagnostics collected during one build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
  pub files: usize,
  pub edges: usize,
  /// Import references seen across all parsed files
  pub references: usize,
  /// References that matched no node (stdlib, third party, typos)
  pub unresolved: usize,
  pub parse_failures: usize,
  pub read_failures: usize,
  /// Files decoded with replacement characters
  pub lossy_decodes: usize,
}

/// What extracting one file produced
#[derive(Debug, Clone)]
pub enum Extraction {
  Parsed { imports: ParsedImports, lossy: bool },
  ParseFailed { failure: ParseFailure, lossy: bool },
  Unreadable(String),
}

/// Per-build memo of extraction results, keyed by path.
#[derive(Debug, Default)]
pub struct ImportCache {
  entries: DashMap<PathBuf, Arc<Extraction>>,
}

impl ImportCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Extract `path` once; later calls return the stored result.
  pub fn get_or_extract(&self, path: &Path) -> Arc<Extraction> {
    if let Some(hit) = self.entries.get(path) {
      return Arc::clone(hit.value());
    }
    let extraction = Arc::new(extract_file(path));
    self.entries.insert(path.to_path_buf(), Arc::clone(&extraction));
    extraction
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

fn extract_file(path: &Path) -> Extraction {
  let decoded = match read_source(path) {
    Ok(decoded) => decoded,
    Err(e) => return Extraction::Unreadable(e.to_string()),
  };
  match extract_imports(&decoded.text) {
    Ok(imports) => Extraction::Parsed {
      imports,
      lossy: decoded.lossy,
    },
    Err(failure) => Extraction::ParseFailed {
      failure,
      lossy: decoded.lossy,
    },
  }
}

/// Outcome for one file, before aggregation
#[derive(Debug, Default)]
struct FileEdges {
  source: String,
  targets: Vec<String>,
  references: usize,
  unresolved: usize,
  parse_failed: bool,
  read_failed: bool,
  lossy: bool,
}

/// Builds one dependency graph; owns the import cache for that build.
pub struct GraphBuilder<'a> {
  root: &'a Path,
  options: &'a BuildOptions,
  cache: ImportCache,
}

impl<'a> GraphBuilder<'a> {
  pub fn new(root: &'a Path, options: &'a BuildOptions) -> Self {
    Self {
      root,
      options,
      cache: ImportCache::new(),
    }
  }

  /// Run discovery and import analysis and assemble the graph.
  pub fn build(self) -> DepResult<(DependencyGraph, BuildStats)> {
    validate_root(self.root)?;
    let files = discover(self.root, &self.options.discovery)?;
    let nodes: NodeSet = files.iter().map(|f| f.id.clone()).collect();
    let resolver = create_resolver(self.options.backend, self.root);

    tracing::debug!(
      files = files.len(),
      backend = %self.options.backend,
      jobs = self.options.jobs,
      "building dependency graph"
    );

    let pool = rayon::ThreadPoolBuilder::new().num_threads(self.options.jobs).build()?;
    let per_file: Vec<FileEdges> = pool.install(|| {
      files
        .par_iter()
        .map(|file| self.process_file(file, resolver.as_ref(), &nodes))
        .collect::<DepResult<Vec<_>>>()
    })?;

    if let Some(lookups) = resolver.stats() {
      tracing::debug!(
        backend = %resolver.backend(),
        lookups = lookups.lookups,
        cache_hits = lookups.cache_hits,
        "resolver lookups"
      );
    }

    let mut graph = DependencyGraph::new();
    for file in &files {
      graph.add_node(FileNode {
        id: file.id.clone(),
        ignored: file.ignored,
      });
    }

    let mut stats = BuildStats {
      files: files.len(),
      ..BuildStats::default()
    };
    let mut edges = BTreeSet::new();
    for result in per_file {
      stats.references += result.references;
      stats.unresolved += result.unresolved;
      stats.parse_failures += usize::from(result.parse_failed);
      stats.read_failures += usize::from(result.read_failed);
      stats.lossy_decodes += usize::from(result.lossy);
      for target in result.targets {
        edges.insert((result.source.clone(), target));
      }
    }
    for (from, to) in &edges {
      graph.add_edge(from, to);
    }
    stats.edges = graph.edge_count();

    tracing::info!(
      files = stats.files,
      edges = stats.edges,
      references = stats.references,
      unresolved = stats.unresolved,
      parse_failures = stats.parse_failures,
      read_failures = stats.read_failures,
      cached = self.cache.len(),
      "dependency graph built"
    );

    Ok((graph, stats))
  }

  fn process_file(&self, file: &DiscoveredFile, resolver: &dyn ModuleResolver, nodes: &NodeSet) -> DepResult<FileEdges> {
    let mut out = FileEdges {
      source: file.id.clone(),
      ..FileEdges::default()
    };

    let extraction = self.cache.get_or_extract(&file.path);
    let imports = match extraction.as_ref() {
      Extraction::Parsed { imports, lossy } => {
        if *lossy {
          tracing::warn!(file = %file.id, "undecodable bytes replaced while reading");
        }
        out.lossy = *lossy;
        imports
      }
      Extraction::ParseFailed { failure, lossy } => {
        tracing::warn!(file = %file.id, error = %failure, "skipping imports of unparsable file");
        out.parse_failed = true;
        out.lossy = *lossy;
        return Ok(out);
      }
      Extraction::Unreadable(reason) => {
        if !self.root.is_dir() {
          return Err(DepError::invalid_root(self.root, "project root disappeared during the build"));
        }
        tracing::warn!(file = %file.id, error = %reason, "cannot read file");
        out.read_failed = true;
        return Ok(out);
      }
    };

    out.references = imports.len();
    for import in &imports.refs {
      match resolver.resolve(&file.id, import, nodes) {
        Some(target) => out.targets.push(target),
        None => out.unresolved += 1,
      }
    }

    tracing::debug!(
      file = %file.id,
      references = out.references,
      resolved = out.targets.len(),
      "resolved imports"
    );
    Ok(out)
  }
}

/// Build the dependency graph of the project at `root`.
///
/// # Errors
/// `InvalidRoot` when `root` is missing or not a directory; config-derived
/// pattern errors from discovery.
pub fn build_graph(root: &Path, options: &BuildOptions) -> DepResult<DependencyGraph> {
  GraphBuilder::new(root, options).build().map(|(graph, _)| graph)
}
