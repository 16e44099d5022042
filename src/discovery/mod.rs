//! File discovery - walk the project and yield root-relative Python file ids
//!
//! Uses the `ignore` crate's walker so that directory pruning happens before
//! descent (a `.venv` with 50k files is never read), and `globset` for the
//! boilerplate patterns, which are matched against the bare file name.

use crate::core::context::validate_root;
use crate::core::error::{ConfigError, DepResult};
use crate::utils::to_file_id;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extension of files that become graph nodes
pub const SOURCE_EXTENSION: &str = "py";

/// Directories that are never walked
pub const ALWAYS_EXCLUDED_DIRS: &[&str] = &[".git", ".venv", "venv", "env", "__pycache__"];

/// Package markers, tests and framework entry points
pub const DEFAULT_BOILERPLATE_PATTERNS: &[&str] = &[
  "__init__.py",
  "test_*.py",
  "*_test.py",
  "setup.py",
  "conftest.py",
  "manage.py",
  "wsgi.py",
  "asgi.py",
];

/// Options for one discovery pass
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
  /// Keep boilerplate files (flagged `ignored`) instead of dropping them
  pub include_ignored: bool,
  /// File-name globs that mark boilerplate
  pub boilerplate_patterns: Vec<String>,
  /// Directory names pruned in addition to [`ALWAYS_EXCLUDED_DIRS`]
  pub extra_exclude_dirs: Vec<String>,
  /// Honour .gitignore / .ignore files
  pub respect_gitignore: bool,
}

impl Default for DiscoveryOptions {
  fn default() -> Self {
    Self {
      include_ignored: false,
      boilerplate_patterns: DEFAULT_BOILERPLATE_PATTERNS.iter().map(|p| p.to_string()).collect(),
      extra_exclude_dirs: Vec::new(),
      respect_gitignore: false,
    }
  }
}

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
  /// Root-relative id with `/` separators
  pub id: String,
  /// Path on disk (project root joined with the id)
  pub path: PathBuf,
  /// File name matches a boilerplate pattern
  pub ignored: bool,
}

/// Compiled boilerplate patterns
#[derive(Debug, Clone)]
pub struct BoilerplateMatcher {
  set: GlobSet,
}

impl BoilerplateMatcher {
  pub fn new(patterns: &[String]) -> DepResult<Self> {
    Ok(Self {
      set: compile_patterns(patterns)?,
    })
  }

  /// Whether a file name (not a path) is boilerplate
  pub fn is_boilerplate(&self, file_name: &str) -> bool {
    self.set.is_match(file_name)
  }
}

impl Default for BoilerplateMatcher {
  fn default() -> Self {
    let patterns: Vec<String> = DEFAULT_BOILERPLATE_PATTERNS.iter().map(|p| p.to_string()).collect();
    // Built-in patterns are known-good; an empty set is the only other outcome.
    let set = compile_patterns(&patterns).unwrap_or_else(|_| GlobSet::empty());
    Self { set }
  }
}

/// Compile shell globs into a set, reporting the first bad pattern.
pub fn compile_patterns(patterns: &[String]) -> DepResult<GlobSet> {
  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
      pattern: pattern.clone(),
      message: e.to_string(),
    })?;
    builder.add(glob);
  }
  let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
    pattern: patterns.join(", "),
    message: e.to_string(),
  })?;
  Ok(set)
}

/// Walk `root` and return every eligible source file, sorted by id.
///
/// Infrastructure directories are always pruned. Boilerplate files are
/// dropped unless `include_ignored` is set, in which case they come back
/// with `ignored = true`.
pub fn discover(root: &Path, options: &DiscoveryOptions) -> DepResult<Vec<DiscoveredFile>> {
  validate_root(root)?;
  let matcher = BoilerplateMatcher::new(&options.boilerplate_patterns)?;

  let excluded: HashSet<String> = ALWAYS_EXCLUDED_DIRS
    .iter()
    .map(|d| d.to_string())
    .chain(options.extra_exclude_dirs.iter().cloned())
    .collect();

  let mut builder = WalkBuilder::new(root);
  builder
    .standard_filters(false)
    .hidden(false)
    .follow_links(false)
    .require_git(false)
    .git_ignore(options.respect_gitignore)
    .git_exclude(options.respect_gitignore)
    .ignore(options.respect_gitignore)
    .parents(options.respect_gitignore)
    .sort_by_file_name(|a, b| a.cmp(b))
    .filter_entry(move |entry| {
      let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
      !(is_dir && entry.depth() > 0 && excluded.contains(entry.file_name().to_string_lossy().as_ref()))
    });

  let suffix = format!(".{}", SOURCE_EXTENSION);
  let mut files = Vec::new();
  let mut skipped_boilerplate = 0usize;

  for result in builder.build() {
    let entry = match result {
      Ok(entry) => entry,
      Err(err) => {
        tracing::warn!(error = %err, "skipping unreadable directory entry");
        continue;
      }
    };

    if entry.file_type().is_some_and(|ft| ft.is_dir()) || !entry.path().is_file() {
      continue;
    }

    let file_name = entry.file_name().to_string_lossy();
    if !file_name.ends_with(&suffix) {
      continue;
    }

    let ignored = matcher.is_boilerplate(&file_name);
    if ignored && !options.include_ignored {
      skipped_boilerplate += 1;
      continue;
    }

    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    files.push(DiscoveredFile {
      id: to_file_id(rel),
      path: entry.path().to_path_buf(),
      ignored,
    });
  }

  files.sort_by(|a, b| a.id.cmp(&b.id));
  tracing::debug!(
    root = %root.display(),
    files = files.len(),
    skipped_boilerplate,
    "discovery finished"
  );

  Ok(files)
}
