//! Project context - validate the root and load config once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ProjectContext::build(root) -> &ProjectContext
//!   |
//!   v
//! commands/inspect.rs, why.rs, ...:
//!   fn run(ctx: &ProjectContext, ...)
//! ```

use crate::core::config::DepinConfig;
use crate::core::error::{DepError, DepResult};
use crate::graph::builder::BuildOptions;
use crate::resolve::ResolverBackend;
use std::path::{Path, PathBuf};

/// Validated project root plus its configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory as given by the user
  pub root: PathBuf,

  /// pydepin.toml contents (defaults when absent)
  pub config: DepinConfig,
}

impl ProjectContext {
  /// Build context from a project root.
  ///
  /// Fails with `InvalidRoot` before anything else happens when the root is
  /// missing or not a directory.
  pub fn build(project_root: &Path) -> DepResult<Self> {
    validate_root(project_root)?;
    let config = DepinConfig::load(project_root)?;

    Ok(Self {
      root: project_root.to_path_buf(),
      config,
    })
  }

  /// Build options from config, with CLI overrides applied on top.
  pub fn build_options(
    &self,
    include_ignored: bool,
    backend: Option<ResolverBackend>,
    jobs: Option<usize>,
  ) -> BuildOptions {
    BuildOptions {
      discovery: self.config.discovery.to_options(include_ignored),
      backend: backend.unwrap_or(self.config.analysis.resolver),
      jobs: jobs.unwrap_or(self.config.analysis.jobs),
    }
  }

  /// Get project root as Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }
}

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> DepResult<()> {
  match root.metadata() {
    Ok(meta) if meta.is_dir() => Ok(()),
    Ok(_) => Err(DepError::invalid_root(root, "not a directory")),
    Err(e) => Err(DepError::invalid_root(root, e.to_string())),
  }
}
