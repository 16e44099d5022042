use crate::core::error::{ConfigError, DepError, DepResult, ResultExt};
use crate::discovery::{DEFAULT_BOILERPLATE_PATTERNS, DiscoveryOptions, compile_patterns};
use crate::resolve::ResolverBackend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for pydepin
/// Searched in order: pydepin.toml, .pydepin.toml, .config/pydepin.toml
///
/// Every field is optional; a project without a config file behaves exactly
/// like `DepinConfig::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepinConfig {
  #[serde(default)]
  pub discovery: DiscoveryConfig,
  #[serde(default)]
  pub analysis: AnalysisConfig,
}

/// File discovery settings (`[discovery]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
  /// Boilerplate patterns; replaces the built-in list when set
  #[serde(default)]
  pub ignore_patterns: Option<Vec<String>>,

  /// Boilerplate patterns appended to the active list
  #[serde(default)]
  pub extra_ignore_patterns: Vec<String>,

  /// Directory names pruned in addition to the fixed infrastructure set
  #[serde(default)]
  pub exclude_dirs: Vec<String>,

  /// Honour .gitignore / .ignore files while walking
  #[serde(default)]
  pub respect_gitignore: bool,
}

impl DiscoveryConfig {
  /// Active boilerplate patterns (defaults or replacement, plus extras)
  pub fn boilerplate_patterns(&self) -> Vec<String> {
    let mut patterns = match &self.ignore_patterns {
      Some(custom) => custom.clone(),
      None => DEFAULT_BOILERPLATE_PATTERNS.iter().map(|p| p.to_string()).collect(),
    };
    patterns.extend(self.extra_ignore_patterns.iter().cloned());
    patterns
  }

  /// Build discovery options for one run
  pub fn to_options(&self, include_ignored: bool) -> DiscoveryOptions {
    DiscoveryOptions {
      include_ignored,
      boilerplate_patterns: self.boilerplate_patterns(),
      extra_exclude_dirs: self.exclude_dirs.clone(),
      respect_gitignore: self.respect_gitignore,
    }
  }

  /// Validate that every pattern compiles
  pub fn validate(&self) -> DepResult<()> {
    compile_patterns(&self.boilerplate_patterns())?;

    if let Some(dir) = self.exclude_dirs.iter().find(|d| d.is_empty() || d.contains('/')) {
      return Err(DepError::with_help(
        format!("Invalid exclude_dirs entry '{}'", dir),
        "exclude_dirs holds bare directory names such as 'build' or 'node_modules'",
      ));
    }

    Ok(())
  }
}

/// Analysis settings (`[analysis]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
  /// Resolver backend used when the CLI does not pick one
  #[serde(default)]
  pub resolver: ResolverBackend,

  /// Worker threads for import extraction (0 = available parallelism)
  #[serde(default)]
  pub jobs: usize,
}

impl DepinConfig {
  /// Find config file in search order: pydepin.toml, .pydepin.toml, .config/pydepin.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("pydepin.toml"),
      path.join(".pydepin.toml"),
      path.join(".config").join("pydepin.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config for a project root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> DepResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content, &config_path)?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str, origin: &Path) -> DepResult<Self> {
    let config: DepinConfig = toml_edit::de::from_str(content).map_err(|e| ConfigError::Parse {
      path: origin.to_path_buf(),
      message: e.to_string(),
    })?;

    config
      .discovery
      .validate()
      .with_context(|| format!("Invalid discovery configuration in {}", origin.display()))?;

    Ok(config)
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }
}
