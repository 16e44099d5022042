//! Error types for pydepin with contextual messages and exit codes
//!
//! Only project-level problems are errors: a bad project root, unknown root
//! files, or an unreadable config. Per-file trouble (unreadable file, syntax
//! error, bad encoding) is recovered inside the graph builder and reported as
//! diagnostics instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for pydepin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (bad root, unknown file, invalid config)
  User = 1,
  /// System error (I/O, thread pool)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pydepin
#[derive(Debug, Error)]
pub enum DepError {
  /// Project root is missing or not a directory
  #[error("Invalid project root: {} ({reason})", .path.display())]
  InvalidRoot { path: PathBuf, reason: String },

  /// One or more requested root files are not nodes of the graph
  #[error("File not found in project: {}", .missing.join(", "))]
  UnknownRoot {
    missing: Vec<String>,
    /// Close matches per missing id, filled in by the presentation layer
    suggestions: Vec<(String, Vec<String>)>,
  },

  /// Classification requested without any root file
  #[error("No root files given")]
  NoRoots,

  /// Configuration errors
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// I/O errors
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  /// Generic error with message and optional context
  #[error("{message}{}", .context.as_ref().map(|c| format!("\n{}", c)).unwrap_or_default())]
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl DepError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    DepError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    DepError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Shorthand for [`DepError::InvalidRoot`]
  pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
    DepError::InvalidRoot {
      path: path.into(),
      reason: reason.into(),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      DepError::Message { message, context, help } => DepError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      DepError::Io(err) => DepError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      DepError::InvalidRoot { .. } => ExitCode::User,
      DepError::UnknownRoot { .. } => ExitCode::User,
      DepError::NoRoots => ExitCode::User,
      DepError::Config(_) => ExitCode::User,
      DepError::Io(_) => ExitCode::System,
      DepError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      DepError::InvalidRoot { .. } => Some("Pass the directory that contains your top-level packages.".to_string()),
      DepError::UnknownRoot { suggestions, .. } => {
        let hints: Vec<String> = suggestions
          .iter()
          .filter(|(_, close)| !close.is_empty())
          .map(|(bad, close)| format!("'{}': did you mean {}?", bad, close.join(", ")))
          .collect();
        if hints.is_empty() {
          Some("Root files are paths relative to the project root, e.g. pkg/module.py".to_string())
        } else {
          Some(hints.join("\n   "))
        }
      }
      DepError::NoRoots => Some("Name at least one file to inspect.".to_string()),
      DepError::Config(e) => e.help_message(),
      DepError::Message { help, .. } => help.clone(),
      DepError::Io(_) => None,
    }
  }
}

impl From<String> for DepError {
  fn from(msg: String) -> Self {
    DepError::message(msg)
  }
}

impl From<&str> for DepError {
  fn from(msg: &str) -> Self {
    DepError::message(msg)
  }
}

impl From<serde_json::Error> for DepError {
  fn from(err: serde_json::Error) -> Self {
    DepError::message(format!("JSON error: {}", err))
  }
}

impl From<rayon::ThreadPoolBuildError> for DepError {
  fn from(err: rayon::ThreadPoolBuildError) -> Self {
    DepError::message(format!("Failed to start worker pool: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Config file exists but could not be parsed
  #[error("Failed to parse {}: {message}", .path.display())]
  Parse { path: PathBuf, message: String },

  /// A boilerplate pattern is not a valid glob
  #[error("Invalid ignore pattern '{pattern}': {message}")]
  InvalidPattern { pattern: String, message: String },

  /// Unknown resolver backend name
  #[error("Unknown resolver '{name}'")]
  UnknownResolver { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Parse { .. } => Some("Check the [discovery] and [analysis] tables in pydepin.toml.".to_string()),
      ConfigError::InvalidPattern { .. } => {
        Some("Patterns are shell globs matched against file names, e.g. test_*.py".to_string())
      }
      ConfigError::UnknownResolver { .. } => Some("Valid resolvers: heuristic, semantic".to_string()),
    }
  }
}

/// Result type alias for pydepin
pub type DepResult<T> = Result<T, DepError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> DepResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> DepResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<DepError>,
{
  fn context(self, ctx: impl Into<String>) -> DepResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> DepResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &DepError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
