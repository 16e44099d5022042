//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway Python project on disk
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project directory
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// The three-file scenario: main.py → app/utils.py → app/db.py, plus a package marker
  pub fn scenario() -> Result<Self> {
    let project = Self::new()?;
    project
      .file("main.py", "import app.utils\n\napp.utils.run()\n")?
      .file("app/__init__.py", "")?
      .file("app/utils.py", "from app import db\n\ndef run():\n    db.connect()\n")?
      .file("app/db.py", "import os\n\ndef connect():\n    return os.environ\n")?;
    Ok(project)
  }

  /// Write a file (parent directories created as needed)
  pub fn file(&self, rel: &str, content: &str) -> Result<&Self> {
    self.bytes(rel, content.as_bytes())
  }

  /// Write raw bytes
  pub fn bytes(&self, rel: &str, content: &[u8]) -> Result<&Self> {
    let path = self.path.join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(self)
  }
}

/// Run the pydepin binary, expecting success
pub fn run_pydepin(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = pydepin_output(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "pydepin command failed: pydepin {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the pydepin binary, whatever the outcome
pub fn pydepin_output(cwd: &Path, args: &[&str]) -> Result<Output> {
  let pydepin_bin = env!("CARGO_BIN_EXE_pydepin");

  Command::new(pydepin_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("PYDEPIN_LOG")
    .output()
    .context("Failed to run pydepin")
}

/// Stdout as lines
pub fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect()
}
