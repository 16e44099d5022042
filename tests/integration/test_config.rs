//! Integration tests for pydepin.toml handling

use crate::helpers::{TestProject, pydepin_output, run_pydepin, stdout_lines};
use anyhow::Result;
use pydepin::ProjectContext;
use pydepin::ResolverBackend;
use pydepin::build_graph;

#[test]
fn test_extra_ignore_patterns_and_exclude_dirs() -> Result<()> {
  let project = TestProject::scenario()?;
  project
    .file("app/models_pb2.py", "")?
    .file("build/gen.py", "")?
    .file(
      "pydepin.toml",
      "[discovery]\nextra_ignore_patterns = [\"*_pb2.py\"]\nexclude_dirs = [\"build\"]\n",
    )?;

  let ctx = ProjectContext::build(&project.path)?;
  let graph = build_graph(ctx.project_root(), &ctx.build_options(false, None, None))?;
  assert_eq!(graph.node_ids(), vec!["app/db.py", "app/utils.py", "main.py"]);

  let graph = build_graph(ctx.project_root(), &ctx.build_options(true, None, None))?;
  assert!(graph.node("app/models_pb2.py").is_some_and(|n| n.ignored));
  assert!(graph.node("app/__init__.py").is_some_and(|n| n.ignored));
  assert!(!graph.contains("build/gen.py"));

  Ok(())
}

#[test]
fn test_ignore_patterns_replace_defaults() -> Result<()> {
  let project = TestProject::scenario()?;
  project
    .file("tests/test_db.py", "from app import db\n")?
    .file(".config/pydepin.toml", "[discovery]\nignore_patterns = [\"test_*.py\"]\n")?;

  let output = run_pydepin(&project.path, &["inspect", ".", "app/db.py", "--format", "names"])?;
  assert_eq!(stdout_lines(&output), vec!["app/db.py", "app/utils.py", "main.py"]);

  let ctx = ProjectContext::build(&project.path)?;
  let graph = build_graph(ctx.project_root(), &ctx.build_options(false, None, None))?;
  assert!(graph.node("app/__init__.py").is_some_and(|n| !n.ignored));

  Ok(())
}

#[test]
fn test_resolver_from_config_and_cli_override() -> Result<()> {
  let project = TestProject::scenario()?;
  project.file("pydepin.toml", "[analysis]\nresolver = \"semantic\"\njobs = 2\n")?;

  let ctx = ProjectContext::build(&project.path)?;
  assert_eq!(ctx.build_options(false, None, None).backend, ResolverBackend::Semantic);

  let output = run_pydepin(
    &project.path,
    &["inspect", ".", "main.py", "--resolver", "heuristic", "--format", "json"],
  )?;
  let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(value["resolver"], "heuristic");

  Ok(())
}

#[test]
fn test_invalid_config_is_user_error() -> Result<()> {
  let project = TestProject::scenario()?;
  project.file("pydepin.toml", "[analysis]\nresolver = \"jedi\"\n")?;

  let output = pydepin_output(&project.path, &["inspect", ".", "main.py"])?;
  assert_eq!(output.status.code(), Some(1));

  let project = TestProject::scenario()?;
  project.file("pydepin.toml", "[discovery]\nextra_ignore_patterns = [\"[\"]\n")?;
  let output = pydepin_output(&project.path, &["inspect", ".", "main.py"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
