//! Integration tests for the pydepin binary

use crate::helpers::{TestProject, pydepin_output, run_pydepin, stdout_lines};
use anyhow::Result;

#[test]
fn test_inspect_text_output() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["inspect", ".", "app/utils.py"])?;
  assert_eq!(
    stdout_lines(&output),
    vec!["🟢 app/db.py", "🔵 app/utils.py", "🟢 main.py (ancestor)"]
  );

  Ok(())
}

#[test]
fn test_inspect_show_ignored() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["inspect", ".", "app/utils.py", "--show-ignored"])?;
  let lines = stdout_lines(&output);
  assert_eq!(lines[0], "⚫ app/__init__.py");
  assert_eq!(lines.len(), 4);

  let output = run_pydepin(
    &project.path,
    &["inspect", ".", "app/utils.py", "--show-ignored", "--only-highlighted"],
  )?;
  assert_eq!(stdout_lines(&output).len(), 3);

  Ok(())
}

#[test]
fn test_inspect_direction_flags() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["inspect", ".", "app/utils.py", "-d"])?;
  let lines = stdout_lines(&output);
  assert!(lines.contains(&"🟢 app/db.py".to_string()));
  assert!(lines.contains(&"⚪ main.py".to_string()));

  let output = run_pydepin(&project.path, &["inspect", ".", "app/utils.py", "-u"])?;
  let lines = stdout_lines(&output);
  assert!(lines.contains(&"⚪ app/db.py".to_string()));
  assert!(lines.contains(&"🟢 main.py (ancestor)".to_string()));

  let output = pydepin_output(&project.path, &["inspect", ".", "app/utils.py", "-d", "-u"])?;
  assert!(!output.status.success(), "-d and -u are mutually exclusive");

  Ok(())
}

#[test]
fn test_inspect_semantic_resolver() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(
    &project.path,
    &["inspect", ".", "main.py", "--resolver", "semantic", "--format", "names"],
  )?;
  assert_eq!(stdout_lines(&output), vec!["app/db.py", "app/utils.py", "main.py"]);

  Ok(())
}

#[test]
fn test_inspect_json_output() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["inspect", ".", "app/utils.py", "--format", "json"])?;
  let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(value["files"]["app/utils.py"], "selected");
  assert_eq!(value["files"]["main.py"], "ancestor");
  assert_eq!(value["summary"]["descendant"], 1);
  assert_eq!(value["stats"]["files"], 3);
  assert_eq!(value["stats"]["edges"], 2);

  Ok(())
}

#[test]
fn test_inspect_accepts_absolute_and_dotted_paths() -> Result<()> {
  let project = TestProject::scenario()?;
  let absolute = project.path.join("app/utils.py");

  let output = run_pydepin(
    &project.path,
    &["inspect", ".", absolute.to_str().unwrap_or_default(), "--format", "names"],
  )?;
  assert!(stdout_lines(&output).contains(&"app/utils.py".to_string()));

  let output = run_pydepin(&project.path, &["inspect", ".", "./app/utils.py", "--format", "names"])?;
  assert!(stdout_lines(&output).contains(&"app/utils.py".to_string()));

  Ok(())
}

#[test]
fn test_unknown_file_exits_with_suggestion() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = pydepin_output(&project.path, &["inspect", ".", "app/util.py"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("File not found in project: app/util.py"), "{stderr}");
  assert!(stderr.contains("did you mean app/utils.py"), "{stderr}");

  Ok(())
}

#[test]
fn test_invalid_root_exits_with_user_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = pydepin_output(&project.path, &["inspect", "does-not-exist", "main.py"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid project root"));

  Ok(())
}

#[test]
fn test_why_prints_chain() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["why", ".", "main.py", "app/db.py"])?;
  assert_eq!(
    stdout_lines(&output),
    vec!["main.py", "└─ app/utils.py", "   └─ app/db.py"]
  );

  let output = run_pydepin(&project.path, &["why", ".", "app/db.py", "main.py"])?;
  assert_eq!(stdout_lines(&output), vec!["app/db.py does not depend on main.py"]);

  Ok(())
}

#[test]
fn test_cycles_command() -> Result<()> {
  let project = TestProject::new()?;
  project.file("a.py", "import b\n")?.file("b.py", "import a\n")?.file("c.py", "")?;

  let output = run_pydepin(&project.path, &["cycles", ".", "--json"])?;
  let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(value["cycles"], serde_json::json!([["a.py", "b.py"]]));

  let clean = TestProject::scenario()?;
  let output = run_pydepin(&clean.path, &["cycles", "."])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("No circular imports"));

  Ok(())
}

#[test]
fn test_dot_command() -> Result<()> {
  let project = TestProject::scenario()?;

  let output = run_pydepin(&project.path, &["dot", "."])?;
  let dot = String::from_utf8_lossy(&output.stdout);
  assert!(dot.starts_with("digraph"));
  assert!(dot.contains("\"main.py\""));
  assert_eq!(dot.matches("->").count(), 2);

  Ok(())
}
