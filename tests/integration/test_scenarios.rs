//! End-to-end scenarios through the library API, run against both resolvers

use crate::helpers::TestProject;
use anyhow::Result;
use pydepin::discovery::DiscoveryOptions;
use pydepin::{BuildOptions, ClassifyOptions, DepError, ResolverBackend, Status, build_graph, classify};

const BACKENDS: [ResolverBackend; 2] = [ResolverBackend::Heuristic, ResolverBackend::Semantic];

fn options(backend: ResolverBackend, include_ignored: bool) -> BuildOptions {
  BuildOptions {
    discovery: DiscoveryOptions {
      include_ignored,
      ..DiscoveryOptions::default()
    },
    backend,
    jobs: 0,
  }
}

fn roots(ids: &[&str]) -> Vec<String> {
  ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_utils_root_without_ignored_files() -> Result<()> {
  let project = TestProject::scenario()?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    let statuses = classify(&graph, &roots(&["app/utils.py"]), ClassifyOptions::default())?;

    assert_eq!(statuses.get("app/utils.py"), Some(Status::Selected), "{backend}");
    assert_eq!(statuses.get("app/db.py"), Some(Status::Descendant), "{backend}");
    assert_eq!(statuses.get("main.py"), Some(Status::Ancestor), "{backend}");
    assert_eq!(statuses.get("app/__init__.py"), None, "{backend}");
    assert_eq!(statuses.len(), 3, "{backend}");
  }

  Ok(())
}

#[test]
fn test_utils_root_with_ignored_files() -> Result<()> {
  let project = TestProject::scenario()?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, true))?;
    let statuses = classify(&graph, &roots(&["app/utils.py"]), ClassifyOptions::default())?;

    assert_eq!(statuses.get("app/__init__.py"), Some(Status::Ignored), "{backend}");
    assert_eq!(statuses.get("app/db.py"), Some(Status::Descendant), "{backend}");
    assert_eq!(statuses.len(), 4, "{backend}");
  }

  Ok(())
}

#[test]
fn test_unknown_root_produces_no_statuses() -> Result<()> {
  let project = TestProject::scenario()?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    let err = classify(&graph, &roots(&["missing.py"]), ClassifyOptions::default()).unwrap_err();
    match err {
      DepError::UnknownRoot { missing, .. } => assert_eq!(missing, vec!["missing.py"]),
      other => panic!("unexpected error: {other}"),
    }
  }

  Ok(())
}

#[test]
fn test_submodule_file_beats_parent_module() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("main.py", "import pkg.sub\n")?
    .file("pkg.py", "sub = 1\n")?
    .file("pkg/sub.py", "")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert_eq!(graph.dependencies("main.py")?, vec!["pkg/sub.py"], "{backend}");
  }

  Ok(())
}

#[test]
fn test_falls_back_to_parent_module() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("main.py", "from pkg import helper\n")?
    .file("pkg.py", "def helper():\n    pass\n")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert_eq!(graph.dependencies("main.py")?, vec!["pkg.py"], "{backend}");
  }

  Ok(())
}

#[test]
fn test_external_imports_make_no_edges() -> Result<()> {
  let project = TestProject::new()?;
  project.file("main.py", "import os\nimport requests\nfrom collections import OrderedDict\n")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert_eq!(graph.edge_count(), 0, "{backend}");
  }

  Ok(())
}

#[test]
fn test_cycle_members_classified_alike() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("main.py", "import a\n")?
    .file("a.py", "import b\n")?
    .file("b.py", "import a\n")?
    .file("other.py", "")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert_eq!(graph.find_cycles(), vec![vec!["a.py".to_string(), "b.py".to_string()]]);

    let statuses = classify(&graph, &roots(&["main.py"]), ClassifyOptions::default())?;
    assert_eq!(statuses.get("a.py"), Some(Status::Descendant), "{backend}");
    assert_eq!(statuses.get("b.py"), Some(Status::Descendant), "{backend}");
    assert_eq!(statuses.get("other.py"), Some(Status::Unrelated), "{backend}");

    let statuses = classify(&graph, &roots(&["a.py"]), ClassifyOptions::default())?;
    assert_eq!(statuses.get("a.py"), Some(Status::Selected), "{backend}");
    assert_eq!(statuses.get("b.py"), Some(Status::Descendant), "{backend}");
    assert_eq!(statuses.get("main.py"), Some(Status::Ancestor), "{backend}");
  }

  Ok(())
}

#[test]
fn test_root_reached_from_other_root_stays_selected() -> Result<()> {
  let project = TestProject::scenario()?;
  let graph = build_graph(&project.path, &options(ResolverBackend::Heuristic, false))?;
  let statuses = classify(&graph, &roots(&["main.py", "app/db.py"]), ClassifyOptions::default())?;

  assert_eq!(statuses.get("main.py"), Some(Status::Selected));
  assert_eq!(statuses.get("app/db.py"), Some(Status::Selected));
  assert_eq!(statuses.get("app/utils.py"), Some(Status::Descendant));
  Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> Result<()> {
  let project = TestProject::scenario()?;

  for backend in BACKENDS {
    let first = classify(
      &build_graph(&project.path, &options(backend, true))?,
      &roots(&["app/utils.py"]),
      ClassifyOptions::default(),
    )?;
    let second = classify(
      &build_graph(&project.path, &options(backend, true))?,
      &roots(&["app/utils.py"]),
      ClassifyOptions::default(),
    )?;
    assert_eq!(first, second, "{backend}");
  }

  Ok(())
}

#[test]
fn test_relative_imports_resolve_semantically() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("app/__init__.py", "from .models import User\n")?
    .file("app/models.py", "class User:\n    pass\n")?
    .file("app/views.py", "from . import models\nfrom .. import settings\n")?
    .file("main.py", "from app import User\n")?;

  let graph = build_graph(&project.path, &options(ResolverBackend::Semantic, false))?;
  assert_eq!(graph.dependencies("app/views.py")?, vec!["app/models.py"]);
  assert_eq!(graph.dependencies("main.py")?, vec!["app/models.py"]);
  Ok(())
}

#[test]
fn test_definition_in_excluded_init_keeps_reexporting_edge() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("app/__init__.py", "def helper():\n    pass\n")?
    .file("app/utils.py", "from app import helper\n")?
    .file("main.py", "from app.utils import helper\n")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert_eq!(graph.dependencies("main.py")?, vec!["app/utils.py"], "{backend}");

    let statuses = classify(&graph, &roots(&["app/utils.py"]), ClassifyOptions::default())?;
    assert_eq!(statuses.get("main.py"), Some(Status::Ancestor), "{backend}");
  }

  Ok(())
}

#[test]
fn test_unparsable_file_keeps_node_without_edges() -> Result<()> {
  let project = TestProject::scenario()?;
  project.file("broken.py", "import app.db\ndef oops(:\n")?;

  for backend in BACKENDS {
    let graph = build_graph(&project.path, &options(backend, false))?;
    assert!(graph.contains("broken.py"), "{backend}");
    assert!(graph.dependencies("broken.py")?.is_empty(), "{backend}");
  }

  Ok(())
}

#[test]
fn test_bom_and_invalid_bytes_still_parse() -> Result<()> {
  let project = TestProject::new()?;
  project
    .bytes("main.py", b"\xEF\xBB\xBFimport app\n")?
    .bytes("other.py", b"import app\ns = '\xFF'\n")?
    .file("app.py", "")?;

  let graph = build_graph(&project.path, &options(ResolverBackend::Heuristic, false))?;
  assert_eq!(graph.dependencies("main.py")?, vec!["app.py"]);
  assert_eq!(graph.dependencies("other.py")?, vec!["app.py"]);
  Ok(())
}

#[test]
fn test_infrastructure_dirs_are_skipped() -> Result<()> {
  let project = TestProject::new()?;
  project
    .file("main.py", "import lib\n")?
    .file("lib.py", "")?
    .file(".venv/lib/site.py", "")?
    .file("__pycache__/lib.py", "")?
    .file("venv/x.py", "")?;

  let graph = build_graph(&project.path, &options(ResolverBackend::Heuristic, true))?;
  assert_eq!(graph.node_ids(), vec!["lib.py", "main.py"]);
  Ok(())
}
