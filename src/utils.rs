//! Utility functions for cross-platform path handling
//!
//! File ids are project-root-relative paths joined with `/` on every
//! platform, so the same project yields the same ids on Windows and Unix.

use std::path::{Component, Path};

/// Convert a root-relative path to a file id (always forward slashes)
///
/// `.` components are dropped; `..` is kept verbatim so that a path that
/// escapes the root never collides with a real node id.
pub fn to_file_id(path: &Path) -> String {
  let mut parts: Vec<String> = Vec::new();
  for component in path.components() {
    match component {
      Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
      Component::ParentDir => parts.push("..".to_string()),
      Component::CurDir => {}
      Component::RootDir | Component::Prefix(_) => {}
    }
  }
  parts.join("/")
}

/// Normalize a user-supplied file argument into a file id.
///
/// Accepts:
/// - root-relative paths: `app/utils.py`, `./app/utils.py`
/// - Windows separators: `app\utils.py`
/// - absolute paths under the project root
///
/// Absolute paths outside the root come back unchanged (minus separators) and
/// will simply fail the node lookup.
pub fn normalize_file_id(project_root: &Path, input: &str) -> String {
  let unified = input.replace('\\', "/");
  let path = Path::new(&unified);

  if path.is_absolute() {
    if let Ok(rel) = path.strip_prefix(project_root) {
      return to_file_id(rel);
    }
    if let (Ok(root), Ok(abs)) = (project_root.canonicalize(), path.canonicalize())
      && let Ok(rel) = abs.strip_prefix(&root)
    {
      return to_file_id(rel);
    }
    return unified;
  }

  to_file_id(path)
}
