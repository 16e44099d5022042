//! Import extraction using native tree-sitter
//!
//! Turns one Python file into the dotted references it imports. Both import
//! forms collapse to one shape:
//!
//! | statement             | reference |
//! |-----------------------|-----------|
//! | `import a.b`          | `a.b`     |
//! | `import a.b as c`     | `a.b`     |
//! | `from a import b`     | `a.b`     |
//! | `from a.b import c`   | `a.b.c`   |
//! | `from .m import x`    | `m.x`     |
//! | `from a import *`     | `a.*`     |
//!
//! Whether the last segment names a submodule or an attribute is left to the
//! resolver.

pub mod source;
pub mod symbols;

pub use source::{DecodedSource, SourceEncoding, decode_source, read_source};
pub use symbols::{Binding, ModuleSymbols, extract_module_symbols};

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Which statement form produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportForm {
  /// `import a.b`
  Import,
  /// `from a import b`
  From,
}

/// One imported name at one source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportRef {
  /// Normalized dotted reference (see module docs)
  pub dotted: String,
  /// Module part as written, without leading dots; may be empty for `from . import x`
  pub module: String,
  /// Imported name for the `from` form
  pub name: Option<String>,
  /// Number of leading dots of a relative import
  pub level: usize,
  pub form: ImportForm,
  /// 0-based row of the imported name
  pub line: usize,
  /// 0-based byte column of the imported name
  pub column: usize,
}

/// All references of one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImports {
  pub refs: Vec<ImportRef>,
}

impl ParsedImports {
  /// The set view: distinct dotted references.
  pub fn dotted_names(&self) -> BTreeSet<String> {
    self.refs.iter().map(|r| r.dotted.clone()).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.refs.is_empty()
  }

  pub fn len(&self) -> usize {
    self.refs.len()
  }
}

/// A file that could not be parsed; it contributes no references.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
  pub message: String,
  /// 0-based row of the first syntax error, when known
  pub line: Option<usize>,
}

impl ParseFailure {
  fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      line: None,
    }
  }
}

/// Create a parser loaded with the Python grammar.
pub(crate) fn python_parser() -> Result<Parser, ParseFailure> {
  let mut parser = Parser::new();
  parser
    .set_language(&tree_sitter_python::LANGUAGE.into())
    .map_err(|e| ParseFailure::new(format!("Failed to load Python grammar: {}", e)))?;
  Ok(parser)
}

/// Parse source into a syntax tree, without judging syntax errors.
pub(crate) fn parse_tree(source: &str) -> Result<Tree, ParseFailure> {
  let mut parser = python_parser()?;
  parser
    .parse(source, None)
    .ok_or_else(|| ParseFailure::new("Failed to parse source"))
}

/// Extract every import reference of a file.
///
/// A file with any syntax error is rejected as a whole, the same way a strict
/// parser would refuse to compile it.
pub fn extract_imports(source: &str) -> Result<ParsedImports, ParseFailure> {
  let tree = parse_tree(source)?;
  let root = tree.root_node();

  if root.has_error() {
    let line = first_error(root).map(|n| n.start_position().row);
    return Err(ParseFailure {
      message: match line {
        Some(row) => format!("syntax error at line {}", row + 1),
        None => "syntax error".to_string(),
      },
      line,
    });
  }

  let src = source.as_bytes();
  let mut refs = Vec::new();
  let mut stack = vec![root];

  while let Some(node) = stack.pop() {
    match node.kind() {
      "import_statement" => collect_plain_import(node, src, &mut refs),
      "import_from_statement" | "future_import_statement" => collect_from_import(node, src, &mut refs),
      _ => {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
      }
    }
  }

  Ok(ParsedImports { refs })
}

fn collect_plain_import(node: Node, src: &[u8], refs: &mut Vec<ImportRef>) {
  let mut cursor = node.walk();
  for child in node.children_by_field_name("name", &mut cursor) {
    let Some(name_node) = imported_name_node(child) else {
      continue;
    };
    let module = dotted_text(name_node, src);
    if module.is_empty() {
      continue;
    }
    let pos = name_node.start_position();
    refs.push(ImportRef {
      dotted: module.clone(),
      module,
      name: None,
      level: 0,
      form: ImportForm::Import,
      line: pos.row,
      column: pos.column,
    });
  }
}

fn collect_from_import(node: Node, src: &[u8], refs: &mut Vec<ImportRef>) {
  let (module, level) = from_module(node, src);

  let mut names: Vec<(String, Node)> = Vec::new();
  let mut cursor = node.walk();
  for child in node.children_by_field_name("name", &mut cursor) {
    if let Some(name_node) = imported_name_node(child) {
      names.push((dotted_text(name_node, src), name_node));
    }
  }
  let mut cursor = node.walk();
  for child in node.named_children(&mut cursor) {
    if child.kind() == "wildcard_import" {
      names.push(("*".to_string(), child));
    }
  }

  for (name, name_node) in names {
    if name.is_empty() {
      continue;
    }
    let dotted = if module.is_empty() {
      name.clone()
    } else {
      format!("{}.{}", module, name)
    };
    let pos = name_node.start_position();
    refs.push(ImportRef {
      dotted,
      module: module.clone(),
      name: Some(name),
      level,
      form: ImportForm::From,
      line: pos.row,
      column: pos.column,
    });
  }
}

/// Module text and relative level of a `from` statement.
pub(crate) fn from_module(node: Node, src: &[u8]) -> (String, usize) {
  if node.kind() == "future_import_statement" {
    return ("__future__".to_string(), 0);
  }
  let Some(module_node) = node.child_by_field_name("module_name") else {
    return (String::new(), 0);
  };

  match module_node.kind() {
    "relative_import" => {
      let mut level = 0;
      let mut module = String::new();
      let mut cursor = module_node.walk();
      for part in module_node.children(&mut cursor) {
        match part.kind() {
          "import_prefix" => level += text(part, src).chars().filter(|c| *c == '.').count(),
          "dotted_name" => module = dotted_text(part, src),
          _ => {}
        }
      }
      (module, level)
    }
    _ => (dotted_text(module_node, src), 0),
  }
}

/// The dotted name inside an import list entry (unwrapping `x as y`).
pub(crate) fn imported_name_node(node: Node) -> Option<Node> {
  match node.kind() {
    "dotted_name" => Some(node),
    "aliased_import" => node.child_by_field_name("name"),
    _ => None,
  }
}

/// `a . b` and `a.b` both become `a.b`.
pub(crate) fn dotted_text(node: Node, src: &[u8]) -> String {
  if node.kind() != "dotted_name" {
    return text(node, src).trim().to_string();
  }
  let mut cursor = node.walk();
  node
    .named_children(&mut cursor)
    .filter(|n| n.kind() == "identifier")
    .map(|n| text(n, src))
    .collect::<Vec<_>>()
    .join(".")
}

pub(crate) fn text<'s>(node: Node, src: &'s [u8]) -> &'s str {
  node.utf8_text(src).unwrap_or("")
}

fn first_error(root: Node) -> Option<Node> {
  let mut stack = vec![root];
  while let Some(node) = stack.pop() {
    if node.is_error() || node.is_missing() {
      return Some(node);
    }
    if node.has_error() {
      let mut cursor = node.walk();
      let children: Vec<Node> = node.children(&mut cursor).collect();
      stack.extend(children.into_iter().rev());
    }
  }
  None
}
