//! Module-level symbol summary
//!
//! What a module defines at top level and which names it binds through
//! imports. The semantic resolver uses this to decide whether
//! `from pkg.mod import Name` lands in `pkg/mod.py` or is re-exported from
//! somewhere else.
//!
//! Best-effort by nature: files with syntax errors still yield whatever
//! statements tree-sitter could recover.

use super::{dotted_text, from_module, imported_name_node, parse_tree, text};
use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

/// A name bound by an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
  /// `import a.b as c` binds `c` to module `a.b`; `import a.b` binds `a` to module `a`
  Module { module: String },
  /// `from m import n as x` binds `x` to symbol `n` of module `m`
  Symbol { module: String, level: usize, name: String },
}

/// Top-level names of one module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSymbols {
  /// `def`, `class` and assignment targets
  pub definitions: HashSet<String>,
  /// Import bindings, by bound name
  pub bindings: HashMap<String, Binding>,
  /// `from m import *` sources: (module, level)
  pub star_imports: Vec<(String, usize)>,
}

impl ModuleSymbols {
  pub fn defines(&self, name: &str) -> bool {
    self.definitions.contains(name)
  }
}

/// Statements that open a block but not a new scope
const TRANSPARENT_KINDS: &[&str] = &[
  "if_statement",
  "elif_clause",
  "else_clause",
  "try_statement",
  "except_clause",
  "except_group_clause",
  "finally_clause",
  "with_statement",
  "block",
];

/// Summarize a module's top-level symbols.
pub fn extract_module_symbols(source: &str) -> ModuleSymbols {
  let mut symbols = ModuleSymbols::default();
  let Ok(tree) = parse_tree(source) else {
    return symbols;
  };
  collect_scope(tree.root_node(), source.as_bytes(), &mut symbols);
  symbols
}

fn collect_scope(scope: Node, src: &[u8], symbols: &mut ModuleSymbols) {
  let mut cursor = scope.walk();
  for node in scope.named_children(&mut cursor) {
    match node.kind() {
      "function_definition" | "class_definition" => define_named(node, src, symbols),
      "decorated_definition" => {
        if let Some(def) = node.child_by_field_name("definition") {
          define_named(def, src, symbols);
        }
      }
      "expression_statement" => {
        let mut inner = node.walk();
        for expr in node.named_children(&mut inner) {
          if expr.kind() == "assignment"
            && let Some(left) = expr.child_by_field_name("left")
          {
            define_targets(left, src, symbols);
          }
        }
      }
      "import_statement" => bind_plain_import(node, src, symbols),
      "import_from_statement" => bind_from_import(node, src, symbols),
      kind if TRANSPARENT_KINDS.contains(&kind) => collect_scope(node, src, symbols),
      _ => {}
    }
  }
}

fn define_named(node: Node, src: &[u8], symbols: &mut ModuleSymbols) {
  if let Some(name) = node.child_by_field_name("name") {
    symbols.definitions.insert(text(name, src).to_string());
  }
}

fn define_targets(target: Node, src: &[u8], symbols: &mut ModuleSymbols) {
  match target.kind() {
    "identifier" => {
      symbols.definitions.insert(text(target, src).to_string());
    }
    "pattern_list" | "tuple_pattern" | "list_pattern" => {
      let mut cursor = target.walk();
      for child in target.named_children(&mut cursor) {
        define_targets(child, src, symbols);
      }
    }
    _ => {}
  }
}

fn bind_plain_import(node: Node, src: &[u8], symbols: &mut ModuleSymbols) {
  let mut cursor = node.walk();
  for child in node.children_by_field_name("name", &mut cursor) {
    match child.kind() {
      "aliased_import" => {
        let (Some(name), Some(alias)) = (child.child_by_field_name("name"), child.child_by_field_name("alias")) else {
          continue;
        };
        symbols.bindings.insert(
          text(alias, src).to_string(),
          Binding::Module {
            module: dotted_text(name, src),
          },
        );
      }
      "dotted_name" => {
        let module = dotted_text(child, src);
        if let Some(head) = module.split('.').next().filter(|h| !h.is_empty()) {
          symbols.bindings.insert(
            head.to_string(),
            Binding::Module {
              module: head.to_string(),
            },
          );
        }
      }
      _ => {}
    }
  }
}

fn bind_from_import(node: Node, src: &[u8], symbols: &mut ModuleSymbols) {
  let (module, level) = from_module(node, src);

  let mut cursor = node.walk();
  for child in node.named_children(&mut cursor) {
    if child.kind() == "wildcard_import" {
      symbols.star_imports.push((module.clone(), level));
    }
  }

  let mut cursor = node.walk();
  for child in node.children_by_field_name("name", &mut cursor) {
    let Some(name_node) = imported_name_node(child) else {
      continue;
    };
    let name = dotted_text(name_node, src);
    let bound = match child.child_by_field_name("alias") {
      Some(alias) if child.kind() == "aliased_import" => text(alias, src).to_string(),
      _ => name.clone(),
    };
    symbols.bindings.insert(
      bound,
      Binding::Symbol {
        module: module.clone(),
        level,
        name,
      },
    );
  }
}
