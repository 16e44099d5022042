//! File-level dependency graph
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A imports something that resolves to B"
//! - **Nodes**: Discovered Python files, keyed by root-relative id
//! - **Edges**: Plain pairs, no weight, no multiplicity
//! - **Index**: id → node index
//! - **Algorithms**: reachability (iterative DFS), SCC, shortest paths
//!
//! petgraph is only the store. Reachability is a plain stack walk over its
//! adjacency so traversal order and cycle handling stay under our control.

use crate::core::error::{DepError, DepResult};
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// A Python file in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
  /// Root-relative path with `/` separators
  pub id: String,
  /// File name matches a boilerplate pattern
  pub ignored: bool,
}

/// Dependency graph over the files of one project.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
  graph: DiGraph<FileNode, ()>,
  id_to_node: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a node; re-adding an existing id returns its index unchanged.
  pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
    if let Some(idx) = self.id_to_node.get(&node.id) {
      return *idx;
    }
    let id = node.id.clone();
    let idx = self.graph.add_node(node);
    self.id_to_node.insert(id, idx);
    idx
  }

  /// Add `from → to`. Both ends must already be nodes; duplicates collapse.
  ///
  /// Returns false when either end is unknown.
  pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
    let (Some(&a), Some(&b)) = (self.id_to_node.get(from), self.id_to_node.get(to)) else {
      return false;
    };
    self.graph.update_edge(a, b, ());
    true
  }

  pub fn contains(&self, id: &str) -> bool {
    self.id_to_node.contains_key(id)
  }

  pub fn node(&self, id: &str) -> Option<&FileNode> {
    self.id_to_node.get(id).map(|idx| &self.graph[*idx])
  }

  /// All nodes, sorted by id.
  pub fn nodes(&self) -> Vec<&FileNode> {
    let mut nodes: Vec<&FileNode> = self.graph.node_weights().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    nodes
  }

  /// All node ids, sorted.
  pub fn node_ids(&self) -> Vec<&str> {
    self.nodes().into_iter().map(|n| n.id.as_str()).collect()
  }

  /// All edges as (from, to), sorted.
  pub fn edges(&self) -> Vec<(&str, &str)> {
    let mut edges: Vec<(&str, &str)> = self
      .graph
      .edge_indices()
      .filter_map(|e| self.graph.edge_endpoints(e))
      .map(|(a, b)| (self.graph[a].id.as_str(), self.graph[b].id.as_str()))
      .collect();
    edges.sort_unstable();
    edges
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  /// Files `id` imports directly.
  pub fn dependencies(&self, id: &str) -> DepResult<Vec<String>> {
    self.neighbors(id, Direction::Outgoing)
  }

  /// Files that import `id` directly.
  pub fn dependents(&self, id: &str) -> DepResult<Vec<String>> {
    self.neighbors(id, Direction::Incoming)
  }

  fn neighbors(&self, id: &str, direction: Direction) -> DepResult<Vec<String>> {
    let idx = self.find_node(id)?;
    let mut ids: Vec<String> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n].id.clone())
      .collect();
    ids.sort();
    ids.dedup();
    Ok(ids)
  }

  /// Everything reachable from `roots` by following imports.
  pub fn descendants(&self, roots: &[&str]) -> DepResult<BTreeSet<String>> {
    self.reachable_ids(roots, Direction::Outgoing)
  }

  /// Everything that reaches one of `roots` by following imports.
  pub fn ancestors(&self, roots: &[&str]) -> DepResult<BTreeSet<String>> {
    self.reachable_ids(roots, Direction::Incoming)
  }

  fn reachable_ids(&self, roots: &[&str], direction: Direction) -> DepResult<BTreeSet<String>> {
    let starts = roots.iter().map(|id| self.find_node(id)).collect::<DepResult<Vec<_>>>()?;
    Ok(
      self
        .reachable(&starts, direction)
        .into_iter()
        .map(|idx| self.graph[idx].id.clone())
        .collect(),
    )
  }

  /// Nodes reached through at least one edge from any start node.
  ///
  /// A start node is only part of the result when some path leads back to
  /// it. Every node is expanded at most once, so cycles terminate.
  pub(crate) fn reachable(&self, starts: &[NodeIndex], direction: Direction) -> HashSet<NodeIndex> {
    let mut expanded = HashSet::new();
    let mut reached = HashSet::new();
    let mut stack = starts.to_vec();

    while let Some(idx) = stack.pop() {
      if !expanded.insert(idx) {
        continue;
      }
      for neighbor in self.graph.neighbors_directed(idx, direction) {
        reached.insert(neighbor);
        if !expanded.contains(&neighbor) {
          stack.push(neighbor);
        }
      }
    }

    reached
  }

  /// Node index by id.
  pub(crate) fn find_node(&self, id: &str) -> DepResult<NodeIndex> {
    self.id_to_node.get(id).copied().ok_or_else(|| DepError::UnknownRoot {
      missing: vec![id.to_string()],
      suggestions: Vec::new(),
    })
  }

  /// Id of a node index.
  pub(crate) fn id_of(&self, idx: NodeIndex) -> &str {
    &self.graph[idx].id
  }

  /// Detect circular imports using Tarjan's SCC algorithm.
  ///
  /// Each group lists its members sorted; groups are sorted too. A file that
  /// imports itself is a group of one.
  pub fn find_cycles(&self) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = algo::tarjan_scc(&self.graph)
      .into_iter()
      .filter(|component| {
        component.len() > 1 || component.iter().any(|&idx| self.graph.contains_edge(idx, idx))
      })
      .map(|component| {
        let mut ids: Vec<String> = component.into_iter().map(|idx| self.graph[idx].id.clone()).collect();
        ids.sort();
        ids
      })
      .collect();
    cycles.sort();
    cycles
  }

  /// Shortest import chain from `from` to `to`, both ends included.
  ///
  /// # Example
  /// If main.py → app/utils.py → app/db.py, `dependency_path("main.py", "app/db.py")`
  /// returns `["main.py", "app/utils.py", "app/db.py"]`.
  pub fn dependency_path(&self, from: &str, to: &str) -> DepResult<Option<Vec<String>>> {
    let from_idx = self.find_node(from)?;
    let to_idx = self.find_node(to)?;

    let mut queue = VecDeque::new();
    let mut visited: HashMap<NodeIndex, Option<NodeIndex>> = HashMap::new();

    queue.push_back(from_idx);
    visited.insert(from_idx, None);

    while let Some(current) = queue.pop_front() {
      if current == to_idx {
        let mut path = vec![];
        let mut node = Some(current);

        while let Some(idx) = node {
          path.push(self.graph[idx].id.clone());
          node = visited.get(&idx).copied().flatten();
        }

        path.reverse();
        return Ok(Some(path));
      }

      // Sorted so ties between equally short chains break the same way every run
      let mut next: Vec<NodeIndex> = self.graph.neighbors_directed(current, Direction::Outgoing).collect();
      next.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
      for neighbor in next {
        if let std::collections::hash_map::Entry::Vacant(e) = visited.entry(neighbor) {
          e.insert(Some(current));
          queue.push_back(neighbor);
        }
      }
    }

    Ok(None)
  }

  /// Export graph to DOT format (Graphviz).
  ///
  /// # Example
  /// ```bash
  /// pydepin dot . > deps.dot
  /// dot -Tsvg deps.dot -o deps.svg
  /// ```
  pub fn to_dot(&self) -> String {
    use petgraph::dot::{Config, Dot};

    let dot = Dot::with_attr_getters(
      &self.graph,
      &[Config::EdgeNoLabel, Config::NodeNoLabel],
      &|_, _| String::new(),
      &|_, (_idx, node)| {
        if node.ignored {
          format!("label={:?} shape=box style=dashed color=gray", node.id)
        } else {
          format!("label={:?} shape=box", node.id)
        }
      },
    );

    format!("{:?}", dot)
  }
}
