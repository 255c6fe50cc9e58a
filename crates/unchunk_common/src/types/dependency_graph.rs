use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use serde::Serialize;

use crate::{ModuleId, ModuleKind};

pub type SharedDependencyGraph = Arc<DependencyGraph>;

/// Attributes attached to a graph node. `merge_node` only overwrites fields
/// that arrive as `Some`, so later sightings never erase earlier facts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeAttrs {
  pub chunk_id: Option<u64>,
  pub kind: Option<ModuleKind>,
}

/// The shared node/edge sink the chunk pipeline writes module facts into.
/// Both mutation entry points are idempotent, and DashMap's per-key locking
/// serializes merges when multiple chunks run against one graph.
#[derive(Debug, Default)]
pub struct DependencyGraph {
  nodes: DashMap<ModuleId, NodeAttrs>,
  edges: DashSet<(ModuleId, ModuleId)>,
}

impl DependencyGraph {
  /// Upserts a node, merging `Some` attributes into whatever is already
  /// recorded.
  pub fn merge_node(&self, id: ModuleId, attrs: NodeAttrs) {
    let mut existing = self.nodes.entry(id).or_default();
    if attrs.chunk_id.is_some() {
      existing.chunk_id = attrs.chunk_id;
    }
    if attrs.kind.is_some() {
      existing.kind = attrs.kind;
    }
  }

  /// Records a directed import edge. Inserting an existing edge is a no-op.
  pub fn add_edge(&self, from: ModuleId, to: ModuleId) {
    self.edges.insert((from, to));
  }

  pub fn contains_node(&self, id: &ModuleId) -> bool {
    self.nodes.contains_key(id)
  }

  pub fn node_attrs(&self, id: &ModuleId) -> Option<NodeAttrs> {
    self.nodes.get(id).map(|entry| *entry.value())
  }

  pub fn contains_edge(&self, from: &ModuleId, to: &ModuleId) -> bool {
    self.edges.contains(&(from.clone(), to.clone()))
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  /// A sorted, serializable copy for deterministic export.
  pub fn snapshot(&self) -> GraphSnapshot {
    let mut nodes = self
      .nodes
      .iter()
      .map(|entry| GraphNode {
        id: entry.key().to_string(),
        chunk_id: entry.value().chunk_id,
        kind: entry.value().kind,
      })
      .collect::<Vec<_>>();
    nodes.sort_unstable_by(|a, b| a.id.cmp(&b.id));

    let mut edges = self
      .edges
      .iter()
      .map(|entry| GraphEdge { from: entry.0.to_string(), to: entry.1.to_string() })
      .collect::<Vec<_>>();
    edges.sort_unstable();

    GraphSnapshot { nodes, edges }
  }
}

#[derive(Debug, Serialize)]
pub struct GraphSnapshot {
  pub nodes: Vec<GraphNode>,
  pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Serialize)]
pub struct GraphNode {
  pub id: String,
  pub chunk_id: Option<u64>,
  pub kind: Option<ModuleKind>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
  pub from: String,
  pub to: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn node_insertion_is_idempotent_and_merging() {
    let graph = DependencyGraph::default();
    let id = ModuleId::from("452");

    graph.merge_node(id.clone(), NodeAttrs { chunk_id: Some(1), kind: None });
    graph.merge_node(id.clone(), NodeAttrs { chunk_id: None, kind: Some(ModuleKind::CommonJs) });

    assert_eq!(graph.node_count(), 1);
    assert_eq!(
      graph.node_attrs(&id),
      Some(NodeAttrs { chunk_id: Some(1), kind: Some(ModuleKind::CommonJs) })
    );
  }

  #[test]
  fn edge_insertion_is_idempotent() {
    let graph = DependencyGraph::default();
    graph.add_edge(ModuleId::from("a"), ModuleId::from("b"));
    graph.add_edge(ModuleId::from("a"), ModuleId::from("b"));

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_edge(&ModuleId::from("a"), &ModuleId::from("b")));
  }

  #[test]
  fn snapshot_is_sorted() {
    let graph = DependencyGraph::default();
    graph.merge_node(ModuleId::from("b"), NodeAttrs::default());
    graph.merge_node(ModuleId::from("a"), NodeAttrs::default());
    graph.add_edge(ModuleId::from("b"), ModuleId::from("a"));
    graph.add_edge(ModuleId::from("a"), ModuleId::from("b"));

    let snapshot = graph.snapshot();
    assert_eq!(snapshot.nodes[0].id, "a");
    assert_eq!(snapshot.nodes[1].id, "b");
    assert_eq!(snapshot.edges[0].from, "a");
    assert_eq!(snapshot.edges[1].from, "b");
  }
}
