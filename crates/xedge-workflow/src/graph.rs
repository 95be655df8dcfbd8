use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use xedge_config::{DEFAULT_NODE_TYPE, Position, node_type_or_default};

use crate::error::WorkflowError;
use crate::node::{Edge, Node, NodeDataPatch};

/// The node/edge collections of one workflow.
///
/// Mutations are purely local. The graph is a multigraph and does not police
/// ids: uniqueness is the caller's responsibility and is checked by the
/// validator at the persistence boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
  #[serde(default)]
  nodes: Vec<Node>,
  #[serde(default)]
  edges: Vec<Edge>,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a graph from existing collections, as-is.
  pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    Self { nodes, edges }
  }

  pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
    (self.nodes, self.edges)
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }

  /// Get the first node with the given id.
  pub fn node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == node_id)
  }

  fn node_mut(&mut self, node_id: &str) -> Result<&mut Node, WorkflowError> {
    self
      .nodes
      .iter_mut()
      .find(|n| n.id == node_id)
      .ok_or_else(|| WorkflowError::NodeNotFound(node_id.to_string()))
  }

  /// Append a node. No uniqueness check is performed.
  ///
  /// A node typed `"edge"` or with an empty type gets the default type.
  pub fn add_node(&mut self, mut node: Node) {
    if node_type_or_default(&node.node_type) != node.node_type {
      node.node_type = DEFAULT_NODE_TYPE.to_string();
    }
    self.nodes.push(node);
  }

  /// Remove the first node with the given id.
  ///
  /// Edges referencing the node are left in place.
  pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
    let index = self.nodes.iter().position(|n| n.id == node_id)?;
    Some(self.nodes.remove(index))
  }

  /// Connect two nodes with a freshly identified edge and return its id.
  ///
  /// Parallel edges between the same pair are allowed.
  pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> String {
    let edge = Edge::new(Edge::generate_id(), source, target);
    let id = edge.id.clone();
    self.push_edge(edge);
    id
  }

  /// Append an edge that already carries an id.
  pub fn push_edge(&mut self, edge: Edge) {
    self.edges.push(edge);
  }

  pub fn remove_edge(&mut self, edge_id: &str) -> Result<Edge, WorkflowError> {
    let index = self
      .edges
      .iter()
      .position(|e| e.id == edge_id)
      .ok_or_else(|| WorkflowError::EdgeNotFound(edge_id.to_string()))?;
    Ok(self.edges.remove(index))
  }

  /// Shallow-merge a patch into a node's `data`.
  pub fn update_node_data(
    &mut self,
    node_id: &str,
    patch: NodeDataPatch,
  ) -> Result<(), WorkflowError> {
    let node = self.node_mut(node_id)?;
    patch.apply(&mut node.data);
    Ok(())
  }

  pub fn update_node_position(
    &mut self,
    node_id: &str,
    position: Position,
  ) -> Result<(), WorkflowError> {
    self.node_mut(node_id)?.position = position;
    Ok(())
  }

  /// Edges with the given node as source or target.
  pub fn edges_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
    self.edges.iter().filter(move |e| e.touches(node_id))
  }

  /// Edges with at least one endpoint that is not a node of this graph.
  pub fn dangling_edges(&self) -> Vec<&Edge> {
    let node_ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
    self
      .edges
      .iter()
      .filter(|e| !node_ids.contains(e.source.as_str()) || !node_ids.contains(e.target.as_str()))
      .collect()
  }

  /// Compare two graphs as sets of nodes and edges, ignoring order.
  pub fn is_equivalent(&self, other: &Graph) -> bool {
    fn sorted_by_id<T: Clone>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<T> {
      let mut items = items.to_vec();
      items.sort_by(|a, b| id(a).cmp(id(b)));
      items
    }

    self.nodes.len() == other.nodes.len()
      && self.edges.len() == other.edges.len()
      && sorted_by_id(&self.nodes, |n| n.id.as_str()) == sorted_by_id(&other.nodes, |n| n.id.as_str())
      && sorted_by_id(&self.edges, |e| e.id.as_str()) == sorted_by_id(&other.edges, |e| e.id.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Graph {
    let mut graph = Graph::new();
    graph.add_node(Node::for_plugin(
      "node_1",
      "plugin-input-file",
      "File Input",
      Position::new(100.0, 100.0),
    ));
    graph.add_node(Node::for_plugin(
      "node_2",
      "plugin-filter-basic",
      "Basic Filter",
      Position::new(400.0, 100.0),
    ));
    graph
  }

  #[test]
  fn test_add_edge_allows_parallel_edges() {
    let mut graph = sample();
    let first = graph.add_edge("node_1", "node_2");
    let second = graph.add_edge("node_1", "node_2");

    assert_ne!(first, second);
    assert_eq!(graph.edges().len(), 2);
    assert_eq!(graph.edges_of("node_2").count(), 2);
  }

  #[test]
  fn test_remove_node_leaves_edges_dangling() {
    let mut graph = sample();
    graph.add_edge("node_1", "node_2");

    let removed = graph.remove_node("node_2").unwrap();
    assert_eq!(removed.id, "node_2");
    assert_eq!(graph.nodes().len(), 1);
    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.dangling_edges().len(), 1);
  }

  #[test]
  fn test_remove_missing_node() {
    let mut graph = sample();
    assert!(graph.remove_node("node_9").is_none());
    assert_eq!(graph.nodes().len(), 2);
  }

  #[test]
  fn test_add_node_replaces_reserved_type() {
    let mut graph = Graph::new();
    let mut node = Node::new("n", Position::default());
    node.node_type = "edge".to_string();
    graph.add_node(node);

    let mut blank = Node::new("m", Position::default());
    blank.node_type = String::new();
    graph.add_node(blank);

    assert_eq!(graph.node("n").unwrap().node_type, "default");
    assert_eq!(graph.node("m").unwrap().node_type, "default");
  }

  #[test]
  fn test_add_edge_returns_new_id() {
    let mut graph = sample();
    let id = graph.add_edge("node_1", "node_2");
    assert!(id.starts_with("edge-"));
    assert_eq!(graph.edges()[0].id, id);
  }

  #[test]
  fn test_add_node_does_not_check_ids() {
    let mut graph = sample();
    graph.add_node(Node::new("node_1", Position::default()));
    assert_eq!(graph.nodes().len(), 3);
  }

  #[test]
  fn test_update_node_data() {
    let mut graph = sample();
    graph
      .update_node_data("node_1", NodeDataPatch::label("CSV Reader"))
      .unwrap();

    let node = graph.node("node_1").unwrap();
    assert_eq!(node.data.label.as_deref(), Some("CSV Reader"));
    assert_eq!(node.plugin_id(), Some("plugin-input-file"));
  }

  #[test]
  fn test_update_unknown_node() {
    let mut graph = sample();
    let err = graph
      .update_node_data("nope", NodeDataPatch::label("x"))
      .unwrap_err();
    assert!(matches!(err, WorkflowError::NodeNotFound(id) if id == "nope"));
  }

  #[test]
  fn test_update_node_position() {
    let mut graph = sample();
    graph
      .update_node_position("node_2", Position::new(10.0, 20.0))
      .unwrap();
    assert_eq!(graph.node("node_2").unwrap().position, Position::new(10.0, 20.0));
  }

  #[test]
  fn test_remove_edge() {
    let mut graph = sample();
    let id = graph.add_edge("node_1", "node_2");
    assert_eq!(graph.remove_edge(&id).unwrap().id, id);
    assert!(matches!(
      graph.remove_edge(&id),
      Err(WorkflowError::EdgeNotFound(_))
    ));
  }

  #[test]
  fn test_equivalence_ignores_order() {
    let a = sample();
    let (mut nodes, edges) = a.clone().into_parts();
    nodes.reverse();
    let b = Graph::from_parts(nodes, edges);

    assert_ne!(a, b);
    assert!(a.is_equivalent(&b));
  }
}
