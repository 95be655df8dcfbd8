//! Conversion between a [`Graph`] and the flat `elements` wire form.
//!
//! Encoding emits every node, then every edge. Consumers must not depend on
//! that order. Decoding partitions elements on `type == "edge"`.
//!
//! Decoding is tolerant: an element without an id, or an edge element without
//! both endpoints, cannot be represented in the canonical graph and is dropped
//! with a warning. Submissions are checked by the validator before they reach
//! this point, so drops only happen for data written by older clients.

use tracing::warn;

use xedge_config::{EDGE_TYPE, Element, WorkflowDocument, node_type_or_default};

use crate::graph::Graph;
use crate::node::{Edge, Node};

/// Flatten a graph into elements.
pub fn encode(graph: &Graph) -> Vec<Element> {
  let nodes = graph.nodes().iter().map(encode_node);
  let edges = graph.edges().iter().map(encode_edge);
  nodes.chain(edges).collect()
}

pub fn encode_document(graph: &Graph) -> WorkflowDocument {
  WorkflowDocument::new(encode(graph))
}

fn encode_node(node: &Node) -> Element {
  Element {
    id: Some(node.id.clone()),
    element_type: Some(node_type_or_default(&node.node_type).to_string()),
    position: Some(node.position),
    data: Some(node.data.clone()),
    source: None,
    target: None,
    extra: node.extra.clone(),
  }
}

fn encode_edge(edge: &Edge) -> Element {
  Element {
    id: Some(edge.id.clone()),
    element_type: Some(EDGE_TYPE.to_string()),
    position: None,
    data: edge.data.clone(),
    source: Some(edge.source.clone()),
    target: Some(edge.target.clone()),
    extra: edge.extra.clone(),
  }
}

/// Expand elements into a graph, dropping elements that cannot be represented.
pub fn decode(elements: &[Element]) -> Graph {
  let mut graph = Graph::new();

  for (index, element) in elements.iter().enumerate() {
    let Some(id) = element.id() else {
      warn!(index, "dropping element without id");
      continue;
    };

    if element.is_edge() {
      match (element.source.as_deref(), element.target.as_deref()) {
        (Some(source), Some(target)) => {
          if element.position.is_some() {
            warn!(edge_id = %id, "dropping position of edge element");
          }
          let mut edge = Edge::new(id, source, target);
          edge.data = element.data.clone();
          edge.extra = element.extra.clone();
          graph.push_edge(edge);
        }
        _ => {
          warn!(edge_id = %id, "dropping edge without source or target");
        }
      }
    } else {
      graph.add_node(Node {
        id: id.to_string(),
        node_type: element.node_type().to_string(),
        position: element.position.unwrap_or_default(),
        data: element.data.clone().unwrap_or_default(),
        extra: element.extra.clone(),
      });
    }
  }

  graph
}

pub fn decode_document(document: &WorkflowDocument) -> Graph {
  decode(&document.elements)
}
