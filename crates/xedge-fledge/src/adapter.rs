use serde_json::{Map, Value};
use tracing::debug;

use xedge_config::{ConfigMap, DEFAULT_NODE_TYPE, Element, NodeData, Position, node_type_or_default};
use xedge_workflow::{Edge, Graph, Node, codec};

/// Turns one recognizable response shape into a canonical graph.
pub trait ShapeAdapter: Send + Sync {
  fn name(&self) -> &'static str;

  /// Produce a graph, or `None` when `body` is not in this adapter's shape.
  fn adapt(&self, body: &Value) -> Option<Graph>;
}

/// `{"elements": [...]}`, the form XEdge itself stores.
pub struct ElementsShape;

impl ShapeAdapter for ElementsShape {
  fn name(&self) -> &'static str {
    "elements"
  }

  fn adapt(&self, body: &Value) -> Option<Graph> {
    let elements = body.get("elements")?;
    let elements: Vec<Element> = serde_json::from_value(elements.clone()).ok()?;
    Some(codec::decode(&elements))
  }
}

/// `{"nodes": [...], "edges": [...]}`, as an editing surface holds a graph.
pub struct NodesEdgesShape;

impl ShapeAdapter for NodesEdgesShape {
  fn name(&self) -> &'static str {
    "nodes-edges"
  }

  fn adapt(&self, body: &Value) -> Option<Graph> {
    let nodes = body.get("nodes")?.as_array()?;
    let edges = body.get("edges")?.as_array()?;

    let nodes = nodes.iter().filter_map(node_from_value).collect();
    let edges = edges.iter().filter_map(edge_from_value).collect();
    Some(Graph::from_parts(nodes, edges))
  }
}

fn node_from_value(value: &Value) -> Option<Node> {
  let id = string_field(value, "id")?;
  let mut node = Node::new(id, Position::default());
  if let Some(node_type) = value.get("type").and_then(Value::as_str) {
    node.node_type = node_type_or_default(node_type).to_string();
  }
  if let Some(position) = value.get("position") {
    node.position = serde_json::from_value(position.clone()).unwrap_or_default();
  }
  if let Some(data) = value.get("data") {
    node.data = serde_json::from_value(data.clone()).unwrap_or_default();
  }
  Some(node)
}

fn edge_from_value(value: &Value) -> Option<Edge> {
  let source = string_field(value, "source")?;
  let target = string_field(value, "target")?;
  let id = string_field(value, "id").unwrap_or_else(Edge::generate_id);
  let mut edge = Edge::new(id, source, target);
  edge.data = value
    .get("data")
    .and_then(|data| serde_json::from_value(data.clone()).ok());
  Some(edge)
}

/// A bare array of stages, laid out left to right in array order. An empty
/// array is declined.
pub struct ArrayShape;

impl ShapeAdapter for ArrayShape {
  fn name(&self) -> &'static str {
    "array"
  }

  fn adapt(&self, body: &Value) -> Option<Graph> {
    let items = body.as_array().filter(|items| !items.is_empty())?;
    let nodes = items
      .iter()
      .enumerate()
      .map(|(index, item)| {
        let plugin_id = string_field(item, "plugin_id").or_else(|| string_field(item, "id"));
        synthesize_node(format!("node_{}", index + 1), item, plugin_id, index)
      })
      .collect();
    Some(Graph::from_parts(nodes, Vec::new()))
  }
}

/// An object keyed by stage name. Last resort for shapes nothing else knows.
///
/// Only entries whose value is an object become nodes; an object with no such
/// entry is declined.
pub struct KeyMapShape;

impl ShapeAdapter for KeyMapShape {
  fn name(&self) -> &'static str {
    "key-map"
  }

  fn adapt(&self, body: &Value) -> Option<Graph> {
    let nodes: Vec<Node> = body
      .as_object()?
      .iter()
      .filter(|(_, value)| value.is_object())
      .enumerate()
      .map(|(index, (key, value))| {
        synthesize_node(key.clone(), value, string_field(value, "plugin_id"), index)
      })
      .collect();

    if nodes.is_empty() {
      return None;
    }
    Some(Graph::from_parts(nodes, Vec::new()))
  }
}

fn synthesize_node(id: String, item: &Value, plugin_id: Option<String>, index: usize) -> Node {
  let config: ConfigMap = item
    .get("config")
    .and_then(|config| serde_json::from_value(config.clone()).ok())
    .unwrap_or_default();

  Node {
    id,
    node_type: DEFAULT_NODE_TYPE.to_string(),
    position: Position::new(100.0 + 200.0 * index as f64, 100.0),
    data: NodeData {
      plugin_id,
      label: string_field(item, "name"),
      config: Some(config),
      extra: Map::new(),
    },
    extra: Map::new(),
  }
}

/// Read a field as a string, accepting numbers (Fledge ids are often numeric).
fn string_field(value: &Value, key: &str) -> Option<String> {
  match value.get(key)? {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Ordered list of adapters; the first one that accepts a body wins.
pub struct AdapterChain {
  adapters: Vec<Box<dyn ShapeAdapter>>,
}

impl AdapterChain {
  pub fn new(adapters: Vec<Box<dyn ShapeAdapter>>) -> Self {
    Self { adapters }
  }

  pub fn adapt(&self, body: &Value) -> Option<Graph> {
    self.adapters.iter().find_map(|adapter| {
      let graph = adapter.adapt(body)?;
      debug!(
        adapter = adapter.name(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "fledge response recognized"
      );
      Some(graph)
    })
  }
}

impl Default for AdapterChain {
  /// Elements, then nodes/edges, then bare array, then key map.
  fn default() -> Self {
    Self::new(vec![
      Box::new(ElementsShape),
      Box::new(NodesEdgesShape),
      Box::new(ArrayShape),
      Box::new(KeyMapShape),
    ])
  }
}
