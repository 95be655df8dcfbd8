use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::ConfigMap;

/// Element type reserved for edges in the flat representation.
pub const EDGE_TYPE: &str = "edge";

/// Node type assumed when an element carries none.
pub const DEFAULT_NODE_TYPE: &str = "default";

/// A single entry of the flat `elements` array.
///
/// Every field is optional on the wire. Node elements carry `position` and
/// `data`; edge elements carry `source` and `target`. Fields this type does
/// not know about are kept in `extra` so they survive a save/load cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,

  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub element_type: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<Position>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<NodeData>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target: Option<String>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Element {
  /// The element id, if present and non-empty.
  pub fn id(&self) -> Option<&str> {
    self.id.as_deref().filter(|id| !id.is_empty())
  }

  /// Whether the element encodes an edge.
  pub fn is_edge(&self) -> bool {
    self.element_type.as_deref() == Some(EDGE_TYPE)
  }

  /// The node type, falling back to [`DEFAULT_NODE_TYPE`].
  pub fn node_type(&self) -> &str {
    node_type_or_default(self.element_type.as_deref().unwrap_or_default())
  }
}

/// The type a node may carry: [`EDGE_TYPE`] and the empty string are
/// replaced by [`DEFAULT_NODE_TYPE`].
pub fn node_type_or_default(node_type: &str) -> &str {
  if node_type.is_empty() || node_type == EDGE_TYPE {
    DEFAULT_NODE_TYPE
  } else {
    node_type
  }
}

/// Canvas coordinate of a node. Layout only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// The `data` payload of a node element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
  /// Soft reference into the plugin catalog.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub plugin_id: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,

  /// Plugin-specific settings, shaped by the plugin's declared schema.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub config: Option<ConfigMap>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}
