use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xedge_config::{ConfigMap, DEFAULT_NODE_TYPE, NodeData, Position};

/// A processing stage of a workflow, usually bound to a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(rename = "type", default = "default_node_type")]
  pub node_type: String,
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub data: NodeData,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

fn default_node_type() -> String {
  DEFAULT_NODE_TYPE.to_string()
}

impl Node {
  /// Create a node of the default type with empty data.
  pub fn new(id: impl Into<String>, position: Position) -> Self {
    Self {
      id: id.into(),
      node_type: default_node_type(),
      position,
      data: NodeData::default(),
      extra: Map::new(),
    }
  }

  /// Create a node bound to a plugin, labelled and with an empty config.
  pub fn for_plugin(
    id: impl Into<String>,
    plugin_id: impl Into<String>,
    label: impl Into<String>,
    position: Position,
  ) -> Self {
    let mut node = Self::new(id, position);
    node.data = NodeData {
      plugin_id: Some(plugin_id.into()),
      label: Some(label.into()),
      config: Some(ConfigMap::new()),
      extra: Map::new(),
    };
    node
  }

  /// Generate a fresh node id: `{plugin_id}-{millis}` or `node_{millis}`.
  ///
  /// Ids are only unique at millisecond granularity; callers inserting
  /// several nodes at once must disambiguate themselves.
  pub fn generate_id(plugin_id: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    match plugin_id {
      Some(plugin_id) => format!("{plugin_id}-{millis}"),
      None => format!("node_{millis}"),
    }
  }

  pub fn plugin_id(&self) -> Option<&str> {
    self.data.plugin_id.as_deref()
  }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
  pub id: String,
  pub source: String,
  pub target: String,
  /// Edge payload, e.g. a label drawn on the connection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<NodeData>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Edge {
  pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source: source.into(),
      target: target.into(),
      data: None,
      extra: Map::new(),
    }
  }

  /// Generate a fresh edge id.
  pub fn generate_id() -> String {
    format!("edge-{}", uuid::Uuid::new_v4())
  }

  /// Whether either endpoint is the given node.
  pub fn touches(&self, node_id: &str) -> bool {
    self.source == node_id || self.target == node_id
  }
}

/// A partial update of a node's `data`, merged shallowly.
///
/// Present fields replace the node's fields wholesale, including `config`;
/// absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub plugin_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub config: Option<ConfigMap>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl NodeDataPatch {
  pub fn label(label: impl Into<String>) -> Self {
    Self {
      label: Some(label.into()),
      ..Self::default()
    }
  }

  pub fn config(config: ConfigMap) -> Self {
    Self {
      config: Some(config),
      ..Self::default()
    }
  }

  pub(crate) fn apply(self, data: &mut NodeData) {
    if let Some(plugin_id) = self.plugin_id {
      data.plugin_id = Some(plugin_id);
    }
    if let Some(label) = self.label {
      data.label = Some(label);
    }
    if let Some(config) = self.config {
      data.config = Some(config);
    }
    data.extra.extend(self.extra);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use xedge_config::ConfigValue;

  #[test]
  fn test_generate_id_with_plugin() {
    let id = Node::generate_id(Some("plugin-input-file"));
    assert!(id.starts_with("plugin-input-file-"));
    let suffix = &id["plugin-input-file-".len()..];
    assert!(suffix.parse::<i64>().is_ok());
  }

  #[test]
  fn test_generate_id_without_plugin() {
    assert!(Node::generate_id(None).starts_with("node_"));
  }

  #[test]
  fn test_edge_ids_are_distinct() {
    assert_ne!(Edge::generate_id(), Edge::generate_id());
  }

  #[test]
  fn test_patch_is_shallow() {
    let mut data = NodeData {
      plugin_id: Some("plugin-input-api".to_string()),
      label: Some("API Input".to_string()),
      config: Some(ConfigMap::from([
        ("apiUrl".to_string(), ConfigValue::from("https://a")),
        ("interval".to_string(), ConfigValue::from(5000_i64)),
      ])),
      extra: Map::new(),
    };

    NodeDataPatch::config(ConfigMap::from([(
      "apiUrl".to_string(),
      ConfigValue::from("https://b"),
    )]))
    .apply(&mut data);

    // config is replaced as a whole, not merged key by key
    let config = data.config.as_ref().unwrap();
    assert_eq!(config.len(), 1);
    assert_eq!(config["apiUrl"], ConfigValue::from("https://b"));
    assert_eq!(data.label.as_deref(), Some("API Input"));
    assert_eq!(data.plugin_id.as_deref(), Some("plugin-input-api"));
  }
}
