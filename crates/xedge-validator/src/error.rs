use thiserror::Error;

use xedge_config::SettingType;

/// Reasons a submitted workflow is rejected. All of them are caller errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
  /// An element has no id, or an empty one.
  #[error("All nodes must have an id")]
  MissingId { index: usize },

  /// Two elements share an id.
  #[error("duplicate element id: {id}")]
  DuplicateId { id: String },

  /// An edge element lacks `source` or `target`.
  #[error("edge '{edge_id}' must have a source and a target")]
  MalformedEdge { edge_id: String },

  /// An edge points at a node that is not part of the submission.
  #[error("edge '{edge_id}' references unknown node '{node_id}'")]
  DanglingEdge { edge_id: String, node_id: String },

  /// A node references a plugin the catalog does not know.
  #[error("node '{node_id}' references unknown plugin '{plugin_id}'")]
  UnknownPlugin { node_id: String, plugin_id: String },

  /// A config value does not match the type its plugin declares.
  #[error("node '{node_id}': setting '{key}' must be a {expected}")]
  InvalidConfigValue {
    node_id: String,
    key: String,
    expected: SettingType,
  },
}
