//! Plugin configuration values.
//!
//! On the wire a node's `data.config` is an open JSON object. Each value is
//! kept as a [`ConfigValue`], which preserves the original JSON exactly. A
//! value only gains a meaning once it is read against the plugin's declared
//! setting type, producing a [`TypedValue`]:
//!
//! | declared type | accepted wire values                        |
//! |---------------|---------------------------------------------|
//! | `string`      | strings                                     |
//! | `text`        | strings                                     |
//! | `number`      | numbers, strings that parse as numbers      |
//! | `boolean`     | booleans, the strings `"true"` / `"false"`  |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Config map of a node, keyed by setting key.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A raw config value as received from the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
  Boolean(bool),
  Number(serde_json::Number),
  String(String),
  /// Anything else (null, arrays, nested objects).
  Json(serde_json::Value),
}

impl ConfigValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      ConfigValue::String(s) => Some(s),
      _ => None,
    }
  }
}

impl From<&str> for ConfigValue {
  fn from(value: &str) -> Self {
    ConfigValue::String(value.to_string())
  }
}

impl From<String> for ConfigValue {
  fn from(value: String) -> Self {
    ConfigValue::String(value)
  }
}

impl From<bool> for ConfigValue {
  fn from(value: bool) -> Self {
    ConfigValue::Boolean(value)
  }
}

impl From<i64> for ConfigValue {
  fn from(value: i64) -> Self {
    ConfigValue::Number(value.into())
  }
}

impl From<serde_json::Value> for ConfigValue {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Bool(b) => ConfigValue::Boolean(b),
      serde_json::Value::Number(n) => ConfigValue::Number(n),
      serde_json::Value::String(s) => ConfigValue::String(s),
      other => ConfigValue::Json(other),
    }
  }
}

/// A config value interpreted against its declared setting type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
  String(String),
  Number(f64),
  Boolean(bool),
  Text(String),
}
