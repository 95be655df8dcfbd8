use serde::{Deserialize, Serialize};

use crate::value::{ConfigValue, TypedValue};

/// A plugin catalog entry. Nodes reference it by `id`; it is never embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDef {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  /// Role of the plugin in a pipeline, e.g. "input", "processor", "sink".
  #[serde(rename = "type")]
  pub plugin_type: String,
  pub category: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub settings: Option<PluginSettings>,
}

impl PluginDef {
  /// Look up a declared setting by key.
  pub fn setting(&self, key: &str) -> Option<&PluginSetting> {
    self
      .settings
      .as_ref()
      .and_then(|s| s.basic.iter().find(|setting| setting.key == key))
  }
}

/// Declared settings schema of a plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
  #[serde(default)]
  pub basic: Vec<PluginSetting>,
}

/// One `(key, type, label)` tuple of a plugin's settings schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSetting {
  pub key: String,
  #[serde(rename = "type")]
  pub setting_type: SettingType,
  pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
  String,
  Number,
  Boolean,
  /// Multi-line string.
  Text,
}

impl SettingType {
  /// Interpret a raw config value as this type.
  pub fn coerce(self, value: &ConfigValue) -> Option<TypedValue> {
    match (self, value) {
      (SettingType::String, ConfigValue::String(s)) => Some(TypedValue::String(s.clone())),
      (SettingType::Text, ConfigValue::String(s)) => Some(TypedValue::Text(s.clone())),
      (SettingType::Number, ConfigValue::Number(n)) => n.as_f64().map(TypedValue::Number),
      (SettingType::Number, ConfigValue::String(s)) => {
        s.trim().parse::<f64>().ok().map(TypedValue::Number)
      }
      (SettingType::Boolean, ConfigValue::Boolean(b)) => Some(TypedValue::Boolean(*b)),
      (SettingType::Boolean, ConfigValue::String(s)) => match s.as_str() {
        "true" => Some(TypedValue::Boolean(true)),
        "false" => Some(TypedValue::Boolean(false)),
        _ => None,
      },
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SettingType::String => "string",
      SettingType::Number => "number",
      SettingType::Boolean => "boolean",
      SettingType::Text => "text",
    }
  }
}

impl std::fmt::Display for SettingType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
