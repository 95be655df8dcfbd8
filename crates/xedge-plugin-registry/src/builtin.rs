use async_trait::async_trait;

use xedge_config::{PluginDef, PluginSetting, PluginSettings, SettingType};

use crate::error::RegistryError;
use crate::registry::PluginCatalog;

/// The catalog compiled into the server, used when no catalog file is given.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
  plugins: Vec<PluginDef>,
}

impl BuiltinCatalog {
  pub fn new() -> Self {
    Self {
      plugins: builtin_plugins(),
    }
  }
}

impl Default for BuiltinCatalog {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl PluginCatalog for BuiltinCatalog {
  async fn get(&self, plugin_id: &str) -> Result<Option<PluginDef>, RegistryError> {
    Ok(self.plugins.iter().find(|p| p.id == plugin_id).cloned())
  }

  async fn list(&self) -> Result<Vec<PluginDef>, RegistryError> {
    Ok(self.plugins.clone())
  }
}

fn plugin(
  id: &str,
  name: &str,
  description: &str,
  plugin_type: &str,
  category: &str,
  settings: &[(&str, SettingType, &str)],
) -> PluginDef {
  let settings = (!settings.is_empty()).then(|| PluginSettings {
    basic: settings
      .iter()
      .map(|(key, setting_type, label)| PluginSetting {
        key: key.to_string(),
        setting_type: *setting_type,
        label: label.to_string(),
      })
      .collect(),
  });

  PluginDef {
    id: id.to_string(),
    name: name.to_string(),
    description: description.to_string(),
    plugin_type: plugin_type.to_string(),
    category: category.to_string(),
    settings,
  }
}

fn builtin_plugins() -> Vec<PluginDef> {
  vec![
    plugin(
      "plugin-input-http",
      "HTTP Request",
      "Make HTTP requests to external APIs",
      "input",
      "data",
      &[],
    ),
    plugin(
      "plugin-input-file",
      "File Input",
      "Read data from a file",
      "source",
      "Input",
      &[("filePath", SettingType::String, "File Path")],
    ),
    plugin(
      "plugin-input-api",
      "API Input",
      "Fetch data from an API",
      "source",
      "Input",
      &[
        ("apiUrl", SettingType::String, "API URL"),
        ("interval", SettingType::Number, "Polling Interval (ms)"),
      ],
    ),
    plugin(
      "plugin-filter-basic",
      "Basic Filter",
      "Filter data based on conditions",
      "filter",
      "Processing",
      &[("condition", SettingType::String, "Filter Condition")],
    ),
    plugin(
      "plugin-processor-transform",
      "Data Transform",
      "Transform data between formats",
      "processor",
      "transform",
      &[],
    ),
    plugin(
      "plugin-transform-json",
      "JSON Transform",
      "Transform data format",
      "transform",
      "Processing",
      &[("template", SettingType::Text, "JSON Template")],
    ),
    plugin(
      "plugin-process-ai",
      "AI Processor",
      "Process data using AI models",
      "process",
      "Advanced",
      &[
        ("modelId", SettingType::String, "Model ID"),
        ("batchSize", SettingType::Number, "Batch Size"),
      ],
    ),
    plugin(
      "plugin-output-webhook",
      "Webhook",
      "Send data to a webhook endpoint",
      "output",
      "integration",
      &[],
    ),
    plugin(
      "plugin-output-database",
      "Database Output",
      "Store data in a database",
      "sink",
      "Output",
      &[
        ("connectionString", SettingType::String, "Connection String"),
        ("tableName", SettingType::String, "Table Name"),
      ],
    ),
    plugin(
      "plugin-output-file",
      "File Output",
      "Write data to a file",
      "sink",
      "Output",
      &[("outputPath", SettingType::String, "Output File Path")],
    ),
  ]
}
