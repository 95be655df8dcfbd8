use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use xedge_config::PluginDef;

use crate::error::RegistryError;
use crate::registry::PluginCatalog;

/// Plugin catalog backed by a JSON file holding an array of plugin definitions,
/// in the same shape as `GET /plugins` returns.
///
/// The file is re-read on every call so edits apply without a restart.
pub struct FsPluginCatalog {
  path: PathBuf,
}

impl FsPluginCatalog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn load(&self) -> Result<Vec<PluginDef>, RegistryError> {
    let content = fs::read_to_string(&self.path).await?;
    let plugins: Vec<PluginDef> = serde_json::from_str(&content)?;

    let mut seen = HashSet::new();
    for plugin in &plugins {
      if !seen.insert(plugin.id.as_str()) {
        return Err(RegistryError::DuplicatePlugin(plugin.id.clone()));
      }
    }

    Ok(plugins)
  }
}

#[async_trait]
impl PluginCatalog for FsPluginCatalog {
  async fn get(&self, plugin_id: &str) -> Result<Option<PluginDef>, RegistryError> {
    Ok(self.load().await?.into_iter().find(|p| p.id == plugin_id))
  }

  async fn list(&self) -> Result<Vec<PluginDef>, RegistryError> {
    self.load().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use xedge_config::SettingType;

  const CATALOG: &str = r#"[
    {
      "id": "plugin-input-file",
      "name": "File Input",
      "category": "Input",
      "description": "Read data from a file",
      "type": "source",
      "settings": { "basic": [{ "key": "filePath", "type": "string", "label": "File Path" }] }
    },
    {
      "id": "plugin-output-webhook",
      "name": "Webhook",
      "description": "Send data to a webhook endpoint",
      "type": "output",
      "category": "integration"
    }
  ]"#;

  fn write_catalog(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("plugins.json");
    std::fs::write(&path, content).expect("failed to write catalog");
    (dir, path)
  }

  #[tokio::test]
  async fn test_list_and_get() {
    let (_dir, path) = write_catalog(CATALOG);
    let catalog = FsPluginCatalog::new(&path);

    assert_eq!(catalog.list().await.unwrap().len(), 2);

    let plugin = catalog.get("plugin-input-file").await.unwrap().unwrap();
    assert_eq!(
      plugin.setting("filePath").map(|s| s.setting_type),
      Some(SettingType::String)
    );
    assert!(catalog.get("plugin-input-api").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_missing_file() {
    let catalog = FsPluginCatalog::new("/nonexistent/plugins.json");
    assert!(matches!(catalog.list().await, Err(RegistryError::Io(_))));
  }

  #[tokio::test]
  async fn test_invalid_json() {
    let (_dir, path) = write_catalog("{ not json");
    let catalog = FsPluginCatalog::new(&path);
    assert!(matches!(catalog.list().await, Err(RegistryError::Parse(_))));
  }

  #[tokio::test]
  async fn test_duplicate_ids() {
    let (_dir, path) = write_catalog(
      r#"[
        { "id": "p", "name": "A", "type": "input", "category": "x" },
        { "id": "p", "name": "B", "type": "input", "category": "x" }
      ]"#,
    );
    let catalog = FsPluginCatalog::new(&path);
    assert!(matches!(
      catalog.list().await,
      Err(RegistryError::DuplicatePlugin(id)) if id == "p"
    ));
  }
}
