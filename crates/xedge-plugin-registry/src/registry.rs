use std::sync::Arc;

use async_trait::async_trait;

use xedge_config::PluginDef;

use crate::error::RegistryError;

/// Read-only catalog of plugins that workflow nodes may reference.
#[async_trait]
pub trait PluginCatalog: Send + Sync {
  /// Get a plugin by id. `Ok(None)` means the catalog answered and the id is
  /// unknown; an error means the catalog could not be consulted.
  async fn get(&self, plugin_id: &str) -> Result<Option<PluginDef>, RegistryError>;

  /// List every plugin, in catalog order.
  async fn list(&self) -> Result<Vec<PluginDef>, RegistryError>;
}

#[async_trait]
impl<C: PluginCatalog + ?Sized> PluginCatalog for Arc<C> {
  async fn get(&self, plugin_id: &str) -> Result<Option<PluginDef>, RegistryError> {
    (**self).get(plugin_id).await
  }

  async fn list(&self) -> Result<Vec<PluginDef>, RegistryError> {
    (**self).list().await
  }
}
