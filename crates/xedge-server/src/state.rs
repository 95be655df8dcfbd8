use std::sync::Arc;

use xedge_fledge::FledgeClient;
use xedge_plugin_registry::PluginCatalog;
use xedge_store::Store;
use xedge_validator::Validator;

/// Shared handler state. Each collaborator is chosen once at startup.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub validator: Arc<dyn Validator>,
  pub catalog: Arc<dyn PluginCatalog>,
  pub fledge: FledgeClient,
}
