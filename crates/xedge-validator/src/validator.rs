use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::{debug, warn};

use xedge_config::{PluginDef, WorkflowDocument};
use xedge_plugin_registry::PluginCatalog;
use xedge_workflow::{Graph, decode_document};

use crate::error::ValidationError;

/// Validator gates a submitted workflow before it is persisted.
#[async_trait]
pub trait Validator: Send + Sync {
  /// Validate a flat workflow document and return its canonical graph.
  ///
  /// The whole document is rejected on the first violation; nothing is
  /// partially accepted.
  async fn validate(&self, document: &WorkflowDocument) -> Result<Graph, ValidationError>;
}

/// Which rules beyond the id rule are enforced.
///
/// The id rule (every element has a non-empty id) is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
  /// Reject two elements sharing an id.
  pub reject_duplicate_ids: bool,
  /// Reject edges without both endpoints, or with endpoints that are not
  /// nodes of the same submission.
  pub reject_dangling_edges: bool,
  /// Check `pluginId` references and their config against the catalog.
  pub check_plugins: bool,
}

impl ValidationOptions {
  /// Only the id rule.
  pub fn lenient() -> Self {
    Self {
      reject_duplicate_ids: false,
      reject_dangling_edges: false,
      check_plugins: false,
    }
  }
}

impl Default for ValidationOptions {
  fn default() -> Self {
    Self {
      reject_duplicate_ids: true,
      reject_dangling_edges: true,
      check_plugins: true,
    }
  }
}

/// Standard validator implementation that uses a plugin catalog.
pub struct StandardValidator<C: PluginCatalog> {
  catalog: C,
  options: ValidationOptions,
}

impl<C: PluginCatalog> StandardValidator<C> {
  /// Create a validator enforcing every rule.
  pub fn new(catalog: C) -> Self {
    Self::with_options(catalog, ValidationOptions::default())
  }

  pub fn with_options(catalog: C, options: ValidationOptions) -> Self {
    Self { catalog, options }
  }

  pub fn options(&self) -> ValidationOptions {
    self.options
  }

  /// Every element must carry a non-empty id.
  fn check_ids(&self, document: &WorkflowDocument) -> Result<(), ValidationError> {
    for (index, element) in document.elements.iter().enumerate() {
      if element.id().is_none() {
        return Err(ValidationError::MissingId { index });
      }
    }
    Ok(())
  }

  fn check_unique_ids(&self, document: &WorkflowDocument) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in document.elements.iter().filter_map(|e| e.id()) {
      if !seen.insert(id) {
        return Err(ValidationError::DuplicateId { id: id.to_string() });
      }
    }
    Ok(())
  }

  fn check_edges(&self, document: &WorkflowDocument) -> Result<(), ValidationError> {
    let node_ids: HashSet<&str> = document
      .elements
      .iter()
      .filter(|e| !e.is_edge())
      .filter_map(|e| e.id())
      .collect();

    for edge in document.elements.iter().filter(|e| e.is_edge()) {
      let edge_id = edge.id().unwrap_or_default();
      let (Some(source), Some(target)) = (edge.source.as_deref(), edge.target.as_deref()) else {
        return Err(ValidationError::MalformedEdge {
          edge_id: edge_id.to_string(),
        });
      };

      for endpoint in [source, target] {
        if !node_ids.contains(endpoint) {
          return Err(ValidationError::DanglingEdge {
            edge_id: edge_id.to_string(),
            node_id: endpoint.to_string(),
          });
        }
      }
    }
    Ok(())
  }

  /// Check plugin references and declared config types.
  ///
  /// A catalog that cannot be consulted disables the check for this
  /// submission; plugin references are soft and resolved lazily elsewhere.
  async fn check_plugins(&self, graph: &Graph) -> Result<(), ValidationError> {
    let mut plugins: HashMap<String, PluginDef> = HashMap::new();

    for node in graph.nodes() {
      let Some(plugin_id) = node.plugin_id() else {
        continue;
      };

      let plugin = match plugins.entry(plugin_id.to_string()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => match self.catalog.get(plugin_id).await {
          Ok(Some(plugin)) => entry.insert(plugin),
          Ok(None) => {
            return Err(ValidationError::UnknownPlugin {
              node_id: node.id.clone(),
              plugin_id: plugin_id.to_string(),
            });
          }
          Err(e) => {
            warn!(error = %e, "plugin catalog unavailable, skipping plugin checks");
            return Ok(());
          }
        },
      };

      let Some(config) = node.data.config.as_ref() else {
        continue;
      };
      for (key, value) in config {
        if let Some(setting) = plugin.setting(key) {
          if setting.setting_type.coerce(value).is_none() {
            return Err(ValidationError::InvalidConfigValue {
              node_id: node.id.clone(),
              key: key.clone(),
              expected: setting.setting_type,
            });
          }
        }
      }
    }

    Ok(())
  }
}

#[async_trait]
impl<C: PluginCatalog> Validator for StandardValidator<C> {
  async fn validate(&self, document: &WorkflowDocument) -> Result<Graph, ValidationError> {
    self.check_ids(document)?;

    if self.options.reject_duplicate_ids {
      self.check_unique_ids(document)?;
    }
    if self.options.reject_dangling_edges {
      self.check_edges(document)?;
    }

    let graph = decode_document(document);

    if self.options.check_plugins {
      self.check_plugins(&graph).await?;
    }

    debug!(
      nodes = graph.nodes().len(),
      edges = graph.edges().len(),
      "workflow validated"
    );
    Ok(graph)
  }
}
