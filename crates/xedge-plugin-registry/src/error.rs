use thiserror::Error;

/// Errors that can occur while reading a plugin catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("failed to read plugin catalog: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid plugin catalog: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("duplicate plugin id in catalog: {0}")]
  DuplicatePlugin(String),
}
