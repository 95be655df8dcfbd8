//! XEdge Store
//!
//! This crate provides the storage trait and implementations for deployments
//! and their workflows. Each deployment owns exactly one workflow row, created
//! empty together with the deployment and deleted with it.
//!
//! The [`Store`] trait defines operations for:
//! - Creating, updating, listing and deleting deployments
//! - Fetching a deployment's workflow ("none yet" is not an error)
//! - Replacing a deployment's workflow wholesale (upsert, last writer wins)
//!
//! Two implementations are provided: [`SqliteStore`] for real deployments and
//! [`MemoryStore`] for tests and throwaway servers.

mod memory;
mod sqlite;
mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{Deployment, NewDeployment, StoredWorkflow};

use async_trait::async_trait;

use xedge_config::WorkflowDocument;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The requested record was not found.
  #[error("not found: {0}")]
  NotFound(String),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Schema migrations could not be applied.
  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

impl Error {
  pub(crate) fn deployment_not_found(id: i64) -> Self {
    Error::NotFound(format!("deployment {id}"))
  }
}

/// Storage trait for deployments and their workflows.
#[async_trait]
pub trait Store: Send + Sync {
  /// Create a deployment together with its empty workflow.
  async fn create_deployment(&self, deployment: &NewDeployment) -> Result<Deployment, Error>;

  /// Get a deployment by ID.
  async fn get_deployment(&self, id: i64) -> Result<Deployment, Error>;

  /// List all deployments, newest first.
  async fn list_deployments(&self) -> Result<Vec<Deployment>, Error>;

  /// Replace a deployment's name, host and port.
  async fn update_deployment(&self, id: i64, deployment: &NewDeployment)
  -> Result<Deployment, Error>;

  /// Delete a deployment and, with it, its workflow.
  async fn delete_deployment(&self, id: i64) -> Result<(), Error>;

  /// Get the workflow stored for a deployment, if any.
  async fn get_workflow(&self, deployment_id: i64) -> Result<Option<StoredWorkflow>, Error>;

  /// Insert or wholly replace the workflow of an existing deployment.
  async fn upsert_workflow(
    &self,
    deployment_id: i64,
    workflow: &WorkflowDocument,
  ) -> Result<StoredWorkflow, Error>;
}
