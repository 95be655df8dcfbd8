use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use xedge_config::WorkflowDocument;

/// A registered edge deployment as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Deployment {
  pub id: i64,
  pub name: String,
  pub host: String,
  pub port: String,
  pub owner: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeployment {
  pub name: String,
  pub host: String,
  pub port: String,
  #[serde(default)]
  pub owner: Option<String>,
}

/// The workflow row of one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoredWorkflow {
  pub deployment_id: i64,
  pub workflow: Json<WorkflowDocument>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl StoredWorkflow {
  pub fn document(&self) -> &WorkflowDocument {
    &self.workflow.0
  }

  pub fn into_document(self) -> WorkflowDocument {
    self.workflow.0
  }
}
