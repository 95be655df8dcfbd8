use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use xedge_config::WorkflowDocument;

use crate::{Deployment, Error, NewDeployment, Store, StoredWorkflow};

#[derive(Default)]
struct State {
  last_id: i64,
  deployments: BTreeMap<i64, Deployment>,
  workflows: BTreeMap<i64, StoredWorkflow>,
}

/// In-process store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
  state: RwLock<State>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn create_deployment(&self, deployment: &NewDeployment) -> Result<Deployment, Error> {
    let mut state = self.state.write().await;
    state.last_id += 1;

    let now = Utc::now();
    let created = Deployment {
      id: state.last_id,
      name: deployment.name.clone(),
      host: deployment.host.clone(),
      port: deployment.port.clone(),
      owner: deployment.owner.clone(),
      created_at: now,
      updated_at: now,
    };

    state.deployments.insert(created.id, created.clone());
    state.workflows.insert(
      created.id,
      StoredWorkflow {
        deployment_id: created.id,
        workflow: Json(WorkflowDocument::empty()),
        created_at: now,
        updated_at: now,
      },
    );

    Ok(created)
  }

  async fn get_deployment(&self, id: i64) -> Result<Deployment, Error> {
    self
      .state
      .read()
      .await
      .deployments
      .get(&id)
      .cloned()
      .ok_or_else(|| Error::deployment_not_found(id))
  }

  async fn list_deployments(&self) -> Result<Vec<Deployment>, Error> {
    let state = self.state.read().await;
    let mut deployments: Vec<Deployment> = state.deployments.values().cloned().collect();
    deployments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(deployments)
  }

  async fn update_deployment(
    &self,
    id: i64,
    deployment: &NewDeployment,
  ) -> Result<Deployment, Error> {
    let mut state = self.state.write().await;
    let existing = state
      .deployments
      .get_mut(&id)
      .ok_or_else(|| Error::deployment_not_found(id))?;

    existing.name = deployment.name.clone();
    existing.host = deployment.host.clone();
    existing.port = deployment.port.clone();
    existing.updated_at = Utc::now();
    Ok(existing.clone())
  }

  async fn delete_deployment(&self, id: i64) -> Result<(), Error> {
    let mut state = self.state.write().await;
    if state.deployments.remove(&id).is_none() {
      return Err(Error::deployment_not_found(id));
    }
    state.workflows.remove(&id);
    Ok(())
  }

  async fn get_workflow(&self, deployment_id: i64) -> Result<Option<StoredWorkflow>, Error> {
    Ok(self.state.read().await.workflows.get(&deployment_id).cloned())
  }

  async fn upsert_workflow(
    &self,
    deployment_id: i64,
    workflow: &WorkflowDocument,
  ) -> Result<StoredWorkflow, Error> {
    let mut state = self.state.write().await;
    if !state.deployments.contains_key(&deployment_id) {
      return Err(Error::deployment_not_found(deployment_id));
    }

    let now = Utc::now();
    let stored = state
      .workflows
      .entry(deployment_id)
      .and_modify(|existing| {
        existing.workflow = Json(workflow.clone());
        existing.updated_at = now;
      })
      .or_insert_with(|| StoredWorkflow {
        deployment_id,
        workflow: Json(workflow.clone()),
        created_at: now,
        updated_at: now,
      });

    Ok(stored.clone())
  }
}
