use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::Serialize;
use tracing::{info, warn};

use xedge_config::WorkflowDocument;
use xedge_workflow::encode_document;

use crate::deployments::deployment_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Where a workflow returned by the remote endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WorkflowSource {
  Fledge,
  Local,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoteWorkflow {
  source: WorkflowSource,
  #[serde(flatten)]
  document: WorkflowDocument,
}

/// The stored workflow of a deployment, or an empty one if it was never saved.
async fn stored_document(state: &AppState, id: i64) -> Result<WorkflowDocument, ApiError> {
  let stored = state.store.get_workflow(id).await?;
  Ok(stored.map(|w| w.into_document()).unwrap_or_default())
}

pub(crate) async fn get(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<WorkflowDocument>, ApiError> {
  let id = deployment_id(id)?;
  state.store.get_deployment(id).await?;
  Ok(Json(stored_document(&state, id).await?))
}

/// Validate, then replace the stored workflow. A rejected submission leaves
/// the stored copy untouched.
pub(crate) async fn put(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
  payload: Result<Json<WorkflowDocument>, JsonRejection>,
) -> Result<Json<WorkflowDocument>, ApiError> {
  let id = deployment_id(id)?;
  let Json(document) = payload?;

  if let Err(e) = state.validator.validate(&document).await {
    warn!(deployment_id = id, error = %e, "workflow rejected");
    return Err(e.into());
  }

  let stored = state.store.upsert_workflow(id, &document).await?;
  info!(
    deployment_id = id,
    elements = document.elements.len(),
    "workflow saved"
  );
  Ok(Json(stored.into_document()))
}

/// Import the workflow from the deployment's Fledge host, falling back to the
/// stored copy when Fledge cannot provide one.
pub(crate) async fn remote(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<RemoteWorkflow>, ApiError> {
  let id = deployment_id(id)?;
  let deployment = state.store.get_deployment(id).await?;

  match state
    .fledge
    .fetch_graph(&deployment.host, &deployment.port)
    .await
  {
    Ok(graph) => Ok(Json(RemoteWorkflow {
      source: WorkflowSource::Fledge,
      document: encode_document(&graph),
    })),
    Err(e) => {
      warn!(deployment_id = id, error = %e, "fledge unavailable, serving stored workflow");
      Ok(Json(RemoteWorkflow {
        source: WorkflowSource::Local,
        document: stored_document(&state, id).await?,
      }))
    }
  }
}
