use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use xedge_store::{Deployment, NewDeployment};

use crate::error::ApiError;
use crate::state::AppState;

/// Deployment fields as clients send them. The port arrives either as a
/// string or as a number.
#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentRequest {
  name: Option<String>,
  host: Option<String>,
  port: Option<PortValue>,
  owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
  Text(String),
  Number(serde_json::Number),
}

impl DeploymentRequest {
  fn into_new_deployment(self) -> Result<NewDeployment, ApiError> {
    let port = self.port.map(|port| match port {
      PortValue::Text(text) => text,
      PortValue::Number(number) => number.to_string(),
    });

    match (non_empty(self.name), non_empty(self.host), non_empty(port)) {
      (Some(name), Some(host), Some(port)) => Ok(NewDeployment {
        name,
        host,
        port,
        owner: self.owner,
      }),
      _ => Err(ApiError::BadRequest("All fields are required".to_string())),
    }
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// Unwrap a path id, turning a non-integer id into a 400.
pub(crate) fn deployment_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  let Path(id) = id?;
  Ok(id)
}

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Vec<Deployment>>, ApiError> {
  Ok(Json(state.store.list_deployments().await?))
}

pub(crate) async fn create(
  State(state): State<AppState>,
  payload: Result<Json<DeploymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Deployment>), ApiError> {
  let Json(request) = payload?;
  let deployment = state
    .store
    .create_deployment(&request.into_new_deployment()?)
    .await?;

  info!(deployment_id = deployment.id, name = %deployment.name, "deployment created");
  Ok((StatusCode::CREATED, Json(deployment)))
}

pub(crate) async fn get(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deployment>, ApiError> {
  let id = deployment_id(id)?;
  Ok(Json(state.store.get_deployment(id).await?))
}

pub(crate) async fn update(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
  payload: Result<Json<DeploymentRequest>, JsonRejection>,
) -> Result<Json<Deployment>, ApiError> {
  let id = deployment_id(id)?;
  let Json(request) = payload?;
  let deployment = state
    .store
    .update_deployment(id, &request.into_new_deployment()?)
    .await?;
  Ok(Json(deployment))
}

pub(crate) async fn delete(
  State(state): State<AppState>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
  let id = deployment_id(id)?;
  state.store.delete_deployment(id).await?;

  info!(deployment_id = id, "deployment deleted");
  Ok(Json(json!({ "message": "Deployment deleted successfully" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(body: Value) -> DeploymentRequest {
    serde_json::from_value(body).unwrap()
  }

  #[test]
  fn test_numeric_port_is_accepted() {
    let new = request(json!({ "name": "edge", "host": "10.0.0.2", "port": 8081 }))
      .into_new_deployment()
      .unwrap();
    assert_eq!(new.port, "8081");
    assert_eq!(new.owner, None);
  }

  #[test]
  fn test_missing_or_blank_fields_are_rejected() {
    for body in [
      json!({ "host": "h", "port": "1" }),
      json!({ "name": "n", "host": "  ", "port": "1" }),
      json!({ "name": "n", "host": "h" }),
    ] {
      let err = request(body).into_new_deployment().unwrap_err();
      assert_eq!(err.to_string(), "All fields are required");
    }
  }
}
