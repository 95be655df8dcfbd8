use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use xedge_plugin_registry::RegistryError;
use xedge_validator::ValidationError;

/// Errors a handler can answer with.
///
/// Every variant is rendered as `{"error": "<message>"}`. Storage and catalog
/// failures are logged and answered with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// The request itself is malformed: bad JSON, bad id, missing fields.
  #[error("{0}")]
  BadRequest(String),

  /// The submitted workflow failed validation.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("{0}")]
  NotFound(String),

  #[error("storage error: {0}")]
  Storage(xedge_store::Error),

  #[error("plugin catalog error: {0}")]
  Catalog(#[from] RegistryError),
}

impl ApiError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Storage(_) | Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<xedge_store::Error> for ApiError {
  fn from(err: xedge_store::Error) -> Self {
    match err {
      xedge_store::Error::NotFound(_) => Self::NotFound("Deployment not found".to_string()),
      other => Self::Storage(other),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(_: PathRejection) -> Self {
    Self::BadRequest("Invalid deployment ID".to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let message = match &self {
      Self::Storage(_) | Self::Catalog(_) => {
        error!(error = %self, "request failed");
        "Server error".to_string()
      }
      other => other.to_string(),
    };

    (status, Json(json!({ "error": message }))).into_response()
  }
}
