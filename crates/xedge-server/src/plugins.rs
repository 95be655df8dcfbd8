use axum::Json;
use axum::extract::State;

use xedge_config::PluginDef;

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Vec<PluginDef>>, ApiError> {
  Ok(Json(state.catalog.list().await?))
}
