//! XEdge Server
//!
//! REST surface over the store, validator, plugin catalog and Fledge probe.
//! Resource routes live under `/api`:
//!
//! - `GET|POST /api/deployments`, `GET|PUT|DELETE /api/deployments/:id`
//! - `GET|PUT /api/deployments/:id/workflow`
//! - `GET /api/deployments/:id/workflow/remote`
//! - `GET /api/plugins`
//!
//! `GET /` is a liveness check.

mod deployments;
mod error;
mod plugins;
mod state;
mod workflows;

pub use error::ApiError;
pub use state::AppState;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
pub fn router(state: AppState) -> Router {
  let api = Router::new()
    .route(
      "/deployments",
      get(deployments::list).post(deployments::create),
    )
    .route(
      "/deployments/:id",
      get(deployments::get)
        .put(deployments::update)
        .delete(deployments::delete),
    )
    .route(
      "/deployments/:id/workflow",
      get(workflows::get).put(workflows::put),
    )
    .route("/deployments/:id/workflow/remote", get(workflows::remote))
    .route("/plugins", get(plugins::list));

  Router::new()
    .route("/", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> axum::Json<Value> {
  axum::Json(json!({ "message": "XEdge API is running" }))
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
  let listener = TcpListener::bind(addr).await?;
  info!(addr = %listener.local_addr()?, "xedge api listening");
  axum::serve(listener, router(state)).await
}
