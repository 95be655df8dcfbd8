use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use xedge_fledge::{FledgeClient, FledgeConfig, FledgeError};

/// Serve `app` on an ephemeral local port and return that port.
async fn spawn(app: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let port = listener.local_addr().unwrap().port();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  port.to_string()
}

fn client(timeout_ms: u64) -> FledgeClient {
  FledgeClient::new(FledgeConfig {
    timeout: Duration::from_millis(timeout_ms),
    ..FledgeConfig::default()
  })
  .unwrap()
}

#[tokio::test]
async fn test_first_answering_path_wins() {
  let app = Router::new()
    .route(
      "/fledge/pipeline",
      get(|| async { axum::Json(json!([{ "plugin_id": "sinusoid", "name": "Sine" }])) }),
    )
    .route(
      "/fledge/filter",
      get(|| async { axum::Json(json!({ "elements": [{ "id": "unused" }] })) }),
    );
  let port = spawn(app).await;

  let graph = client(3000).fetch_graph("127.0.0.1", &port).await.unwrap();
  assert_eq!(graph.nodes().len(), 1);
  assert_eq!(graph.nodes()[0].plugin_id(), Some("sinusoid"));
}

#[tokio::test]
async fn test_unrecognized_body_moves_on() {
  let app = Router::new()
    .route(
      "/fledge/workflow",
      get(|| async { axum::Json(json!({ "message": "no workflow here" })) }),
    )
    .route(
      "/fledge/schedule",
      get(|| async {
        axum::Json(json!({
          "nodes": [{ "id": "a" }, { "id": "b" }],
          "edges": [{ "id": "e", "source": "a", "target": "b" }]
        }))
      }),
    );
  let port = spawn(app).await;

  let graph = client(3000).fetch_graph("127.0.0.1", &port).await.unwrap();
  assert_eq!(graph.nodes().len(), 2);
  assert_eq!(graph.edges().len(), 1);
}

#[tokio::test]
async fn test_empty_array_moves_on() {
  let app = Router::new()
    .route("/fledge/workflow", get(|| async { axum::Json(json!([])) }))
    .route(
      "/fledge/pipeline",
      get(|| async { axum::Json(json!([{ "id": "sinusoid" }])) }),
    );
  let port = spawn(app).await;

  let graph = client(3000).fetch_graph("127.0.0.1", &port).await.unwrap();
  assert_eq!(graph.nodes().len(), 1);
  assert_eq!(graph.nodes()[0].plugin_id(), Some("sinusoid"));
}

#[tokio::test]
async fn test_slow_candidate_times_out() {
  let app = Router::new()
    .route(
      "/fledge/workflow",
      get(|| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        axum::Json(json!({ "elements": [{ "id": "late" }] }))
      }),
    )
    .route(
      "/fledge/pipeline",
      get(|| async { axum::Json(json!({ "elements": [{ "id": "prompt" }] })) }),
    );
  let port = spawn(app).await;

  let graph = client(200).fetch_graph("127.0.0.1", &port).await.unwrap();
  assert!(graph.node("prompt").is_some());
  assert!(graph.node("late").is_none());
}

#[tokio::test]
async fn test_every_candidate_failing_is_exhausted() {
  let app = Router::new().route(
    "/fledge/workflow",
    get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(Value::Null)) }),
  );
  let port = spawn(app).await;

  let err = client(3000).fetch_graph("127.0.0.1", &port).await.unwrap_err();
  assert!(matches!(err, FledgeError::Exhausted { attempts: 4, .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_exhausted() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let port = listener.local_addr().unwrap().port().to_string();
  drop(listener);

  let err = client(500).fetch_graph("127.0.0.1", &port).await.unwrap_err();
  assert!(matches!(err, FledgeError::Exhausted { .. }));
}
