//! Behaviour shared by every `Store` implementation.

use serde_json::json;
use xedge_config::WorkflowDocument;
use xedge_store::{Error, MemoryStore, NewDeployment, SqliteStore, Store};

fn new_deployment(name: &str) -> NewDeployment {
  NewDeployment {
    name: name.to_string(),
    host: "localhost".to_string(),
    port: "8080".to_string(),
    owner: Some("admin".to_string()),
  }
}

fn two_nodes() -> WorkflowDocument {
  serde_json::from_value(json!({
    "elements": [
      { "id": "node-1", "type": "httpRequest", "position": { "x": 100, "y": 100 }, "data": { "label": "HTTP Request" } },
      { "id": "node-2", "type": "transformer", "position": { "x": 300, "y": 200 }, "data": { "label": "Transform Data" } },
      { "id": "e1", "type": "edge", "source": "node-1", "target": "node-2" }
    ]
  }))
  .unwrap()
}

async fn sqlite_memory() -> SqliteStore {
  SqliteStore::connect("sqlite::memory:")
    .await
    .expect("failed to open in-memory sqlite")
}

async fn check_new_deployment_has_empty_workflow(store: &dyn Store) {
  let deployment = store.create_deployment(&new_deployment("Test Deployment")).await.unwrap();
  assert_eq!(deployment.name, "Test Deployment");
  assert_eq!(deployment.owner.as_deref(), Some("admin"));

  let workflow = store.get_workflow(deployment.id).await.unwrap().unwrap();
  assert_eq!(workflow.document(), &WorkflowDocument::empty());
}

async fn check_upsert_replaces_wholesale(store: &dyn Store) {
  let deployment = store.create_deployment(&new_deployment("d")).await.unwrap();
  let doc = two_nodes();

  let first = store.upsert_workflow(deployment.id, &doc).await.unwrap();
  let second = store.upsert_workflow(deployment.id, &doc).await.unwrap();
  assert_eq!(second.created_at, first.created_at);

  let stored = store.get_workflow(deployment.id).await.unwrap().unwrap();
  assert_eq!(stored.document(), &doc);
  assert_eq!(stored.document().elements.len(), 3);

  let smaller = WorkflowDocument::new(doc.elements[..1].to_vec());
  store.upsert_workflow(deployment.id, &smaller).await.unwrap();
  let stored = store.get_workflow(deployment.id).await.unwrap().unwrap();
  assert_eq!(stored.into_document(), smaller);
}

async fn check_upsert_unknown_deployment(store: &dyn Store) {
  let err = store.upsert_workflow(9999, &two_nodes()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert!(store.get_workflow(9999).await.unwrap().is_none());
}

async fn check_delete_cascades(store: &dyn Store) {
  let deployment = store.create_deployment(&new_deployment("doomed")).await.unwrap();
  store.upsert_workflow(deployment.id, &two_nodes()).await.unwrap();

  store.delete_deployment(deployment.id).await.unwrap();

  assert!(matches!(
    store.get_deployment(deployment.id).await,
    Err(Error::NotFound(_))
  ));
  assert!(store.get_workflow(deployment.id).await.unwrap().is_none());
  assert!(matches!(
    store.delete_deployment(deployment.id).await,
    Err(Error::NotFound(_))
  ));
}

async fn check_update_and_list(store: &dyn Store) {
  let a = store.create_deployment(&new_deployment("a")).await.unwrap();
  let b = store.create_deployment(&new_deployment("b")).await.unwrap();

  let mut changes = new_deployment("a2");
  changes.port = "9090".to_string();
  let updated = store.update_deployment(a.id, &changes).await.unwrap();
  assert_eq!(updated.name, "a2");
  assert_eq!(updated.port, "9090");
  assert!(updated.updated_at >= a.updated_at);

  let ids: Vec<i64> = store
    .list_deployments()
    .await
    .unwrap()
    .iter()
    .map(|d| d.id)
    .collect();
  assert_eq!(ids, vec![b.id, a.id]);

  assert!(matches!(
    store.update_deployment(9999, &changes).await,
    Err(Error::NotFound(_))
  ));
}

#[tokio::test]
async fn test_memory_new_deployment_has_empty_workflow() {
  check_new_deployment_has_empty_workflow(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_upsert_replaces_wholesale() {
  check_upsert_replaces_wholesale(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_upsert_unknown_deployment() {
  check_upsert_unknown_deployment(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_delete_cascades() {
  check_delete_cascades(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_update_and_list() {
  check_update_and_list(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_sqlite_new_deployment_has_empty_workflow() {
  check_new_deployment_has_empty_workflow(&sqlite_memory().await).await;
}

#[tokio::test]
async fn test_sqlite_upsert_replaces_wholesale() {
  check_upsert_replaces_wholesale(&sqlite_memory().await).await;
}

#[tokio::test]
async fn test_sqlite_upsert_unknown_deployment() {
  check_upsert_unknown_deployment(&sqlite_memory().await).await;
}

#[tokio::test]
async fn test_sqlite_delete_cascades() {
  check_delete_cascades(&sqlite_memory().await).await;
}

#[tokio::test]
async fn test_sqlite_update_and_list() {
  check_update_and_list(&sqlite_memory().await).await;
}

#[tokio::test]
async fn test_sqlite_file_survives_reopen() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = format!("sqlite://{}", dir.path().join("xedge.db").display());

  let id = {
    let store = SqliteStore::connect(&url).await.unwrap();
    let deployment = store.create_deployment(&new_deployment("persistent")).await.unwrap();
    store.upsert_workflow(deployment.id, &two_nodes()).await.unwrap();
    deployment.id
  };

  let store = SqliteStore::connect(&url).await.unwrap();
  let stored = store.get_workflow(id).await.unwrap().unwrap();
  assert_eq!(stored.into_document(), two_nodes());
}
