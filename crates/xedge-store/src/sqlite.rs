use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use xedge_config::WorkflowDocument;

use crate::{Deployment, Error, NewDeployment, Store, StoredWorkflow};

/// SQLite-based store implementation.
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Create a new SQLite store with the given connection pool.
  ///
  /// The pool must have foreign keys enabled for deletes to cascade.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Open (creating if needed) the database at `url` and apply migrations.
  ///
  /// An in-memory URL gets a single long-lived connection, since every
  /// SQLite connection would otherwise see its own empty database.
  pub async fn connect(url: &str) -> Result<Self, Error> {
    let options = SqliteConnectOptions::from_str(url)?
      .create_if_missing(true)
      .foreign_keys(true);

    let pool = if url.contains(":memory:") {
      SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?
    } else {
      SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?
    };

    let store = Self::new(pool);
    store.migrate().await?;
    info!(url, "sqlite store ready");
    Ok(store)
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(&self.pool).await
  }
}

#[async_trait]
impl Store for SqliteStore {
  async fn create_deployment(&self, deployment: &NewDeployment) -> Result<Deployment, Error> {
    let now = Utc::now();
    let mut tx = self.pool.begin().await?;

    let created: Deployment = sqlx::query_as(
      r#"
            INSERT INTO deployments (name, host, port, owner, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, host, port, owner, created_at, updated_at
            "#,
    )
    .bind(&deployment.name)
    .bind(&deployment.host)
    .bind(&deployment.port)
    .bind(&deployment.owner)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
      r#"
            INSERT INTO deployment_workflows (deployment_id, workflow, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
    )
    .bind(created.id)
    .bind(Json(WorkflowDocument::empty()))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(deployment_id = created.id, "deployment created");
    Ok(created)
  }

  async fn get_deployment(&self, id: i64) -> Result<Deployment, Error> {
    sqlx::query_as(
      r#"
            SELECT id, name, host, port, owner, created_at, updated_at
            FROM deployments
            WHERE id = ?
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::deployment_not_found(id))
  }

  async fn list_deployments(&self) -> Result<Vec<Deployment>, Error> {
    let deployments = sqlx::query_as(
      r#"
            SELECT id, name, host, port, owner, created_at, updated_at
            FROM deployments
            ORDER BY created_at DESC, id DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(deployments)
  }

  async fn update_deployment(
    &self,
    id: i64,
    deployment: &NewDeployment,
  ) -> Result<Deployment, Error> {
    sqlx::query_as(
      r#"
            UPDATE deployments
            SET name = ?, host = ?, port = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, host, port, owner, created_at, updated_at
            "#,
    )
    .bind(&deployment.name)
    .bind(&deployment.host)
    .bind(&deployment.port)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::deployment_not_found(id))
  }

  async fn delete_deployment(&self, id: i64) -> Result<(), Error> {
    let result = sqlx::query("DELETE FROM deployments WHERE id = ?")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(Error::deployment_not_found(id));
    }

    debug!(deployment_id = id, "deployment deleted");
    Ok(())
  }

  async fn get_workflow(&self, deployment_id: i64) -> Result<Option<StoredWorkflow>, Error> {
    let workflow = sqlx::query_as(
      r#"
            SELECT deployment_id, workflow, created_at, updated_at
            FROM deployment_workflows
            WHERE deployment_id = ?
            "#,
    )
    .bind(deployment_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(workflow)
  }

  async fn upsert_workflow(
    &self,
    deployment_id: i64,
    workflow: &WorkflowDocument,
  ) -> Result<StoredWorkflow, Error> {
    let now = Utc::now();
    let mut tx = self.pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM deployments WHERE id = ?")
      .bind(deployment_id)
      .fetch_optional(&mut *tx)
      .await?;
    if exists.is_none() {
      return Err(Error::deployment_not_found(deployment_id));
    }

    let stored: StoredWorkflow = sqlx::query_as(
      r#"
            INSERT INTO deployment_workflows (deployment_id, workflow, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (deployment_id)
            DO UPDATE SET workflow = excluded.workflow, updated_at = excluded.updated_at
            RETURNING deployment_id, workflow, created_at, updated_at
            "#,
    )
    .bind(deployment_id)
    .bind(Json(workflow))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(
      deployment_id,
      elements = workflow.elements.len(),
      "workflow saved"
    );
    Ok(stored)
  }
}
