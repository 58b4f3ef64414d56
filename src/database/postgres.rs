use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{Document, DocumentStore, StoreError, StoreResult};
use crate::config::DatabaseConfig;
use crate::filter::{Filter, SqlParam, SqlResult, Update};

/// Postgres-backed document store: one JSONB table per collection.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Open a pool using the database section of the app config.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to postgres (max_connections={})", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed postgres pool");
    }

    fn row_to_document(row: PgRow) -> StoreResult<Document> {
        let id: Uuid = row.try_get("id")?;
        let Json(fields): Json<Map<String, Value>> = row.try_get("doc")?;
        Ok(Document::new(id, fields))
    }

    fn build(sql: &SqlResult) -> sqlx::query::Query<'_, sqlx::Postgres, PgArguments> {
        debug!(query = %sql.query, "store query");
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        q
    }

    fn map_write_error(collection: &str, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate {
                    collection: collection.to_string(),
                };
            }
        }
        err.into()
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<Document> {
        Filter::validate_table_name(collection)?;
        let query = format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2) RETURNING id, doc",
            collection
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(Json(fields))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, e))?;

        Self::row_to_document(row)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let sql = filter.to_select_sql(collection, None)?;
        let rows = Self::build(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let sql = filter.to_select_sql(collection, Some(1))?;
        let row = Self::build(&sql).fetch_optional(&self.pool).await?;
        row.map(Self::row_to_document).transpose()
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<Option<Document>> {
        let sql = filter.to_update_one_sql(collection, update)?;
        let row = Self::build(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, e))?;
        row.map(Self::row_to_document).transpose()
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let sql = filter.to_delete_one_sql(collection)?;
        let result = Self::build(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let sql = filter.to_delete_many_sql(collection)?;
        let result = Self::build(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        SqlParam::Uuid(id) => q.bind(*id),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Json(v) => q.bind(Json(v)),
    }
}
