use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{Filter, FilterError, Update};

/// Errors raised by a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("Duplicate key in {collection}")]
    Duplicate { collection: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored record: the generated identifier plus its loosely-typed fields.
///
/// Serializes flat, with the identifier under `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: Uuid, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Persistence seam: one loosely-typed collection per resource.
///
/// Mirrors the handful of operations the handlers need; every call is a
/// single statement against the backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document under a freshly generated id and return it as stored.
    async fn insert_one(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<Document>;

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Apply `update` to the first matching document. `None` when nothing matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<Option<Document>>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_serializes_flat_with_underscore_id() {
        let id = Uuid::new_v4();
        let doc = Document::new(id, json!({ "email": "a@x.com" }).as_object().unwrap().clone());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["_id"], json!(id.to_string()));
        assert_eq!(value["email"], json!("a@x.com"));
        assert_eq!(doc.get_str("email"), Some("a@x.com"));
    }
}
