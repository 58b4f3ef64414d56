use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collections;
use super::store::{Document, DocumentStore, StoreError, StoreResult};
use crate::filter::filter_order::FilterOrder;
use crate::filter::{Filter, Update};

/// In-process document store.
///
/// Honors the same unique keys as the Postgres bootstrap, so duplicate
/// handling behaves identically in tests and `--memory` runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn violates_unique(collection: &str, docs: &[Document], candidate: &Document) -> bool {
        let Some(spec) = collections::lookup(collection) else {
            return false;
        };
        if spec.unique.is_empty() {
            return false;
        }
        docs.iter().any(|existing| {
            existing.id != candidate.id
                && spec
                    .unique
                    .iter()
                    .all(|field| existing.get(field) == candidate.get(field))
        })
    }
}

fn apply_update(fields: &mut Map<String, Value>, update: &Update) {
    match update {
        Update::Set(patch) => {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        Update::Push { field, value } => {
            let slot = fields
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value.clone()),
                other => *other = Value::Array(vec![value.clone()]),
            }
        }
        Update::Pull { field, value } => {
            if let Some(Value::Array(items)) = fields.get_mut(field) {
                items.retain(|item| item != value);
            } else {
                fields.insert(field.clone(), Value::Array(Vec::new()));
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<Document> {
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_string()).or_default();
        let doc = Document::new(Uuid::new_v4(), fields);

        if Self::violates_unique(collection, docs, &doc) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
            });
        }

        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let guard = self.collections.read().await;
        let mut found: Vec<Document> = guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.id, &d.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !filter.order.is_empty() {
            found.sort_by(|a, b| FilterOrder::compare(&filter.order, &a.fields, &b.fields));
        }
        Ok(found)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<Option<Document>> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = docs.iter().position(|d| filter.matches(&d.id, &d.fields)) else {
            return Ok(None);
        };

        let mut updated = docs[index].clone();
        apply_update(&mut updated.fields, update);
        if Self::violates_unique(collection, docs, &updated) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
            });
        }

        docs[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(&d.id, &d.fields)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !filter.matches(&d.id, &d.fields));
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn insert_and_find_by_field() {
        let store = MemoryStore::new();
        store.insert_one("tasks", fields(json!({ "email": "a@x.com" }))).await.unwrap();
        store.insert_one("tasks", fields(json!({ "email": "b@x.com" }))).await.unwrap();

        let found = store
            .find("tasks", &Filter::new().eq("email", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("email"), Some("a@x.com"));
        assert_eq!(store.count("tasks").await, 2);
    }

    #[tokio::test]
    async fn unique_keys_reject_duplicates() {
        let store = MemoryStore::new();
        let saved = fields(json!({ "postId": "p1", "userEmail": "a@x.com" }));
        store.insert_one("saved_posts", saved.clone()).await.unwrap();

        let err = store.insert_one("saved_posts", saved).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // Same pair in a collection without unique keys is fine
        let plain = fields(json!({ "postId": "p1", "userEmail": "a@x.com" }));
        store.insert_one("schedules", plain.clone()).await.unwrap();
        store.insert_one("schedules", plain).await.unwrap();
    }

    #[tokio::test]
    async fn push_and_pull_array_fields() {
        let store = MemoryStore::new();
        let doc = store.insert_one("posts", fields(json!({ "content": "hi" }))).await.unwrap();
        let by_id = Filter::by_id(doc.id);

        let pushed = store
            .update_one("posts", &by_id, &Update::Push { field: "likes".into(), value: json!("a@x.com") })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pushed.get("likes"), Some(&json!(["a@x.com"])));

        let pulled = store
            .update_one("posts", &by_id, &Update::Pull { field: "likes".into(), value: json!("a@x.com") })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pulled.get("likes"), Some(&json!([])));
    }

    #[tokio::test]
    async fn update_and_delete_miss_report_nothing() {
        let store = MemoryStore::new();
        let filter = Filter::by_id(Uuid::new_v4());
        let set = Update::Set(fields(json!({ "x": 1 })));

        assert!(store.update_one("tasks", &filter, &set).await.unwrap().is_none());
        assert_eq!(store.delete_one("tasks", &filter).await.unwrap(), 0);
        assert_eq!(store.delete_many("tasks", &Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_many_removes_all_matches() {
        let store = MemoryStore::new();
        for email in ["a@x.com", "b@x.com"] {
            store
                .insert_one("saved_posts", fields(json!({ "postId": "p1", "userEmail": email })))
                .await
                .unwrap();
        }
        store
            .insert_one("saved_posts", fields(json!({ "postId": "p2", "userEmail": "a@x.com" })))
            .await
            .unwrap();

        let removed = store
            .delete_many("saved_posts", &Filter::new().eq("postId", "p1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count("saved_posts").await, 1);
    }
}
