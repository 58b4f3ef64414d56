use serde_json::Value;
use tracing::{info, warn};

use super::models::ResourceSpec;
use super::record::{parse_id, require_owner, timestamp_now, Record, RecordError};
use super::store::{Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, Update};

/// Owner-scoped CRUD over one collection, driven by a [`ResourceSpec`].
///
/// Every mutation filters by id *and* owner; a miss is reported as
/// `Forbidden` whether the record is absent or belongs to someone else.
pub struct Repository<'a> {
    spec: &'static ResourceSpec,
    store: &'a dyn DocumentStore,
}

impl<'a> Repository<'a> {
    pub fn new(spec: &'static ResourceSpec, store: &'a dyn DocumentStore) -> Self {
        Self { spec, store }
    }

    pub async fn create(&self, input: Value) -> Result<Document, ApiError> {
        let mut record = Record::from_api_input(input)?;
        record.require(self.spec.required)?;
        record.require_numbers(self.spec.numeric)?;

        // Stored in the same trimmed form every owner lookup uses
        let owner_field = self.spec.owner_field();
        let owner = require_owner(record.get_str(owner_field), owner_field)?;
        record.set(owner_field, owner);

        for (field, default) in self.spec.defaults {
            record.set_default(field, default.to_value());
        }
        for (field, value) in self.spec.initial {
            record.set(*field, value.to_value());
        }
        if let Some(field) = self.spec.created_at {
            record.set(field, timestamp_now());
        }

        let doc = self
            .store
            .insert_one(self.spec.collection_name(), record.into_fields())
            .await?;

        info!(collection = self.spec.collection_name(), id = %doc.id, "created document");
        Ok(doc)
    }

    pub async fn list_by_owner(&self, owner: Option<&str>) -> Result<Vec<Document>, ApiError> {
        let owner_field = self.spec.owner_field();
        let owner = require_owner(owner, owner_field)?;
        let filter = self.ordered(Filter::new().eq(owner_field, owner));
        Ok(self.store.find(self.spec.collection_name(), &filter).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Document>, ApiError> {
        let filter = self.ordered(Filter::new());
        Ok(self.store.find(self.spec.collection_name(), &filter).await?)
    }

    /// Single document by id and owner; either mismatch reads as not found.
    pub async fn get(&self, id: &str, owner: Option<&str>) -> Result<Document, ApiError> {
        let filter = self.owned(id, owner)?;
        self.store
            .find_one(self.spec.collection_name(), &filter)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("{} not found", self.spec.label)))
    }

    /// Partial update: only fields present in `patch` change.
    pub async fn update(&self, id: &str, owner: Option<&str>, patch: Value) -> Result<Document, ApiError> {
        let filter = self.owned(id, owner)?;

        let mut record = Record::from_api_input(patch)?;
        // Ownership and creation time are never caller-writable
        record.remove(self.spec.owner_field());
        if let Some(field) = self.spec.created_at {
            record.remove(field);
        }
        for (field, _) in self.spec.initial {
            record.remove(field);
        }
        if record.is_empty() {
            return Err(RecordError::EmptyUpdate.into());
        }
        record.require_numbers(self.spec.numeric)?;

        let update = Update::Set(record.into_fields());
        match self
            .store
            .update_one(self.spec.collection_name(), &filter, &update)
            .await?
        {
            Some(doc) => {
                info!(collection = self.spec.collection_name(), id = %doc.id, "updated document");
                Ok(doc)
            }
            None => Err(self.unauthorized("update")),
        }
    }

    pub async fn delete(&self, id: &str, owner: Option<&str>) -> Result<u64, ApiError> {
        let filter = self.owned(id, owner)?;
        let deleted = self
            .store
            .delete_one(self.spec.collection_name(), &filter)
            .await?;

        if deleted == 0 {
            return Err(self.unauthorized("delete"));
        }
        info!(collection = self.spec.collection_name(), id, "deleted document");
        Ok(deleted)
    }

    fn owned(&self, id: &str, owner: Option<&str>) -> Result<Filter, ApiError> {
        let id = parse_id(id)?;
        let owner_field = self.spec.owner_field();
        let owner = require_owner(owner, owner_field)?;
        Ok(Filter::by_id(id).eq(owner_field, owner))
    }

    fn ordered(&self, filter: Filter) -> Filter {
        match self.spec.list_order {
            Some(field) => filter.sort_desc(field),
            None => filter,
        }
    }

    fn unauthorized(&self, action: &str) -> ApiError {
        warn!(collection = self.spec.collection_name(), action, "id and owner matched nothing");
        ApiError::forbidden(format!(
            "Unauthorized: {} not found or not owned by you",
            self.spec.label.to_lowercase()
        ))
    }
}
