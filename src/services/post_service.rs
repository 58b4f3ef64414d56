//! Post operations that reach beyond a single owner-scoped document:
//! likes, saving, and the cascading delete.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::database::models::{post, saved_post};
use crate::database::record::{parse_id, require_owner, Record};
use crate::database::repository::Repository;
use crate::database::store::{Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, Update};

/// Counts reported by the cascading post delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_post_count: u64,
    pub deleted_saved_count: u64,
}

pub struct PostService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> PostService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn posts(&self) -> &'static str {
        post::SPEC.collection_name()
    }

    fn saved_posts(&self) -> &'static str {
        saved_post::SPEC.collection_name()
    }

    /// Append `user_email` to the post's likes.
    ///
    /// The "not already liked" check is part of the update filter, so two
    /// racing likes cannot both append.
    pub async fn like(&self, post_id: &str, user_email: Option<&str>) -> Result<Document, ApiError> {
        let id = parse_id(post_id)?;
        let email = require_owner(user_email, "userEmail")?;

        let filter = Filter::by_id(id).not_contains(post::LIKES_FIELD, email.as_str());
        let update = Update::Push {
            field: post::LIKES_FIELD.to_string(),
            value: Value::String(email.clone()),
        };

        if let Some(doc) = self.store.update_one(self.posts(), &filter, &update).await? {
            info!(post_id = %id, user = %email, "post liked");
            return Ok(doc);
        }

        // Nothing matched: tell "no such post" apart from "already liked"
        match self.store.find_one(self.posts(), &Filter::by_id(id)).await? {
            None => Err(ApiError::not_found("Post not found")),
            Some(_) => Err(ApiError::conflict("You have already liked this post")),
        }
    }

    /// Remove `user_email` from the post's likes; absent emails are a no-op.
    pub async fn unlike(&self, post_id: &str, user_email: Option<&str>) -> Result<Document, ApiError> {
        let id = parse_id(post_id)?;
        let email = require_owner(user_email, "userEmail")?;

        let update = Update::Pull {
            field: post::LIKES_FIELD.to_string(),
            value: Value::String(email.clone()),
        };

        match self.store.update_one(self.posts(), &Filter::by_id(id), &update).await? {
            Some(doc) => {
                info!(post_id = %id, user = %email, "post unliked");
                Ok(doc)
            }
            None => Err(ApiError::not_found("Post not found")),
        }
    }

    /// Delete a post by id, then every saved reference to it.
    ///
    /// Two independent statements: a failure between them leaves orphaned
    /// saved posts behind.
    pub async fn delete_post(&self, post_id: &str) -> Result<DeleteSummary, ApiError> {
        let id = parse_id(post_id)?;

        let deleted_post_count = self.store.delete_one(self.posts(), &Filter::by_id(id)).await?;
        if deleted_post_count == 0 {
            return Err(ApiError::not_found("Post not found"));
        }

        let deleted_saved_count = self
            .store
            .delete_many(
                self.saved_posts(),
                &Filter::new().eq(saved_post::POST_ID_FIELD, id.to_string()),
            )
            .await?;

        info!(post_id = %id, deleted_saved_count, "post deleted");
        Ok(DeleteSummary {
            deleted_post_count,
            deleted_saved_count,
        })
    }

    /// Save a post for a user; a repeated (postId, userEmail) pair is a conflict.
    pub async fn save_post(&self, input: Value) -> Result<Document, ApiError> {
        let mut record = Record::from_api_input(input)?;
        record.require(saved_post::SPEC.required)?;

        // Store the canonical id form so the cascade delete finds it
        let post_id = parse_id(record.get_str(saved_post::POST_ID_FIELD).unwrap_or_default())?;
        let user_email = require_owner(record.get_str("userEmail"), "userEmail")?;
        record.set(saved_post::POST_ID_FIELD, post_id.to_string());
        record.set("userEmail", user_email.as_str());

        if self.store.find_one(self.posts(), &Filter::by_id(post_id)).await?.is_none() {
            return Err(ApiError::not_found("Post not found"));
        }

        let existing = Filter::new()
            .eq(saved_post::POST_ID_FIELD, post_id.to_string())
            .eq("userEmail", user_email.as_str());
        if self.store.find_one(self.saved_posts(), &existing).await?.is_some() {
            return Err(ApiError::conflict("Post already saved"));
        }

        // The unique index still catches a racing duplicate that slipped past the read
        let repo = Repository::new(&saved_post::SPEC, self.store);
        match repo.create(Value::Object(record.into_fields())).await {
            Err(ApiError::Conflict(_)) => Err(ApiError::conflict("Post already saved")),
            other => other,
        }
    }
}
