use serde::Deserialize;

use super::{FieldDefault, ResourceSpec};
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Post",
    collection: collections::POSTS,
    required: &["userEmail", "content"],
    defaults: &[],
    initial: &[("likes", FieldDefault::EmptyArray)],
    numeric: &[],
    created_at: Some("createdAt"),
    list_order: Some("createdAt"),
};

/// Field holding the set of voter emails
pub const LIKES_FIELD: &str = "likes";

/// Body of `POST /posts/:id/like` and `/unlike`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeInput {
    pub user_email: Option<String>,
}
