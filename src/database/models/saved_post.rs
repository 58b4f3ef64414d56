use super::ResourceSpec;
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Saved post",
    collection: collections::SAVED_POSTS,
    required: &["postId", "userEmail"],
    defaults: &[],
    initial: &[],
    numeric: &[],
    created_at: None,
    list_order: None,
};

/// References the saved post by its id string
pub const POST_ID_FIELD: &str = "postId";
