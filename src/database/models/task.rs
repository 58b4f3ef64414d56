use super::{FieldDefault, ResourceSpec};
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Task",
    collection: collections::TASKS,
    required: &["subject", "deadline", "email"],
    defaults: &[("isCompleted", FieldDefault::Bool(false))],
    initial: &[],
    numeric: &[],
    created_at: None,
    list_order: None,
};
