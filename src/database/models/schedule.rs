use super::ResourceSpec;
use crate::database::collections;

/// Schedules are free-form; only the owner is required.
pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Schedule",
    collection: collections::SCHEDULES,
    required: &["email"],
    defaults: &[],
    initial: &[],
    numeric: &[],
    created_at: None,
    list_order: None,
};
