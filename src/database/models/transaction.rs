use super::ResourceSpec;
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Transaction",
    collection: collections::TRANSACTIONS,
    required: &["email"],
    defaults: &[],
    initial: &[],
    numeric: &[],
    created_at: None,
    list_order: Some("date"),
};
