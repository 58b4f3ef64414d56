use super::{FieldDefault, ResourceSpec};
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Exam routine",
    collection: collections::EXAM_ROUTINES,
    required: &["email"],
    defaults: &[("status", FieldDefault::Str("pending"))],
    initial: &[],
    numeric: &[],
    created_at: None,
    list_order: None,
};
