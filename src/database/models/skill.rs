use super::{FieldDefault, ResourceSpec};
use crate::database::collections;

pub const SPEC: ResourceSpec = ResourceSpec {
    label: "Skill",
    collection: collections::SKILLS,
    required: &["email", "skill", "goal"],
    defaults: &[
        ("status", FieldDefault::Str("in-progress")),
        ("progress", FieldDefault::Int(0)),
    ],
    initial: &[],
    numeric: &["progress"],
    created_at: Some("createdAt"),
    list_order: Some("createdAt"),
};
