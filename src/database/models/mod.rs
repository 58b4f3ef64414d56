//! Resource definitions: which collection each resource lives in and the
//! create-time rules the generic repository enforces for it.

pub mod exam_routine;
pub mod post;
pub mod saved_post;
pub mod schedule;
pub mod skill;
pub mod task;
pub mod transaction;

use serde_json::Value;

use super::collections::CollectionSpec;

/// Value filled in when a create request omits the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Str(&'static str),
    Bool(bool),
    Int(i64),
    EmptyArray,
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Str(s) => Value::String(s.to_string()),
            FieldDefault::Bool(b) => Value::Bool(b),
            FieldDefault::Int(i) => Value::from(i),
            FieldDefault::EmptyArray => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    /// Human label used in response messages ("Task", "Exam routine")
    pub label: &'static str,
    pub collection: CollectionSpec,
    pub required: &'static [&'static str],
    pub defaults: &'static [(&'static str, FieldDefault)],
    /// Server-managed fields, always reset on create whatever the caller sent
    pub initial: &'static [(&'static str, FieldDefault)],
    /// Fields that must be numbers when supplied
    pub numeric: &'static [&'static str],
    /// Server-stamped creation timestamp field, if the resource tracks one
    pub created_at: Option<&'static str>,
    /// Field listed in descending order by ListByOwner / ListAll
    pub list_order: Option<&'static str>,
}

impl ResourceSpec {
    pub fn owner_field(&self) -> &'static str {
        self.collection.owner_field
    }

    pub fn collection_name(&self) -> &'static str {
        self.collection.name
    }
}

pub const ALL: &[&ResourceSpec] = &[
    &post::SPEC,
    &saved_post::SPEC,
    &schedule::SPEC,
    &transaction::SPEC,
    &task::SPEC,
    &skill::SPEC,
    &exam_routine::SPEC,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_field_is_always_required() {
        for spec in ALL {
            assert!(
                spec.required.contains(&spec.owner_field()),
                "{} does not require its owner field",
                spec.label
            );
        }
    }

    #[test]
    fn defaults_render_json() {
        assert_eq!(FieldDefault::Str("pending").to_value(), Value::from("pending"));
        assert_eq!(FieldDefault::EmptyArray.to_value(), Value::Array(vec![]));
    }
}
