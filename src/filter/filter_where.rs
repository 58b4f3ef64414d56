use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter::Filter;
use super::types::{Condition, ParamSink, SqlParam};

pub struct FilterWhere;

impl FilterWhere {
    /// Render conditions as a conjunction over the `doc` JSONB column.
    /// Returns an empty string when there is nothing to constrain.
    pub fn generate(conditions: &[Condition], sink: &mut ParamSink) -> Result<String, FilterError> {
        let mut parts = Vec::with_capacity(conditions.len());
        for condition in conditions {
            parts.push(Self::condition_sql(condition, sink)?);
        }
        Ok(parts.join(" AND "))
    }

    fn condition_sql(condition: &Condition, sink: &mut ParamSink) -> Result<String, FilterError> {
        match condition {
            Condition::Eq { field, value } => {
                Filter::validate_field(field)?;
                let f = sink.push(SqlParam::Text(field.clone()));
                let v = sink.push(SqlParam::Json(value.clone()));
                Ok(format!("doc -> {}::text = {}::jsonb", f, v))
            }
            Condition::NotContains { field, value } => {
                Filter::validate_field(field)?;
                let f = sink.push(SqlParam::Text(field.clone()));
                let v = sink.push(SqlParam::Json(value.clone()));
                Ok(format!(
                    "NOT (COALESCE(doc -> {}::text, '[]'::jsonb) @> jsonb_build_array({}::jsonb))",
                    f, v
                ))
            }
        }
    }

    pub fn matches(conditions: &[Condition], fields: &Map<String, Value>) -> bool {
        conditions.iter().all(|condition| match condition {
            Condition::Eq { field, value } => fields.get(field) == Some(value),
            Condition::NotContains { field, value } => match fields.get(field) {
                Some(Value::Array(items)) => !items.contains(value),
                _ => true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn eq_is_exact_json_equality() {
        let conditions = vec![Condition::Eq {
            field: "isCompleted".into(),
            value: json!(true),
        }];
        assert!(FilterWhere::matches(&conditions, &doc(json!({ "isCompleted": true }))));
        assert!(!FilterWhere::matches(&conditions, &doc(json!({ "isCompleted": "true" }))));
        assert!(!FilterWhere::matches(&conditions, &doc(json!({}))));
    }

    #[test]
    fn not_contains_treats_missing_as_empty() {
        let conditions = vec![Condition::NotContains {
            field: "likes".into(),
            value: json!("a@x.com"),
        }];
        assert!(FilterWhere::matches(&conditions, &doc(json!({}))));
        assert!(FilterWhere::matches(&conditions, &doc(json!({ "likes": ["b@x.com"] }))));
        assert!(!FilterWhere::matches(&conditions, &doc(json!({ "likes": ["a@x.com"] }))));
    }

    #[test]
    fn generates_numbered_placeholders() {
        let mut sink = ParamSink::default();
        sink.push(SqlParam::Text("already-bound".into()));
        let sql = FilterWhere::generate(
            &[
                Condition::Eq {
                    field: "postId".into(),
                    value: json!("p1"),
                },
                Condition::Eq {
                    field: "userEmail".into(),
                    value: json!("a@x.com"),
                },
            ],
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            sql,
            "doc -> $2::text = $3::jsonb AND doc -> $4::text = $5::jsonb"
        );
        assert_eq!(sink.into_params().len(), 5);
    }
}
