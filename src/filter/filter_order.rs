use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter::Filter;
use super::types::{SortDirection, SortKey};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(keys: &[SortKey]) -> Result<String, FilterError> {
        if keys.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(keys.len());
        for key in keys {
            // Field names are validated identifiers, safe to inline as literals
            Filter::validate_field(&key.field)?;
            parts.push(format!("doc -> '{}' {}", key.field, key.direction.to_sql()));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// Compare two documents the way the generated ORDER BY would.
    /// Missing fields sort first ascending and last descending.
    pub fn compare(keys: &[SortKey], a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        for key in keys {
            let ord = compare_values(a.get(&key.field), b.get(&key.field));
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) | (Some(Value::Null), Some(Value::Null)) => Ordering::Equal,
        (None, _) | (Some(Value::Null), _) => Ordering::Less,
        (_, None) | (_, Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
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
    fn generates_order_by() {
        let keys = vec![
            SortKey { field: "date".into(), direction: SortDirection::Desc },
            SortKey { field: "amount".into(), direction: SortDirection::Asc },
        ];
        assert_eq!(
            FilterOrder::generate(&keys).unwrap(),
            "ORDER BY doc -> 'date' DESC NULLS LAST, doc -> 'amount' ASC NULLS FIRST"
        );
        assert_eq!(FilterOrder::generate(&[]).unwrap(), "");
    }

    #[test]
    fn descending_puts_missing_last() {
        let keys = vec![SortKey { field: "createdAt".into(), direction: SortDirection::Desc }];
        let newer = doc(json!({ "createdAt": "2025-02-01T00:00:00.000Z" }));
        let older = doc(json!({ "createdAt": "2025-01-01T00:00:00.000Z" }));
        let missing = doc(json!({}));

        assert_eq!(FilterOrder::compare(&keys, &newer, &older), Ordering::Less);
        assert_eq!(FilterOrder::compare(&keys, &older, &missing), Ordering::Less);
    }

    #[test]
    fn numbers_compare_numerically() {
        let keys = vec![SortKey { field: "progress".into(), direction: SortDirection::Asc }];
        assert_eq!(
            FilterOrder::compare(&keys, &doc(json!({ "progress": 9 })), &doc(json!({ "progress": 10.5 }))),
            Ordering::Less
        );
    }
}
