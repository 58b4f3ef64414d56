use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Fields only the store may assign
const SYSTEM_FIELDS: &[&str] = &["_id"];

/// Errors raised while turning API input into a storable document
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    #[error("System field '{0}' cannot be set via API")]
    SystemFieldNotAllowed(String),
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    #[error("Missing required field: {0}")]
    MissingOwner(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Field '{field}' must be a {expected}")]
    InvalidFieldType { field: String, expected: &'static str },
    #[error("No fields to update")]
    EmptyUpdate,
}

/// Parse a path identifier; anything but a UUID is rejected before touching the store.
pub fn parse_id(raw: &str) -> Result<Uuid, RecordError> {
    Uuid::parse_str(raw.trim()).map_err(|_| RecordError::InvalidId(raw.to_string()))
}

/// Caller-supplied owner value; blank counts as missing.
pub fn require_owner(value: Option<&str>, field: &str) -> Result<String, RecordError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(RecordError::MissingOwner(field.to_string())),
    }
}

/// Current time in the format stored in `createdAt` fields.
pub fn timestamp_now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// A document body on its way into the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Accept a JSON object from the API, rejecting system fields.
    pub fn from_api_input(json: Value) -> Result<Self, RecordError> {
        match json {
            Value::Object(fields) => {
                if let Some(field) = SYSTEM_FIELDS.iter().find(|f| fields.contains_key(**f)) {
                    return Err(RecordError::SystemFieldNotAllowed(field.to_string()));
                }
                Ok(Self { fields })
            }
            _ => Err(RecordError::InvalidJson("Expected JSON object".to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set only when the caller did not supply the field (or sent null).
    pub fn set_default(&mut self, key: &str, value: Value) -> &mut Self {
        match self.fields.get(key) {
            Some(v) if !v.is_null() => {}
            _ => {
                self.fields.insert(key.to_string(), value);
            }
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every listed field must be present, non-null and, if a string, non-blank.
    pub fn require(&self, required: &[&str]) -> Result<(), RecordError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|field| match self.fields.get(**field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .map(|field| field.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecordError::MissingRequiredFields(missing))
        }
    }

    /// Fields that, when present, must hold a JSON number.
    pub fn require_numbers(&self, numeric: &[&str]) -> Result<(), RecordError> {
        for field in numeric {
            match self.fields.get(*field) {
                None | Some(Value::Null) | Some(Value::Number(_)) => {}
                Some(_) => {
                    return Err(RecordError::InvalidFieldType {
                        field: field.to_string(),
                        expected: "number",
                    })
                }
            }
        }
        Ok(())
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_system_fields_and_non_objects() {
        assert_eq!(
            Record::from_api_input(json!({ "_id": "x", "a": 1 })).unwrap_err(),
            RecordError::SystemFieldNotAllowed("_id".into())
        );
        assert!(matches!(
            Record::from_api_input(json!([1, 2])),
            Err(RecordError::InvalidJson(_))
        ));
    }

    #[test]
    fn require_lists_every_missing_field() {
        let record = Record::from_api_input(json!({ "subject": "Algebra", "deadline": "", "email": null })).unwrap();
        assert_eq!(
            record.require(&["subject", "deadline", "email"]).unwrap_err(),
            RecordError::MissingRequiredFields(vec!["deadline".into(), "email".into()])
        );
    }

    #[test]
    fn defaults_do_not_overwrite_values() {
        let mut record = Record::from_api_input(json!({ "status": "done", "progress": null })).unwrap();
        record
            .set_default("status", json!("in-progress"))
            .set_default("progress", json!(0));
        assert_eq!(record.get_str("status"), Some("done"));
        assert_eq!(record.get("progress"), Some(&json!(0)));
    }

    #[test]
    fn numeric_fields_are_checked() {
        let ok = Record::from_api_input(json!({ "progress": 40 })).unwrap();
        assert!(ok.require_numbers(&["progress"]).is_ok());

        let bad = Record::from_api_input(json!({ "progress": "40%" })).unwrap();
        assert!(matches!(
            bad.require_numbers(&["progress"]),
            Err(RecordError::InvalidFieldType { .. })
        ));
    }

    #[test]
    fn owner_and_id_parsing() {
        assert_eq!(require_owner(Some("  a@x.com "), "email").unwrap(), "a@x.com");
        assert!(require_owner(Some("   "), "email").is_err());
        assert!(require_owner(None, "email").is_err());

        assert!(parse_id("not-an-id").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
