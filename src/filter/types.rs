use serde_json::{Map, Value};
use uuid::Uuid;

/// A single predicate over a document field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given JSON value
    Eq { field: String, value: Value },
    /// Field is not an array containing the value (a missing field counts as empty)
    NotContains { field: String, value: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC NULLS FIRST",
            SortDirection::Desc => "DESC NULLS LAST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Mutation applied to the documents matched by a filter
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Merge the given fields into the document, leaving others untouched
    Set(Map<String, Value>),
    /// Append a value to an array field, creating the array if absent
    Push { field: String, value: Value },
    /// Remove every occurrence of a value from an array field
    Pull { field: String, value: Value },
}

/// Bound parameter for generated SQL
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Json(Value),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Collects parameters and hands out their `$n` placeholders.
#[derive(Debug, Default)]
pub struct ParamSink {
    params: Vec<SqlParam>,
}

impl ParamSink {
    pub fn push(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }
}
