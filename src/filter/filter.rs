use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Condition, ParamSink, SortDirection, SortKey, SqlParam, SqlResult, Update};

/// Store-neutral query: optional id match, field predicates and ordering.
///
/// The in-memory store evaluates it directly; the Postgres store renders it
/// to SQL over a `(id UUID, doc JSONB)` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub id: Option<Uuid>,
    pub conditions: Vec<Condition>,
    pub order: Vec<SortKey>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new().id(id)
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn not_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::NotContains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort(field, SortDirection::Desc)
    }

    /// Evaluate the filter against a document held in memory.
    pub fn matches(&self, id: &Uuid, fields: &Map<String, Value>) -> bool {
        if let Some(expected) = &self.id {
            if expected != id {
                return false;
            }
        }
        FilterWhere::matches(&self.conditions, fields)
    }

    /// `SELECT id, doc FROM <table> WHERE ... ORDER BY ...`
    pub fn to_select_sql(&self, table: &str, limit: Option<u32>) -> Result<SqlResult, FilterError> {
        let table = Self::quoted_table(table)?;
        let mut sink = ParamSink::default();
        let where_clause = self.where_sql(&mut sink)?;
        let order_clause = FilterOrder::generate(&self.order)?;

        let mut query = format!("SELECT id, doc FROM {} WHERE {}", table, where_clause);
        if !order_clause.is_empty() {
            query.push(' ');
            query.push_str(&order_clause);
        }
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        Ok(SqlResult {
            query,
            params: sink.into_params(),
        })
    }

    /// Update at most one matching row and return it.
    ///
    /// The predicate is repeated on the outer statement so Postgres re-checks
    /// it against the locked row version when a concurrent writer got there first.
    pub fn to_update_one_sql(&self, table: &str, update: &Update) -> Result<SqlResult, FilterError> {
        let table = Self::quoted_table(table)?;
        let mut sink = ParamSink::default();
        let set_expr = Self::update_expr(update, &mut sink)?;
        let where_clause = self.where_sql(&mut sink)?;

        let query = format!(
            "UPDATE {table} SET doc = {set_expr} \
             WHERE id = (SELECT id FROM {table} WHERE {where_clause} LIMIT 1) AND {where_clause} \
             RETURNING id, doc"
        );

        Ok(SqlResult {
            query,
            params: sink.into_params(),
        })
    }

    pub fn to_delete_one_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        let table = Self::quoted_table(table)?;
        let mut sink = ParamSink::default();
        let where_clause = self.where_sql(&mut sink)?;

        let query = format!(
            "DELETE FROM {table} \
             WHERE id = (SELECT id FROM {table} WHERE {where_clause} LIMIT 1) AND {where_clause}"
        );

        Ok(SqlResult {
            query,
            params: sink.into_params(),
        })
    }

    pub fn to_delete_many_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        let table = Self::quoted_table(table)?;
        let mut sink = ParamSink::default();
        let where_clause = self.where_sql(&mut sink)?;

        Ok(SqlResult {
            query: format!("DELETE FROM {} WHERE {}", table, where_clause),
            params: sink.into_params(),
        })
    }

    fn where_sql(&self, sink: &mut ParamSink) -> Result<String, FilterError> {
        let mut clauses = Vec::new();
        if let Some(id) = self.id {
            clauses.push(format!("id = {}", sink.push(SqlParam::Uuid(id))));
        }
        let conditions = FilterWhere::generate(&self.conditions, sink)?;
        if !conditions.is_empty() {
            clauses.push(conditions);
        }
        if clauses.is_empty() {
            Ok("TRUE".to_string())
        } else {
            Ok(clauses.join(" AND "))
        }
    }

    fn update_expr(update: &Update, sink: &mut ParamSink) -> Result<String, FilterError> {
        match update {
            Update::Set(fields) => {
                // Keys travel inside the bound object, never in the SQL text
                let p = sink.push(SqlParam::Json(Value::Object(fields.clone())));
                Ok(format!("doc || {}::jsonb", p))
            }
            Update::Push { field, value } => {
                Self::validate_field(field)?;
                let f = sink.push(SqlParam::Text(field.clone()));
                let v = sink.push(SqlParam::Json(value.clone()));
                Ok(format!(
                    "jsonb_set(doc, ARRAY[{f}::text], COALESCE(doc -> {f}::text, '[]'::jsonb) || jsonb_build_array({v}::jsonb))"
                ))
            }
            Update::Pull { field, value } => {
                Self::validate_field(field)?;
                let f = sink.push(SqlParam::Text(field.clone()));
                let v = sink.push(SqlParam::Json(value.clone()));
                Ok(format!(
                    "jsonb_set(doc, ARRAY[{f}::text], COALESCE(\
                     (SELECT jsonb_agg(e) FROM jsonb_array_elements(COALESCE(doc -> {f}::text, '[]'::jsonb)) AS e \
                     WHERE e <> {v}::jsonb), '[]'::jsonb))"
                ))
            }
        }
    }

    fn quoted_table(table: &str) -> Result<String, FilterError> {
        Self::validate_table_name(table)?;
        Ok(format!("\"{}\"", table))
    }

    pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let valid = !name.is_empty()
            && name.chars().next().map_or(false, |c| c.is_ascii_lowercase())
            && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(FilterError::InvalidTableName(name.to_string()))
        }
    }

    pub fn validate_field(name: &str) -> Result<(), FilterError> {
        let valid = !name.is_empty()
            && name.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(FilterError::InvalidField(name.to_string()))
        }
    }
}
