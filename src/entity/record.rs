//! Record-level checks against a descriptor, and the insert/update lifecycle.

use crate::entity::types::{ColumnDef, ColumnDefault, ColumnType, EntityDescriptor};
use crate::error::AppError;
use crate::form::context::ValidationErrors;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Validation messages keyed by column (or by form field after [`FieldErrors::scoped`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    /// Record a message; the first one for a field is kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-key every entry as `prefix[field]`, matching the names a form posts.
    pub fn scoped(&self, prefix: &str) -> FieldErrors {
        FieldErrors(
            self.0
                .iter()
                .map(|(k, v)| (format!("{}[{}]", prefix, k), v.clone()))
                .collect(),
        )
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = self.0.into_values().collect();
        Err(AppError::Validation(messages.join("; ")))
    }
}

impl ValidationErrors for FieldErrors {
    fn error(&self, field: &str) -> Option<&str> {
        self.get(field)
    }
}

/// Check `record` against every column of `entity`, behavior columns included.
/// Blank strings count as missing for non-string columns.
pub fn validate_record(entity: &EntityDescriptor, record: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for column in entity.all_columns() {
        let value = record.get(&column.name).filter(|v| !is_absent(&column, v));
        match value {
            None if column.is_required() => errors.add(&column.name, format!("{} is required", column.name)),
            None => {}
            Some(v) => {
                if let Some(message) = check_value(&column, v) {
                    errors.add(&column.name, message);
                }
            }
        }
    }
    errors
}

fn is_absent(column: &ColumnDef, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => column.type_ != ColumnType::String && s.trim().is_empty(),
        _ => false,
    }
}

fn check_value(column: &ColumnDef, value: &Value) -> Option<String> {
    let name = &column.name;
    match column.type_ {
        ColumnType::String => {
            let s = value.as_str()?;
            if column.options.notblank && s.trim().is_empty() {
                return Some(format!("{} must not be blank", name));
            }
            match column.length {
                Some(max) if s.chars().count() > max as usize => {
                    Some(format!("{} must be at most {} characters", name, max))
                }
                _ => None,
            }
        }
        ColumnType::Integer => match integer_value(value) {
            None => Some(format!("{} must be an integer", name)),
            Some(n) if column.options.unsigned && n < 0 => Some(format!("{} must not be negative", name)),
            Some(_) => None,
        },
        _ => None,
    }
}

/// Integers arrive as JSON numbers or, from form posts, as digit strings.
fn integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl EntityDescriptor {
    /// Fill literal column defaults that are missing, then run insert behaviors.
    pub fn prepare_insert(&self, record: &mut Map<String, Value>, now: DateTime<Utc>) {
        for column in &self.columns {
            if let Some(ColumnDefault::Literal(default)) = &column.options.default {
                let entry = record.entry(column.name.as_str()).or_insert(Value::Null);
                if entry.is_null() {
                    *entry = default.clone();
                }
            }
        }
        for behavior in &self.behaviors {
            behavior.on_insert(record, now);
        }
    }

    pub fn prepare_update(&self, record: &mut Map<String, Value>, now: DateTime<Utc>) {
        for behavior in &self.behaviors {
            behavior.on_update(record, now);
        }
    }
}
