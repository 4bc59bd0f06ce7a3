//! Lifecycle behaviors attachable to an entity with `act_as`.

use crate::entity::types::{ColumnDef, ColumnOptions, ColumnType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REGISTRY_COLUMN: &str = "registry";
pub const PLUGINS_COLUMN: &str = "plugins";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Free-form `registry` and `plugins` documents, empty by default.
    GenericStructure,
    /// `created_at` / `updated_at` stamps.
    Timestampable,
}

impl Behavior {
    pub fn columns(self) -> Vec<ColumnDef> {
        match self {
            Behavior::GenericStructure => [REGISTRY_COLUMN, PLUGINS_COLUMN]
                .into_iter()
                .map(|name| {
                    ColumnDef::new(
                        name,
                        ColumnType::Array,
                        None,
                        ColumnOptions::new()
                            .notnull()
                            .default_value(Value::Object(Map::new())),
                    )
                })
                .collect(),
            Behavior::Timestampable => [CREATED_AT_COLUMN, UPDATED_AT_COLUMN]
                .into_iter()
                .map(|name| {
                    ColumnDef::new(
                        name,
                        ColumnType::Timestamp,
                        None,
                        ColumnOptions::new().notnull().default_expression("NOW()"),
                    )
                })
                .collect(),
        }
    }

    /// Structure columns get an empty object when missing; both stamps are set to `now`.
    pub fn on_insert(self, record: &mut Map<String, Value>, now: DateTime<Utc>) {
        match self {
            Behavior::GenericStructure => fill_structures(record),
            Behavior::Timestampable => {
                let stamp = Value::String(now.to_rfc3339());
                record.insert(CREATED_AT_COLUMN.into(), stamp.clone());
                record.insert(UPDATED_AT_COLUMN.into(), stamp);
            }
        }
    }

    /// Structure columns are never nulled; `updated_at` is refreshed.
    pub fn on_update(self, record: &mut Map<String, Value>, now: DateTime<Utc>) {
        match self {
            Behavior::GenericStructure => fill_structures(record),
            Behavior::Timestampable => {
                record.insert(UPDATED_AT_COLUMN.into(), Value::String(now.to_rfc3339()));
            }
        }
    }
}

fn fill_structures(record: &mut Map<String, Value>) {
    for name in [REGISTRY_COLUMN, PLUGINS_COLUMN] {
        let entry = record.entry(name).or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).single().expect("valid instant")
    }

    #[test]
    fn timestamps_set_on_insert_and_refreshed_on_update() {
        let mut record = Map::new();
        Behavior::Timestampable.on_insert(&mut record, at(9));
        assert_eq!(record.get("created_at"), Some(&json!("2024-05-01T09:00:00+00:00")));
        Behavior::Timestampable.on_update(&mut record, at(10));
        assert_eq!(record.get("created_at"), Some(&json!("2024-05-01T09:00:00+00:00")));
        assert_eq!(record.get("updated_at"), Some(&json!("2024-05-01T10:00:00+00:00")));
    }

    #[test]
    fn structures_default_to_empty_objects() {
        let mut record = Map::new();
        record.insert("plugins".into(), json!({"voicemail": {"enabled": true}}));
        record.insert("registry".into(), Value::Null);
        Behavior::GenericStructure.on_insert(&mut record, at(9));
        assert_eq!(record.get("registry"), Some(&json!({})));
        assert_eq!(record.get("plugins"), Some(&json!({"voicemail": {"enabled": true}})));
    }
}
