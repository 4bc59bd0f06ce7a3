//! Media manager models.

use crate::entity::behavior::Behavior;
use crate::entity::registry::EntityRegistry;
use crate::entity::types::{ColumnOptions, ColumnType, EntityDescriptor, ReferentialAction, RelationDef};
use crate::error::ConfigError;
use crate::form::context::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MEDIA_LIBRARY: &str = "MediaLibrary";
pub const USER: &str = "User";

/// Uploaded media file owned by a user.
pub fn media_library() -> EntityDescriptor {
    EntityDescriptor::new(MEDIA_LIBRARY)
        .has_column(
            "media_id",
            ColumnType::Integer,
            11,
            ColumnOptions::new().unsigned().notnull().primary().autoincrement(),
        )
        .has_column("user_id", ColumnType::Integer, 11, ColumnOptions::new().unsigned())
        .has_column("description", ColumnType::String, 80, ColumnOptions::new().notblank())
        .has_column("filename", ColumnType::String, 80, ColumnOptions::new().notblank())
        .has_column("path", ColumnType::String, 512, ColumnOptions::new().notblank())
        .has_column("category", ColumnType::Integer, 11, ColumnOptions::new().default_value(0))
        .has_one(RelationDef::has_one(USER, "user_id", "user_id").on_delete(ReferentialAction::Cascade))
        .act_as(Behavior::GenericStructure)
        .act_as(Behavior::Timestampable)
}

pub fn user() -> EntityDescriptor {
    EntityDescriptor::new(USER)
        .has_column(
            "user_id",
            ColumnType::Integer,
            11,
            ColumnOptions::new().unsigned().notnull().primary().autoincrement(),
        )
        .has_column("first_name", ColumnType::String, 100, ColumnOptions::new())
        .has_column("last_name", ColumnType::String, 100, ColumnOptions::new())
        .has_column("email_address", ColumnType::String, 100, ColumnOptions::new())
}

/// `User` and `MediaLibrary`, validated.
pub fn registry() -> Result<EntityRegistry, ConfigError> {
    let mut registry = EntityRegistry::new();
    registry.register(user())?;
    registry.register(media_library())?;
    registry.validate()?;
    Ok(registry)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaLibrary {
    #[serde(default)]
    pub media_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub description: String,
    pub filename: String,
    pub path: String,
    #[serde(default)]
    pub category: i64,
    #[serde(default)]
    pub registry: Map<String, Value>,
    #[serde(default)]
    pub plugins: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MediaLibrary {
    pub fn from_record(record: Map<String, Value>) -> Result<MediaLibrary, ConfigError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }
}

impl Record for MediaLibrary {
    fn to_array(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
