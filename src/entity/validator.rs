//! Declaration checks: column integrity, primary keys and relation targets.

use crate::entity::registry::EntityRegistry;
use crate::entity::types::{ColumnType, EntityDescriptor, RelationKind};
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(entity: &EntityDescriptor) -> Result<(), ConfigError> {
    if entity.name.trim().is_empty() {
        return Err(ConfigError::Validation("entity name must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for c in &entity.columns {
        if !seen.insert(c.name.as_str()) {
            return Err(ConfigError::DuplicateColumn {
                entity: entity.name.clone(),
                column: c.name.clone(),
            });
        }
        if c.options.autoincrement && c.type_ != ColumnType::Integer {
            return Err(ConfigError::Validation(format!(
                "{}.{}: autoincrement requires an integer column",
                entity.name, c.name
            )));
        }
        if let (ColumnType::Decimal, Some(scale), Some(precision)) = (c.type_, c.options.scale, c.length) {
            if scale > precision {
                return Err(ConfigError::Validation(format!(
                    "{}.{}: scale {} exceeds precision {}",
                    entity.name, c.name, scale, precision
                )));
            }
        }
    }

    let pk = entity.primary_key();
    if pk.is_empty() {
        return Err(ConfigError::InvalidPrimaryKey {
            entity: entity.name.clone(),
            column: String::new(),
        });
    }
    for c in pk {
        if c.type_ == ColumnType::Array {
            return Err(ConfigError::InvalidPrimaryKey {
                entity: entity.name.clone(),
                column: c.name.clone(),
            });
        }
    }

    for r in &entity.relations {
        if entity.column(&r.local).is_none() {
            return Err(ConfigError::MissingReference {
                kind: "column",
                id: format!("{}.{}", entity.name, r.local),
            });
        }
    }
    Ok(())
}

/// Relation targets must be registered and expose the foreign column.
pub fn validate_relations(entity: &EntityDescriptor, registry: &EntityRegistry) -> Result<(), ConfigError> {
    for r in &entity.relations {
        let target = registry.get(&r.model).ok_or_else(|| ConfigError::MissingReference {
            kind: "model",
            id: r.model.clone(),
        })?;
        if target.column(&r.foreign).is_none() {
            return Err(ConfigError::MissingReference {
                kind: "column",
                id: format!("{}.{}", target.name, r.foreign),
            });
        }
        // A has-one foreign key can only reference the target's primary key.
        if r.kind == RelationKind::HasOne && !target.primary_key().iter().any(|c| c.name == r.foreign) {
            return Err(ConfigError::InvalidPrimaryKey {
                entity: target.name.clone(),
                column: r.foreign.clone(),
            });
        }
    }
    Ok(())
}
