//! Named set of entity descriptors, resolved by model name.

use crate::entity::types::EntityDescriptor;
use crate::entity::validator::{validate, validate_relations};
use crate::error::ConfigError;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<EntityDescriptor>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry::default()
    }

    /// Add a descriptor. Model names and table names must be unique.
    pub fn register(&mut self, entity: EntityDescriptor) -> Result<(), ConfigError> {
        if self.by_name.contains_key(&entity.name) {
            return Err(ConfigError::Validation(format!("model {} registered twice", entity.name)));
        }
        let table = entity.table_name();
        if self.entities.iter().any(|e| e.table_name() == table) {
            return Err(ConfigError::Validation(format!("table {} declared twice", table)));
        }
        self.by_name.insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for entity in &self.entities {
            validate(entity)?;
        }
        for entity in &self.entities {
            validate_relations(entity, self)?;
        }
        Ok(())
    }
}
