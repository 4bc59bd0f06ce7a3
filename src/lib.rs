//! PBX admin SDK: repopulating HTML form helper and declarative entity schemas
//! with PostgreSQL migrations.

pub mod case;
pub mod config;
pub mod entity;
pub mod error;
pub mod form;
pub mod migration;

pub use config::FormConfig;
pub use entity::{registry, EntityDescriptor, EntityRegistry, FieldErrors, MediaLibrary};
pub use error::{AppError, ConfigError};
pub use form::{FormHelper, Markup, StaticView};
pub use migration::{apply_migrations, migration_script, table_ddl};
