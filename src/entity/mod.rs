//! Declarative entity schema: columns, relations and behaviors.

pub mod behavior;
pub mod models;
pub mod record;
pub mod registry;
pub mod types;
pub mod validator;

pub use behavior::Behavior;
pub use models::{media_library, registry, user, MediaLibrary};
pub use record::{validate_record, FieldErrors};
pub use registry::EntityRegistry;
pub use types::*;
pub use validator::{validate, validate_relations};
