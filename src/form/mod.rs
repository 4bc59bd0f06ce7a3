//! HTML form helper with repopulation, error decoration and translation.

pub mod attributes;
pub mod base;
pub mod context;
pub mod helper;
pub mod output;
pub mod repopulate;
pub mod time;

pub use attributes::{Annotation, Attributes, Field, Label};
pub use base::{BaseRenderer, HtmlRenderer, SelectOption};
pub use context::{
    Catalog, Clock, FixedClock, LocalClock, NoErrors, Passthrough, Record, StaticView, Translator,
    ValidationErrors, ViewContext, ViewVar,
};
pub use helper::{ElementKind, FormHelper};
pub use output::Markup;
pub use repopulate::RepopulationCache;
