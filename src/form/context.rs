//! Request collaborators consumed by the form helper: the current view, pending
//! validation errors, translation and the wall clock.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Something that can present itself as a plain field map (an ORM record, a DTO).
pub trait Record {
    fn to_array(&self) -> Map<String, Value>;
}

/// A variable exposed by the view being rendered.
#[derive(Clone)]
pub enum ViewVar {
    Value(Value),
    Record(Arc<dyn Record>),
}

impl std::fmt::Debug for ViewVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewVar::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ViewVar::Record(r) => f.debug_tuple("Record").field(&r.to_array()).finish(),
        }
    }
}

pub trait ViewContext {
    /// Controller that owns the view, used in default classes.
    fn controller(&self) -> &str;
    /// View method (e.g. "edit" or "*.edit"), used in default classes.
    fn method(&self) -> &str;
    fn current_url(&self) -> &str;
    fn variable(&self, name: &str) -> Option<ViewVar>;
}

/// In-memory view context.
#[derive(Clone, Debug, Default)]
pub struct StaticView {
    controller: String,
    method: String,
    url: String,
    vars: HashMap<String, ViewVar>,
}

impl StaticView {
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        StaticView {
            controller: controller.into(),
            method: method.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.vars.insert(name.into(), ViewVar::Value(value));
        self
    }

    pub fn with_record(mut self, name: impl Into<String>, record: impl Record + 'static) -> Self {
        self.vars.insert(name.into(), ViewVar::Record(Arc::new(record)));
        self
    }
}

impl ViewContext for StaticView {
    fn controller(&self) -> &str {
        &self.controller
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn current_url(&self) -> &str {
        &self.url
    }

    fn variable(&self, name: &str) -> Option<ViewVar> {
        self.vars.get(name).cloned()
    }
}

/// Pending validation errors keyed by submitted field name.
pub trait ValidationErrors {
    fn error(&self, field: &str) -> Option<&str>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoErrors;

impl ValidationErrors for NoErrors {
    fn error(&self, _field: &str) -> Option<&str> {
        None
    }
}

impl ValidationErrors for HashMap<String, String> {
    fn error(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Message catalog; unknown keys fall back to the key itself.
#[derive(Clone, Debug, Default)]
pub struct Catalog(HashMap<String, String>);

impl Catalog {
    pub fn new() -> Self {
        Catalog(HashMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(key.into(), text.into());
        self
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
