//! Form helper configuration types (JSON shape).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One class or several, as written in config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassList {
    One(String),
    Many(Vec<String>),
}

impl ClassList {
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            ClassList::One(s) => s.split_whitespace().collect(),
            ClassList::Many(v) => v.iter().flat_map(|s| s.split_whitespace()).collect(),
        }
    }
}

/// Extra classes per element kind. Keys are helper method names (`input`,
/// `open_fieldset`, `dropdown`, ...) or `all`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomClasses(HashMap<String, ClassList>);

pub const ALL_ELEMENTS: &str = "all";

impl CustomClasses {
    pub fn new() -> Self {
        CustomClasses(HashMap::new())
    }

    /// Add classes for `kind`, keeping any already registered.
    pub fn register<I, S>(&mut self, kind: &str, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged: Vec<String> = self
            .0
            .get(kind)
            .map(|c| c.tokens().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        merged.extend(classes.into_iter().map(Into::into));
        self.0.insert(kind.to_string(), ClassList::Many(merged));
    }

    /// Classes for `kind`; the `all` entry applies only when `kind` has none of its own.
    pub fn for_kind(&self, kind: &str) -> Vec<&str> {
        self.0
            .get(kind)
            .or_else(|| self.0.get(ALL_ELEMENTS))
            .map(ClassList::tokens)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub custom_classes: CustomClasses,
    /// Preselected by `timezones` when the caller gives no selection.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// Hidden field injected by `open` carrying the form id.
    #[serde(default = "default_form_name_field")]
    pub form_name_field: String,
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_form_name_field() -> String {
    "freepbx_form_name".into()
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            custom_classes: CustomClasses::default(),
            default_timezone: default_timezone(),
            form_name_field: default_form_name_field(),
        }
    }
}
