//! Prior-submission lookup. Values come from view variables, flattened into
//! bracketed field names and cached per request.

use crate::form::context::{ViewContext, ViewVar};
use serde_json::Value;
use std::collections::HashMap;

/// Field names starting with this marker are never repopulated.
pub const RESERVED_PREFIX: &str = "__";

#[derive(Clone, Debug, Default)]
pub struct RepopulationCache {
    values: HashMap<String, Value>,
}

impl RepopulationCache {
    pub fn new() -> Self {
        RepopulationCache {
            values: HashMap::new(),
        }
    }

    /// Return `value` untouched when it is already set, when `name` is blank or
    /// reserved, or when no view variable backs `name`. Otherwise resolve the
    /// prior value, flattening the backing variable into the cache on first use.
    pub fn attempt(&mut self, view: &dyn ViewContext, name: &str, value: Option<Value>) -> Option<Value> {
        if value.is_some() || name.trim().is_empty() || name.starts_with(RESERVED_PREFIX) {
            return value;
        }
        if let Some(hit) = self.cached(name) {
            return Some(hit.clone());
        }

        let base = name.split('[').next().unwrap_or(name);
        let source = match view.variable(base) {
            None => return value,
            Some(ViewVar::Record(record)) => Value::Object(record.to_array()),
            Some(ViewVar::Value(v)) => v,
        };
        match source {
            Value::Null => return value,
            Value::Object(_) | Value::Array(_) => {}
            scalar => return Some(scalar),
        }

        let mut flat = Vec::new();
        flatten(base, &source, &mut flat);
        tracing::debug!(base, fields = flat.len(), "repopulation cache filled");
        for (key, v) in flat {
            self.values.entry(key.to_lowercase()).or_insert(v);
        }

        self.cached(name).cloned().or(value)
    }

    fn cached(&self, name: &str) -> Option<&Value> {
        self.values
            .get(&name.to_lowercase())
            .or_else(|| self.values.get(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Flatten a nested value into `prefix[key][sub]` leaves. Lists of scalars are
/// kept whole under their own key so multi-selects can restore them.
pub fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&format!("{}[{}]", prefix, k), v, out);
            }
        }
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&format!("{}[{}]", prefix, i), v, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}
