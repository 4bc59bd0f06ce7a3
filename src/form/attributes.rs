//! Canonical attribute map and the argument shapes normalized into it.

use serde_json::Value;
use std::collections::BTreeMap;

/// HTML attributes for one element. Keys are unique; rendering order is decided
/// by the renderer, not by insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(BTreeMap::new())
    }

    /// Builder form of [`Attributes::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the key is absent; caller-supplied values are never replaced.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// True when the key is missing or holds only whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map(|v| v.trim().is_empty()).unwrap_or(true)
    }

    /// Append class tokens to the `class` attribute, skipping tokens that are
    /// already present. Existing tokens keep their position.
    pub fn append_class(&mut self, classes: &str) {
        let mut tokens: Vec<String> = self
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        for token in classes.split_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        self.set("class", tokens.join(" "));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A control argument given either as a bare field name or as a full attribute map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Name(String),
    Attrs(Attributes),
}

impl Field {
    /// A bare name becomes `{name: <name>}`.
    pub fn into_attributes(self) -> Attributes {
        match self {
            Field::Name(name) => Attributes::new().with("name", name),
            Field::Attrs(attrs) => attrs,
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Name(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Name(s)
    }
}

impl From<Attributes> for Field {
    fn from(a: Attributes) -> Self {
        Field::Attrs(a)
    }
}

/// Text plus optional attributes for a label annotation (issue, hint or help span).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    pub attrs: Attributes,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Annotation {
            text: text.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

impl From<&str> for Annotation {
    fn from(s: &str) -> Self {
        Annotation::new(s)
    }
}

impl From<String> for Annotation {
    fn from(s: String) -> Self {
        Annotation::new(s)
    }
}

/// Label arguments: the target field plus the optional issue, hint and help annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Label {
    pub attrs: Attributes,
    pub issue: Option<Annotation>,
    pub suppress_issue: bool,
    pub hint: Option<Annotation>,
    pub help: Option<Annotation>,
}

impl Label {
    /// Label for the field named `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Label {
            attrs: Attributes::new().with("for", target),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(key, value);
        self
    }

    /// Explicit issue text; overrides the validation error lookup and the hint.
    pub fn issue(mut self, issue: impl Into<Annotation>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    /// Never show an issue span, even when the field has a validation error.
    pub fn suppress_issue(mut self) -> Self {
        self.suppress_issue = true;
        self
    }

    pub fn hint(mut self, hint: impl Into<Annotation>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn help(mut self, help: impl Into<Annotation>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::new(s)
    }
}

impl From<Attributes> for Label {
    fn from(attrs: Attributes) -> Self {
        Label {
            attrs,
            ..Default::default()
        }
    }
}

/// Attribute text for a submitted value: `true` -> "1", `false`/null -> "".
pub fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "1".into(),
        Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Loose truthiness of a submitted value: "", "0", 0, false, null and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => is_truthy_str(s),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn is_truthy_str(s: &str) -> bool {
    !(s.is_empty() || s == "0")
}

/// Compare two submitted scalars the way a browser round-trip sees them:
/// numerically when both parse as numbers, otherwise as text.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    let (sa, sb) = (value_to_string(Some(a)), value_to_string(Some(b)));
    match (sa.trim().parse::<f64>(), sb.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => sa == sb,
    }
}
