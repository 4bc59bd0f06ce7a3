//! Base tag serialization. The form helper composes over [`BaseRenderer`];
//! [`HtmlRenderer`] is the stock implementation.

use crate::case::humanize;
use crate::form::attributes::Attributes;

/// One entry of a select: a plain option or a labelled group of options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOption {
    Item { value: String, label: String },
    Group { label: String, items: Vec<(String, String)> },
}

impl SelectOption {
    pub fn item(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption::Item {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn group(label: impl Into<String>, items: Vec<(String, String)>) -> Self {
        SelectOption::Group {
            label: label.into(),
            items,
        }
    }

    /// Apply `f` to every visible label (group labels included), keeping values.
    pub fn map_labels(self, f: &impl Fn(&str) -> String) -> Self {
        match self {
            SelectOption::Item { value, label } => SelectOption::Item {
                value,
                label: f(&label),
            },
            SelectOption::Group { label, items } => SelectOption::Group {
                label: f(&label),
                items: items.into_iter().map(|(v, l)| (v, f(&l))).collect(),
            },
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        SelectOption::item(value, label)
    }
}

/// Tag-level rendering capabilities. Implementations own attribute escaping;
/// text bodies passed to `legend`, `button`, `label` and `span` are markup.
pub trait BaseRenderer {
    fn form_open(&self, action: &str, attrs: &Attributes, multipart: bool) -> String;
    fn form_close(&self, extra: &str) -> String;
    fn fieldset_open(&self, attrs: &Attributes, extra: &str) -> String;
    fn fieldset_close(&self) -> String;
    fn legend(&self, text: &str, attrs: &Attributes, extra: &str) -> String;
    fn input(&self, attrs: &Attributes, extra: &str) -> String;
    fn textarea(&self, attrs: &Attributes, value: &str, extra: &str) -> String;
    fn select(&self, attrs: &Attributes, options: &[SelectOption], selected: &[String], extra: &str) -> String;
    fn button(&self, attrs: &Attributes, text: &str, extra: &str) -> String;
    fn label(&self, attrs: &Attributes, text: &str, extra: &str) -> String;
    fn span(&self, attrs: &Attributes, body: &str) -> String;
}

/// Attributes rendered first, in this order; everything else follows alphabetically.
const ATTRIBUTE_ORDER: &[&str] = &[
    "action", "method", "enctype", "type", "id", "name", "value", "for", "src", "size", "maxlength",
    "rows", "cols", "accept", "tabindex", "accesskey", "align", "alt", "title", "class", "style",
    "selected", "checked", "readonly", "disabled",
];

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize attributes as ` key="value"` pairs in conventional order.
pub fn attributes(attrs: &Attributes) -> String {
    let mut pairs: Vec<(&str, &str)> = attrs.iter().collect();
    pairs.sort_by_key(|(k, _)| {
        let rank = ATTRIBUTE_ORDER
            .iter()
            .position(|o| o == k)
            .unwrap_or(ATTRIBUTE_ORDER.len());
        (rank, *k)
    });
    pairs
        .into_iter()
        .map(|(k, v)| format!(" {}=\"{}\"", k, escape_html(v)))
        .collect()
}

fn with_extra(extra: &str) -> String {
    let extra = extra.trim();
    if extra.is_empty() {
        String::new()
    } else {
        format!(" {}", extra)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn option(value: &str, label: &str, selected: &[String]) -> String {
        let mark = if selected.iter().any(|s| s == value) {
            " selected=\"selected\""
        } else {
            ""
        };
        format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(value),
            mark,
            escape_html(label)
        )
    }
}

impl BaseRenderer for HtmlRenderer {
    fn form_open(&self, action: &str, attrs: &Attributes, multipart: bool) -> String {
        let mut attrs = attrs.clone();
        attrs.set_default("action", action);
        attrs.set_default("method", "post");
        if multipart {
            attrs.set("enctype", "multipart/form-data");
        }
        format!("<form{}>\n", attributes(&attrs))
    }

    fn form_close(&self, extra: &str) -> String {
        format!("</form>{}", extra)
    }

    fn fieldset_open(&self, attrs: &Attributes, extra: &str) -> String {
        format!("<fieldset{}{}>\n", attributes(attrs), with_extra(extra))
    }

    fn fieldset_close(&self) -> String {
        "</fieldset>\n".to_string()
    }

    fn legend(&self, text: &str, attrs: &Attributes, extra: &str) -> String {
        format!("<legend{}{}>{}</legend>\n", attributes(attrs), with_extra(extra), text)
    }

    fn input(&self, attrs: &Attributes, extra: &str) -> String {
        format!("<input{}{} />", attributes(attrs), with_extra(extra))
    }

    fn textarea(&self, attrs: &Attributes, value: &str, extra: &str) -> String {
        format!(
            "<textarea{}{}>{}</textarea>",
            attributes(attrs),
            with_extra(extra),
            escape_html(value)
        )
    }

    fn select(&self, attrs: &Attributes, options: &[SelectOption], selected: &[String], extra: &str) -> String {
        let mut out = format!("<select{}{}>\n", attributes(attrs), with_extra(extra));
        for opt in options {
            match opt {
                SelectOption::Item { value, label } => out.push_str(&Self::option(value, label, selected)),
                SelectOption::Group { label, items } => {
                    out.push_str(&format!("<optgroup label=\"{}\">\n", escape_html(label)));
                    for (value, label) in items {
                        out.push_str(&Self::option(value, label, selected));
                    }
                    out.push_str("</optgroup>\n");
                }
            }
        }
        out.push_str("</select>");
        out
    }

    fn button(&self, attrs: &Attributes, text: &str, extra: &str) -> String {
        format!("<button{}{}>{}</button>", attributes(attrs), with_extra(extra), text)
    }

    fn label(&self, attrs: &Attributes, text: &str, extra: &str) -> String {
        let text = match attrs.get("for") {
            Some(target) if text.is_empty() => humanize(target),
            _ => text.to_string(),
        };
        format!("<label{}{}>{}</label>", attributes(attrs), with_extra(extra), text)
    }

    fn span(&self, attrs: &Attributes, body: &str) -> String {
        format!("<span{}>{}</span>", attributes(attrs), body)
    }
}
