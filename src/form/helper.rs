//! Per-request form helper: default classes, ids, error decoration,
//! repopulation and translation layered over a [`BaseRenderer`].

use crate::case::{slugify, url_slug};
use crate::config::FormConfig;
use crate::form::attributes::{
    is_truthy, is_truthy_str, loose_eq, value_to_string, Annotation, Attributes, Field, Label,
};
use crate::form::base::{BaseRenderer, HtmlRenderer, SelectOption};
use crate::form::context::{Clock, LocalClock, NoErrors, Passthrough, Translator, ValidationErrors, ViewContext};
use crate::form::output::Markup;
use crate::form::repopulate::{RepopulationCache, RESERVED_PREFIX};
use serde_json::Value;

static HTML: HtmlRenderer = HtmlRenderer;
static NO_ERRORS: NoErrors = NoErrors;
static PASSTHROUGH: Passthrough = Passthrough;
static LOCAL_CLOCK: LocalClock = LocalClock;

/// Element kinds, named after the helper operation that renders them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Open,
    OpenMultipart,
    OpenFieldset,
    Legend,
    Hidden,
    Input,
    Password,
    Upload,
    Textarea,
    Dropdown,
    Checkbox,
    Radio,
    Submit,
    Button,
    Label,
}

impl ElementKind {
    /// Key used in the custom class registry.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Open => "open",
            ElementKind::OpenMultipart => "open_multipart",
            ElementKind::OpenFieldset => "open_fieldset",
            ElementKind::Legend => "legend",
            ElementKind::Hidden => "hidden",
            ElementKind::Input => "input",
            ElementKind::Password => "password",
            ElementKind::Upload => "upload",
            ElementKind::Textarea => "textarea",
            ElementKind::Dropdown => "dropdown",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Submit => "submit",
            ElementKind::Button => "button",
            ElementKind::Label => "label",
        }
    }

    /// Leading class token for the element.
    fn class_name(self) -> &'static str {
        match self {
            ElementKind::OpenFieldset => "fieldset",
            other => other.as_str(),
        }
    }

    /// Kinds emitted as an `<input>` by way of [`FormHelper::input`]'s defaults.
    fn renders_as_input(self) -> bool {
        matches!(
            self,
            ElementKind::Password
                | ElementKind::Upload
                | ElementKind::Checkbox
                | ElementKind::Radio
                | ElementKind::Submit
        )
    }
}

pub struct FormHelper<'a> {
    renderer: &'a dyn BaseRenderer,
    view: &'a dyn ViewContext,
    errors: &'a dyn ValidationErrors,
    translator: &'a dyn Translator,
    clock: &'a dyn Clock,
    config: FormConfig,
    open_forms: Vec<String>,
    repopulate: RepopulationCache,
}

impl<'a> FormHelper<'a> {
    /// Helper for one request, rendering with [`HtmlRenderer`], no pending
    /// errors, untranslated text and the local clock.
    pub fn new(view: &'a dyn ViewContext) -> Self {
        FormHelper {
            renderer: &HTML,
            view,
            errors: &NO_ERRORS,
            translator: &PASSTHROUGH,
            clock: &LOCAL_CLOCK,
            config: FormConfig::default(),
            open_forms: Vec::new(),
            repopulate: RepopulationCache::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: &'a dyn BaseRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_errors(mut self, errors: &'a dyn ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FormConfig {
        &mut self.config
    }

    /// Ids of the forms opened and not yet closed, outermost first.
    pub fn open_forms(&self) -> &[String] {
        &self.open_forms
    }

    pub fn depth(&self) -> usize {
        self.open_forms.len()
    }

    // ---- forms ------------------------------------------------------------

    /// Open a form. `attrs` must be an attribute map; a bare string is
    /// discarded with a warning. `hidden` fields follow the opening tag, along
    /// with the form-name field carrying the resolved id.
    pub fn open(&mut self, action: Option<&str>, attrs: impl Into<Field>, hidden: &[(&str, Option<&str>)]) -> Markup {
        self.open_form(ElementKind::Open, action, attrs.into(), hidden)
    }

    /// Same as [`FormHelper::open`] for file uploads.
    pub fn open_multipart(
        &mut self,
        action: Option<&str>,
        attrs: impl Into<Field>,
        hidden: &[(&str, Option<&str>)],
    ) -> Markup {
        self.open_form(ElementKind::OpenMultipart, action, attrs.into(), hidden)
    }

    fn open_form(
        &mut self,
        kind: ElementKind,
        action: Option<&str>,
        attrs: Field,
        hidden: &[(&str, Option<&str>)],
    ) -> Markup {
        let mut attrs = match attrs {
            Field::Attrs(a) => a,
            Field::Name(raw) => {
                tracing::warn!(element = kind.as_str(), attrs = %raw, "form attributes must be a map, discarding");
                Attributes::new()
            }
        };
        if attrs.is_blank("id") {
            attrs.set("id", url_slug(self.view.current_url()));
        }
        let id = attrs.get("id").unwrap_or_default().to_string();

        let mut fields: Vec<(String, Option<Value>)> = hidden
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(Value::from)))
            .collect();
        if !fields.iter().any(|(name, _)| *name == self.config.form_name_field) {
            fields.push((self.config.form_name_field.clone(), Some(Value::String(id.clone()))));
        }

        self.open_forms.push(id);
        let mut leading = vec!["form".to_string(), format!("form_{}", self.open_forms.len())];
        if kind == ElementKind::OpenMultipart {
            leading.push("multipart".into());
        }
        attrs.append_class(&self.compose_classes(kind, leading));

        let action = action
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.view.current_url());
        let mut out = self
            .renderer
            .form_open(action, &attrs, kind == ElementKind::OpenMultipart);
        out.push_str(&self.render_hidden(fields));
        out.into()
    }

    /// Close the innermost open form.
    pub fn close(&mut self, extra: &str) -> Markup {
        match self.open_forms.pop() {
            Some(id) => tracing::trace!(form = %id, depth = self.open_forms.len(), "form closed"),
            None => tracing::warn!("form close without a matching open"),
        }
        self.renderer.form_close(extra).into()
    }

    // ---- structure --------------------------------------------------------

    pub fn open_fieldset(&mut self, attrs: Attributes, extra: &str) -> Markup {
        let mut attrs = attrs;
        attrs.append_class(&self.default_classes(ElementKind::OpenFieldset));
        self.renderer.fieldset_open(&attrs, extra).into()
    }

    pub fn close_fieldset(&mut self) -> Markup {
        self.renderer.fieldset_close().into()
    }

    /// Legend text is translated and wrapped in a span; the id is derived from
    /// the untranslated text when absent.
    pub fn legend(&mut self, text: &str, attrs: Attributes, extra: &str) -> Markup {
        let mut attrs = attrs;
        if !text.is_empty() && attrs.is_blank("id") {
            attrs.set("id", format!("legend_{}", slugify(&text.to_lowercase())));
        }
        let text = self.translator.translate(text);
        attrs.append_class(&self.default_classes(ElementKind::Legend));
        self.renderer
            .legend(&format!("<span>{}</span>", text), &attrs, extra)
            .into()
    }

    /// Fieldset with a legend.
    pub fn open_section(&mut self, title: &str) -> Markup {
        self.open_fieldset(Attributes::new(), "") + self.legend(title, Attributes::new(), "")
    }

    pub fn close_section(&mut self) -> Markup {
        self.close_fieldset()
    }

    // ---- fields -----------------------------------------------------------

    /// Hidden inputs wrapped in a `hidden_inputs` fieldset. Missing values are
    /// repopulated unless the name is reserved.
    pub fn hidden(&mut self, fields: &[(&str, Option<&str>)]) -> Markup {
        let fields = fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(Value::from)))
            .collect();
        self.render_hidden(fields).into()
    }

    fn render_hidden(&mut self, fields: Vec<(String, Option<Value>)>) -> String {
        let classes = self.default_classes(ElementKind::Hidden);
        let mut out = self
            .renderer
            .fieldset_open(&Attributes::new().with("class", "hidden_inputs"), "");
        for (name, value) in fields {
            let value = self.repopulate.attempt(self.view, &name, value);
            let attrs = Attributes::new()
                .with("type", "hidden")
                .with("name", name)
                .with("value", value_to_string(value.as_ref()))
                .with("class", classes.clone());
            out.push_str(&self.renderer.input(&attrs, ""));
            out.push('\n');
        }
        out.push_str(&self.renderer.fieldset_close());
        out
    }

    pub fn input(&mut self, field: impl Into<Field>, value: Option<&str>, extra: &str) -> Markup {
        self.text_control(ElementKind::Input, field.into(), value, extra)
    }

    pub fn password(&mut self, field: impl Into<Field>, value: Option<&str>, extra: &str) -> Markup {
        self.text_control(ElementKind::Password, field.into(), value, extra)
    }

    pub fn upload(&mut self, field: impl Into<Field>, value: Option<&str>, extra: &str) -> Markup {
        self.text_control(ElementKind::Upload, field.into(), value, extra)
    }

    pub fn textarea(&mut self, field: impl Into<Field>, value: Option<&str>, extra: &str) -> Markup {
        self.text_control(ElementKind::Textarea, field.into(), value, extra)
    }

    fn text_control(&mut self, kind: ElementKind, field: Field, value: Option<&str>, extra: &str) -> Markup {
        let mut attrs = field.into_attributes();
        let mut value = value.map(Value::from);

        let hidden_input = kind == ElementKind::Input && attrs.get("type") == Some("hidden");
        if let (false, Some(name)) = (hidden_input, attrs.get("name").map(str::to_string)) {
            slug_id(&mut attrs, &name);
            value = self.repopulate.attempt(self.view, &name, value);
            let mut classes = self.default_classes(kind);
            if self.field_error(&name).is_some() {
                classes.push_str(" has_error");
            }
            if kind == ElementKind::Textarea {
                if attrs.is_blank("rows") {
                    attrs.set("rows", "2");
                }
                if attrs.is_blank("cols") {
                    attrs.set("cols", "20");
                }
            }
            attrs.append_class(&classes);
            self.append_input_defaults(kind, &mut attrs);
        }

        let value = value_to_string(value.as_ref());
        let html = match kind {
            ElementKind::Textarea => {
                let body = attrs.remove("value").unwrap_or(value);
                self.renderer.textarea(&attrs, &body, extra)
            }
            _ => {
                match kind {
                    ElementKind::Password => attrs.set("type", "password"),
                    ElementKind::Upload => attrs.set("type", "file"),
                    _ => {}
                }
                attrs.set_default("type", "text");
                attrs.set_default("value", value);
                self.renderer.input(&attrs, extra)
            }
        };
        html.into()
    }

    /// Select box. A truthy `translate` attribute translates every option
    /// label; the attribute itself never reaches the markup.
    pub fn dropdown<I, O>(&mut self, field: impl Into<Field>, options: I, selected: Option<&str>, extra: &str) -> Markup
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        let mut attrs = field.into().into_attributes();
        let mut selected = selected.map(Value::from);
        if let Some(name) = attrs.get("name").map(str::to_string) {
            selected = self.repopulate.attempt(self.view, &name, selected);
            slug_id(&mut attrs, &name);
            attrs.append_class(&self.default_classes(ElementKind::Dropdown));
        }

        let translate = attrs
            .remove("translate")
            .map(|t| is_truthy_str(&t))
            .unwrap_or(false);
        let translator = self.translator;
        let options: Vec<SelectOption> = options
            .into_iter()
            .map(Into::into)
            .map(|o: SelectOption| {
                if translate {
                    o.map_labels(&|label: &str| translator.translate(label))
                } else {
                    o
                }
            })
            .collect();

        let selected = selected_values(selected.as_ref());
        self.renderer.select(&attrs, &options, &selected, extra).into()
    }

    /// Checkbox preceded by a hidden `__<name>` companion carrying the
    /// unchecked value, so an unticked box still submits something.
    pub fn checkbox(&mut self, field: impl Into<Field>, value: Option<Value>, checked: Option<bool>, extra: &str) -> Markup {
        let mut attrs = field.into().into_attributes();
        let value = value.unwrap_or(Value::Bool(true));
        let mut checked = checked.map(Value::Bool);
        let explicit_unchecked = attrs.remove("unchecked");
        let mut out = String::new();

        if let Some(name) = attrs.get("name").map(str::to_string) {
            checked = self.repopulate.attempt(self.view, &name, checked);
            let unchecked = explicit_unchecked.unwrap_or_else(|| unchecked_sentinel(&value).to_string());
            slug_id(&mut attrs, &name);
            attrs.append_class(&self.default_classes(ElementKind::Checkbox));
            self.append_input_defaults(ElementKind::Checkbox, &mut attrs);
            out.push_str(&self.render_hidden(vec![(
                format!("{}{}", RESERVED_PREFIX, name),
                Some(Value::String(unchecked)),
            )]));
        }

        let checked = checked.as_ref().map(is_truthy).unwrap_or(false);
        out.push_str(&self.checkable(attrs, "checkbox", &value, checked, extra));
        out.into()
    }

    /// Radio button; with no explicit `checked` it is checked when the prior
    /// submission equals this button's value.
    pub fn radio(&mut self, field: impl Into<Field>, value: impl Into<Value>, checked: Option<bool>, extra: &str) -> Markup {
        let mut attrs = field.into().into_attributes();
        let value = value.into();
        let mut checked = checked;

        if let Some(name) = attrs.get("name").map(str::to_string) {
            if checked.is_none() {
                let prior = self.repopulate.attempt(self.view, &name, None);
                checked = Some(prior.map(|p| loose_eq(&p, &value)).unwrap_or(false));
            }
            slug_id(&mut attrs, &name);
            attrs.append_class(&self.default_classes(ElementKind::Radio));
            self.append_input_defaults(ElementKind::Radio, &mut attrs);
        }

        self.checkable(attrs, "radio", &value, checked.unwrap_or(false), extra)
            .into()
    }

    fn checkable(&self, mut attrs: Attributes, input_type: &str, value: &Value, checked: bool, extra: &str) -> String {
        attrs.set("type", input_type);
        attrs.set_default("value", value_to_string(Some(value)));
        let preset = attrs.get("checked").map(is_truthy_str).unwrap_or(false);
        if checked || preset {
            attrs.set("checked", "checked");
        } else {
            attrs.remove("checked");
        }
        self.renderer.input(&attrs, extra)
    }

    pub fn submit(&mut self, field: impl Into<Field>, value: &str, extra: &str) -> Markup {
        let (mut attrs, label) = self.action_control(ElementKind::Submit, field.into(), value);
        if attrs.is_blank("name") {
            attrs.remove("name");
        }
        attrs.set("type", "submit");
        attrs.set_default("value", label);
        self.renderer.input(&attrs, extra).into()
    }

    /// `<button>` whose `value` defaults to the lower-cased label.
    pub fn button(&mut self, field: impl Into<Field>, value: &str, extra: &str) -> Markup {
        let (mut attrs, label) = self.action_control(ElementKind::Button, field.into(), value);
        if attrs.is_blank("name") {
            attrs.remove("name");
        }
        self.renderer.button(&attrs, &label, extra).into()
    }

    fn action_control(&mut self, kind: ElementKind, field: Field, value: &str) -> (Attributes, String) {
        let mut attrs = field.into_attributes();
        let mut label = value.to_string();
        if let Some(name) = attrs.get("name").map(str::to_string) {
            slug_id(&mut attrs, &format!("{}_{}", name, value));
            if kind == ElementKind::Button && attrs.is_blank("value") {
                attrs.set("value", value.to_lowercase());
            }
            label = self.translator.translate(value);
            attrs.append_class(&self.default_classes(kind));
            self.append_input_defaults(kind, &mut attrs);
        }
        (attrs, label)
    }

    /// Label for a field, decorated with a help span and then either an issue
    /// span (explicit or the field's validation error) or a hint span.
    pub fn label(&mut self, label: impl Into<Label>, text: Option<&str>, extra: &str) -> Markup {
        let Label {
            mut attrs,
            issue,
            suppress_issue,
            hint,
            help,
        } = label.into();
        let mut text = text.unwrap_or_default().to_string();
        let target = attrs.get("for").map(str::to_string);

        if let Some(target) = &target {
            if !target.is_empty() && attrs.is_blank("id") {
                attrs.set("id", format!("label_{}", slugify(target)));
            }
            let mut classes = self.default_classes(ElementKind::Label);
            if self.field_error(target).is_some() {
                classes.push_str(" has_error");
            }
            text = self.translator.translate(&text);
            attrs.append_class(&classes);
        }

        let base = attrs.get("class").unwrap_or_default().to_string();
        let id = attrs.get("id").unwrap_or_default().to_string();

        if let Some(help) = help.filter(|h| !h.text.trim().is_empty()) {
            let tooltip = self.translator.translate(&help.text);
            let mut span = help.attrs;
            span.set_default("id", format!("help_{}", id));
            span.set_default("class", annotation_class(&base, "help"));
            span.set("tooltip", tooltip);
            text.push_str(&self.renderer.span(&span, "&nbsp;"));
            attrs.append_class("has_help");
        }

        let mut has_error = false;
        if !suppress_issue {
            let mut issue = issue.unwrap_or_default();
            if issue.text.trim().is_empty() {
                issue.text = target
                    .as_deref()
                    .and_then(|t| self.field_error(t))
                    .unwrap_or_default()
                    .to_string();
            }
            if !issue.text.is_empty() {
                text.push_str(&self.annotation(issue, "issue", &id, &base));
                has_error = true;
            }
        }

        if !has_error {
            if let Some(hint) = hint.filter(|h| !h.text.trim().is_empty()) {
                text.push_str(&self.annotation(hint, "hint", &id, &base));
                attrs.append_class("has_hint");
            }
        }

        if let Some(target) = target {
            attrs.set("for", slugify(&target));
        }
        self.renderer.label(&attrs, &text, extra).into()
    }

    fn annotation(&self, annotation: Annotation, role: &str, label_id: &str, base: &str) -> String {
        let Annotation { text, attrs: mut span } = annotation;
        span.set_default("id", format!("{}_{}", role, label_id));
        span.set_default("class", annotation_class(base, role));
        self.renderer.span(&span, &self.translator.translate(&text))
    }

    // ---- internals --------------------------------------------------------

    /// Pending validation error for `field`; blank names never have one.
    fn field_error(&self, field: &str) -> Option<&'a str> {
        if field.trim().is_empty() {
            return None;
        }
        self.errors.error(field).filter(|e| !e.is_empty())
    }

    /// `"<kind> <controller> <method> <custom...>"`, lower-cased.
    fn default_classes(&self, kind: ElementKind) -> String {
        self.compose_classes(kind, vec![kind.class_name().to_string()])
    }

    /// Input-rendered kinds also take the `input` classes, after their own.
    fn append_input_defaults(&self, kind: ElementKind, attrs: &mut Attributes) {
        if kind.renders_as_input() {
            attrs.append_class(&self.default_classes(ElementKind::Input));
        }
    }

    fn compose_classes(&self, kind: ElementKind, leading: Vec<String>) -> String {
        let method = self.view.method().replace("*.", "").replace('.', " ");
        let mut tokens = leading;
        tokens.extend(
            std::iter::once(self.view.controller())
                .chain(method.split_whitespace())
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
        );
        tokens.extend(
            self.config
                .custom_classes
                .for_kind(kind.as_str())
                .into_iter()
                .map(str::to_string),
        );
        tokens.join(" ").to_lowercase()
    }

    pub(crate) fn translator(&self) -> &'a dyn Translator {
        self.translator
    }

    pub(crate) fn renderer(&self) -> &'a dyn BaseRenderer {
        self.renderer
    }

    pub(crate) fn clock(&self) -> &'a dyn Clock {
        self.clock
    }
}

/// Id falls back to `fallback`, then is slugified either way.
fn slug_id(attrs: &mut Attributes, fallback: &str) {
    let raw = if attrs.is_blank("id") {
        fallback.to_string()
    } else {
        attrs.get("id").unwrap_or_default().to_string()
    };
    attrs.set("id", slugify(&raw));
}

fn annotation_class(base: &str, role: &str) -> String {
    format!("{} {}", base, role).trim().to_string()
}

/// Unchecked value for a checkbox: the complement of a boolean value, else `0`.
fn unchecked_sentinel(value: &Value) -> &'static str {
    match value {
        Value::Bool(false) => "1",
        _ => "0",
    }
}

fn selected_values(selected: Option<&Value>) -> Vec<String> {
    match selected {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(|v| value_to_string(Some(v))).collect(),
        Some(other) => vec![value_to_string(Some(other))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::context::{Catalog, StaticView};
    use serde_json::json;
    use std::collections::HashMap;

    fn view() -> StaticView {
        StaticView::new("Devices", "*.edit")
            .with_url("/devices/edit/12")
            .with_value(
                "record",
                json!({"name": "Desk Phone", "enabled": true, "category": 1, "mode": "sip", "notes": "n/a"}),
            )
    }

    #[test]
    fn nested_forms_get_depth_classes() {
        let view = view();
        let mut form = FormHelper::new(&view);

        let outer = form.open(None, Attributes::new(), &[]);
        assert!(outer.contains(
            "<form action=\"/devices/edit/12\" method=\"post\" id=\"devices_edit\" class=\"form form_1 devices edit\">"
        ));
        assert!(outer.contains("<input type=\"hidden\" name=\"freepbx_form_name\" value=\"devices_edit\" class=\"hidden devices edit\" />"));
        assert_eq!(form.depth(), 1);

        let inner = form.open_multipart(Some("/upload"), Attributes::new().with("id", "upload"), &[]);
        assert!(inner.contains("class=\"form form_2 multipart devices edit\""));
        assert!(inner.contains("enctype=\"multipart/form-data\""));
        assert_eq!(form.open_forms(), ["devices_edit".to_string(), "upload".to_string()]);

        assert_eq!(form.close("").as_str(), "</form>");
        assert_eq!(form.depth(), 1);
        form.close("");
        assert_eq!(form.depth(), 0);
        assert_eq!(form.close("<!-- end -->").as_str(), "</form><!-- end -->");
        assert_eq!(form.depth(), 0);
    }

    #[test]
    fn string_attributes_on_open_are_discarded() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.open(Some("/save"), "class=\"bogus\"", &[("mode", Some("add"))]);
        assert!(!html.contains("bogus"));
        assert!(html.contains("<input type=\"hidden\" name=\"mode\" value=\"add\""));
        assert!(html.contains("name=\"freepbx_form_name\" value=\"devices_edit\""));
    }

    #[test]
    fn explicit_form_name_hidden_field_is_kept() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.open(None, Attributes::new().with("id", "x"), &[("freepbx_form_name", Some("custom"))]);
        assert!(html.contains("name=\"freepbx_form_name\" value=\"custom\""));
        assert_eq!(html.as_str().matches("freepbx_form_name").count(), 1);
    }

    #[test]
    fn input_is_repopulated_and_classed() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.input("record[name]", None, "");
        assert_eq!(
            html.as_str(),
            "<input type=\"text\" id=\"record_name\" name=\"record[name]\" value=\"Desk Phone\" class=\"input devices edit\" />"
        );
        let explicit = form.input("record[name]", Some("Typed"), "size=\"10\"");
        assert!(explicit.contains("value=\"Typed\""));
        assert!(explicit.ends_with(" size=\"10\" />"));
    }

    #[test]
    fn fields_with_errors_get_has_error() {
        let view = view();
        let errors: HashMap<String, String> =
            [("record[name]".to_string(), "Name is required".to_string())].into_iter().collect();
        let mut form = FormHelper::new(&view).with_errors(&errors);
        let html = form.input(
            Attributes::new().with("name", "record[name]").with("class", "wide"),
            None,
            "",
        );
        assert!(html.contains("class=\"wide input devices edit has_error\""));
    }

    #[test]
    fn custom_classes_prefer_kind_over_all() {
        let view = view();
        let mut form = FormHelper::new(&view);
        form.config_mut().custom_classes.register("input", ["Skin-Input"]);
        form.config_mut().custom_classes.register("all", ["skin"]);
        assert!(form.input("a", None, "").contains("class=\"input devices edit skin-input\""));
        assert!(form
            .password("b", None, "")
            .contains("class=\"password devices edit skin input skin-input\""));
    }

    #[test]
    fn input_rendered_kinds_also_carry_input_classes() {
        let view = view();
        let errors: HashMap<String, String> =
            [("secret".to_string(), "too short".to_string())].into_iter().collect();
        let mut form = FormHelper::new(&view).with_errors(&errors);
        assert!(form
            .password("secret", None, "")
            .contains("class=\"password devices edit has_error input\""));
        assert!(form.upload("file", None, "").contains("class=\"upload devices edit input\""));
        assert!(form
            .radio("record[mode]", "sip", None, "")
            .contains("class=\"radio devices edit input\""));
        assert!(form.textarea("notes", None, "").contains("class=\"textarea devices edit\""));
        assert!(form.dropdown("kind", [("a", "A")], None, "").contains("class=\"dropdown devices edit\""));
        assert!(!form.button("action", "Go", "").contains(" input"));
    }

    #[test]
    fn password_upload_and_textarea_variants() {
        let view = view();
        let mut form = FormHelper::new(&view);
        assert!(form.password("secret", None, "").contains("type=\"password\""));
        assert!(form.upload("file", None, "").contains("type=\"file\""));

        let area = form.textarea("record[notes]", None, "");
        assert_eq!(
            area.as_str(),
            "<textarea id=\"record_notes\" name=\"record[notes]\" rows=\"2\" cols=\"20\" class=\"textarea devices edit\">n/a</textarea>"
        );
    }

    #[test]
    fn hidden_typed_input_skips_defaults() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.input(
            Attributes::new().with("type", "hidden").with("name", "record[name]"),
            Some("x"),
            "",
        );
        assert_eq!(html.as_str(), "<input type=\"hidden\" name=\"record[name]\" value=\"x\" />");
    }

    #[test]
    fn hidden_fields_repopulate_except_reserved() {
        let view = view().with_value("__record", json!({"name": "never"}));
        let mut form = FormHelper::new(&view);
        let html = form.hidden(&[("record[name]", None), ("__record[name]", None)]);
        assert!(html.starts_with("<fieldset class=\"hidden_inputs\">\n"));
        assert!(html.contains("name=\"record[name]\" value=\"Desk Phone\""));
        assert!(html.contains("name=\"__record[name]\" value=\"\""));
        assert!(html.ends_with("</fieldset>\n"));
    }

    #[test]
    fn checkbox_companion_carries_unchecked_value() {
        let view = StaticView::new("devices", "edit");
        let mut form = FormHelper::new(&view);

        let on = form.checkbox("record[enabled]", Some(json!(true)), None, "");
        assert!(on.contains("<input type=\"hidden\" name=\"__record[enabled]\" value=\"0\""));
        assert!(on.contains(
            "<input type=\"checkbox\" id=\"record_enabled\" name=\"record[enabled]\" value=\"1\" class=\"checkbox devices edit input\" />"
        ));

        let off = form.checkbox("record[disabled]", Some(json!(false)), None, "");
        assert!(off.contains("name=\"__record[disabled]\" value=\"1\""));

        let numeric = form.checkbox("record[level]", Some(json!(5)), None, "");
        assert!(numeric.contains("name=\"__record[level]\" value=\"0\""));

        let explicit = form.checkbox(
            Attributes::new().with("name", "record[flag]").with("unchecked", "no"),
            Some(json!("yes")),
            None,
            "",
        );
        assert!(explicit.contains("name=\"__record[flag]\" value=\"no\""));
        assert!(!explicit.contains("unchecked="));
    }

    #[test]
    fn checkbox_checked_state_is_repopulated() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.checkbox("record[enabled]", None, None, "");
        assert!(html.contains("class=\"checkbox devices edit input\" checked=\"checked\" />"));
        let forced_off = form.checkbox("record[enabled]", None, Some(false), "");
        assert!(!forced_off.contains("checked=\"checked\""));
    }

    #[test]
    fn radio_checked_when_prior_value_matches() {
        let view = view();
        let mut form = FormHelper::new(&view);
        assert!(form.radio("record[mode]", "sip", None, "").contains("checked=\"checked\""));
        assert!(!form.radio("record[mode]", "iax", None, "").contains("checked=\"checked\""));
        assert!(form.radio("record[mode]", "iax", Some(true), "").contains("checked=\"checked\""));
    }

    #[test]
    fn dropdown_translates_and_strips_flag() {
        let view = view();
        let catalog = Catalog::new().with("general", "General");
        let mut form = FormHelper::new(&view).with_translator(&catalog);
        let html = form.dropdown(
            Attributes::new().with("name", "record[category]").with("translate", "1"),
            [("0", "general"), ("1", "music")],
            None,
            "",
        );
        assert!(html.starts_with("<select id=\"record_category\" name=\"record[category]\" class=\"dropdown devices edit\">"));
        assert!(html.contains("<option value=\"0\">General</option>"));
        assert!(html.contains("<option value=\"1\" selected=\"selected\">music</option>"));
        assert!(!html.contains("translate"));

        let untranslated = form.dropdown(
            Attributes::new().with("name", "kind").with("translate", "0"),
            [("g", "general")],
            Some("g"),
            "",
        );
        assert!(untranslated.contains("<option value=\"g\" selected=\"selected\">general</option>"));
    }

    #[test]
    fn submit_and_button_ids_and_labels() {
        let view = view();
        let catalog = Catalog::new().with("Save", "Speichern").with("Delete", "Löschen");
        let mut form = FormHelper::new(&view).with_translator(&catalog);
        assert_eq!(
            form.submit("action", "Save", "").as_str(),
            "<input type=\"submit\" id=\"action_Save\" name=\"action\" value=\"Speichern\" class=\"submit devices edit input\" />"
        );
        assert_eq!(
            form.button("action", "Delete", "").as_str(),
            "<button id=\"action_Delete\" name=\"action\" value=\"delete\" class=\"button devices edit\">Löschen</button>"
        );
    }

    #[test]
    fn label_shows_error_instead_of_hint() {
        let view = view();
        let errors: HashMap<String, String> =
            [("record[name]".to_string(), "Name is required".to_string())].into_iter().collect();
        let mut form = FormHelper::new(&view).with_errors(&errors);
        let html = form.label(Label::new("record[name]").hint("Shown on the display"), Some("Name"), "");
        assert_eq!(
            html.as_str(),
            "<label id=\"label_record_name\" for=\"record_name\" class=\"label devices edit has_error\">Name\
             <span id=\"issue_label_record_name\" class=\"label devices edit has_error issue\">Name is required</span></label>"
        );
    }

    #[test]
    fn label_hint_and_help_without_error() {
        let view = view();
        let catalog = Catalog::new().with("Extension", "Nebenstelle");
        let mut form = FormHelper::new(&view).with_translator(&catalog);
        let html = form.label(
            Label::new("record[ext]").hint("Digits only").help("Internal number"),
            Some("Extension"),
            "",
        );
        assert!(html.contains(">Nebenstelle<span id=\"help_label_record_ext\" class=\"label devices edit help\" tooltip=\"Internal number\">&nbsp;</span>"));
        assert!(html.contains("<span id=\"hint_label_record_ext\" class=\"label devices edit hint\">Digits only</span>"));
        assert!(html.contains("class=\"label devices edit has_help has_hint\""));
    }

    #[test]
    fn suppressed_issue_falls_back_to_hint() {
        let view = view();
        let errors: HashMap<String, String> =
            [("record[name]".to_string(), "bad".to_string())].into_iter().collect();
        let mut form = FormHelper::new(&view).with_errors(&errors);
        let html = form.label(
            Label::new("record[name]").suppress_issue().hint("Tip"),
            Some("Name"),
            "",
        );
        assert!(!html.contains("issue"));
        assert!(html.contains("<span id=\"hint_label_record_name\""));
    }

    #[test]
    fn explicit_issue_overrides_lookup() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let html = form.label(Label::new("record[name]").issue("Check this"), Some("Name"), "");
        assert!(html.contains(">Check this</span>"));
    }

    #[test]
    fn legend_and_section() {
        let view = view();
        let mut form = FormHelper::new(&view);
        let legend = form.legend("Media Files!", Attributes::new(), "");
        assert_eq!(
            legend.as_str(),
            "<legend id=\"legend_media_files\" class=\"legend devices edit\"><span>Media Files!</span></legend>\n"
        );
        let section = form.open_section("General");
        assert!(section.starts_with("<fieldset class=\"fieldset devices edit\">\n"));
        assert!(section.contains("id=\"legend_general\""));
        assert_eq!(form.close_section().as_str(), "</fieldset>\n");
    }
}
