//! Identifier conversions: model names to table names, free text to HTML id slugs.

use regex::Regex;
use std::sync::OnceLock;

/// Convert a model name from PascalCase to snake_case.
/// e.g. "MediaLibrary" -> "media_library", "User" -> "user"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("static pattern"))
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z_]+").expect("static pattern"))
}

/// Normalize free text into an HTML id token: every run of characters outside
/// `[a-zA-Z0-9_]` becomes one underscore, then edge underscores are trimmed.
/// e.g. "a[b][c]" -> "a_b_c"
pub fn slugify(s: &str) -> String {
    id_pattern().replace_all(s, "_").trim_matches('_').to_string()
}

/// Slug used for form ids derived from the request URL. Digits are dropped
/// along with punctuation, so "/devices/edit/12" -> "devices_edit".
pub fn url_slug(url: &str) -> String {
    url_pattern().replace_all(url, "_").trim_matches('_').to_string()
}

/// Turn a field name into display text: "first_name" -> "First Name".
pub fn humanize(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
