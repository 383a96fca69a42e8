//! URL template interpolation.
//!
//! Endpoint URLs carry `:name` placeholders (`/todos/:id`). Only the path of
//! the endpoint's own template is scanned. The base URL is never scanned, so
//! a port such as `http://example:8080` is never mistaken for a placeholder,
//! and anything from the first `?` or `#` on is copied through untouched.
//!
//! | Param value | Rendered as |
//! |-------------|-------------|
//! | string | verbatim |
//! | number / bool | `to_string()` |
//! | array / object | compact JSON |
//! | `null` or absent | [`ClientError::MissingPathParam`] |
//!
//! The rendered value is percent-encoded with the same reserved set as
//! JavaScript's `encodeURIComponent`.
//!
//! # Examples
//!
//! ```
//! use endpoint_tree::request::interpolate;
//! use serde_json::json;
//!
//! let params = json!({"id": 42, "slug": "a b"});
//! let url = interpolate("/posts/:id/:slug", params.as_object()).unwrap();
//! assert_eq!(url, "/posts/42/a%20b");
//! ```

use crate::error::{ClientError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Characters left alone by `encodeURIComponent`: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([A-Za-z0-9_]+)").expect("token pattern is a valid regex")
});

/// Split a template into its path and the `?query` / `#fragment` tail.
fn split_path(template: &str) -> (&str, &str) {
    let end = template.find(|c| c == '?' || c == '#').unwrap_or(template.len());
    template.split_at(end)
}

/// Names of the placeholders in the path of `template`, in order of appearance.
pub fn path_tokens(template: &str) -> Vec<&str> {
    let (path, _) = split_path(template);
    TOKEN_RE
        .captures_iter(path)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Substitute every `:name` placeholder in `template` from `params`.
///
/// Fails on the first placeholder without a value, naming it.
pub fn interpolate(template: &str, params: Option<&Map<String, Value>>) -> Result<String> {
    let (path, tail) = split_path(template);
    let mut url = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(path) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = params
            .and_then(|p| p.get(name.as_str()))
            .filter(|v| !v.is_null())
            .ok_or_else(|| ClientError::MissingPathParam(name.as_str().to_string()))?;

        url.push_str(&path[last..whole.start()]);
        url.extend(utf8_percent_encode(&render(value), URI_COMPONENT));
        last = whole.end();
    }

    url.push_str(&path[last..]);
    url.push_str(tail);
    Ok(url)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
