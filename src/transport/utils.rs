//! Utility functions for transports.
//!
//! This module provides helper functions for:
//! - Encoding [`Query`] values onto a URL
//! - Status code classification
//!
//! # Query Encoding
//!
//! | Query form | Encoding |
//! |------------|----------|
//! | `Map` string / number / bool | `key=value` |
//! | `Map` `null` | skipped |
//! | `Map` array | one `key=item` per element |
//! | `Map` object | `key=<compact JSON>` |
//! | `Raw` | parsed as `application/x-www-form-urlencoded`, leading `?` ignored |
//! | `Pairs` | appended in order |

use crate::error::TransportError;
use crate::types::Query;
use serde_json::Value;
use url::Url;

/// Parse `raw` and append `query` to it.
///
/// # Examples
///
/// ```
/// use endpoint_tree::transport::request_url;
/// use endpoint_tree::types::Query;
/// use serde_json::json;
///
/// let url = request_url("https://api.test/foo", Some(&Query::from(json!({"q": "a b"})))).unwrap();
/// assert_eq!(url.as_str(), "https://api.test/foo?q=a+b");
/// ```
pub fn request_url(raw: &str, query: Option<&Query>) -> Result<Url, TransportError> {
    let mut url = Url::parse(raw)
        .map_err(|e| TransportError::InvalidRequest(format!("Invalid URL {}: {}", raw, e)))?;
    if let Some(query) = query {
        append_query(&mut url, query);
    }
    Ok(url)
}

/// Append every parameter of `query` to `url`.
pub fn append_query(url: &mut Url, query: &Query) {
    let pairs = query_pairs(query);
    if pairs.is_empty() {
        return;
    }
    let mut serializer = url.query_pairs_mut();
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
}

/// Check if status code indicates success
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

fn query_pairs(query: &Query) -> Vec<(String, String)> {
    match query {
        Query::Map(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, value) in map {
                push_value(&mut pairs, key, value);
            }
            pairs
        }
        Query::Raw(raw) => url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect(),
        Query::Pairs(pairs) => pairs.clone(),
    }
}

fn push_value(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for item in items {
                push_value(pairs, key, item);
            }
        }
        other => pairs.push((key.to_string(), other.to_string())),
    }
}
