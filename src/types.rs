//! Request payload and response types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Query`] | Query string: a JSON mapping, a raw string, or ordered pairs |
//! | [`Body`] | Request payload: JSON, multipart form, raw bytes, or text |
//! | [`FormData`] | Multipart form fields |
//! | [`Response`] | Settled response handed back by a transport |

use crate::error::{ClientError, Result};
use bytes::Bytes;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Query-string parameters of a request.
///
/// Only the [`Map`](Query::Map) form merges with other query values; the
/// other forms replace whatever they are merged onto.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Plain mapping of names to JSON values
    Map(Map<String, Value>),
    /// Pre-encoded query string, with or without a leading `?`
    Raw(String),
    /// Ordered name/value pairs; names may repeat
    Pairs(Vec<(String, String)>),
}

impl Query {
    /// The mapping, if this query is one.
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Query::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Query::Map(map)
    }
}

/// Objects become [`Query::Map`], strings [`Query::Raw`]; anything else is
/// rendered as a raw string.
impl From<Value> for Query {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Query::Map(map),
            Value::String(raw) => Query::Raw(raw),
            other => Query::Raw(other.to_string()),
        }
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Query {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Query::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized as JSON with `Content-Type: application/json`
    Json(Value),
    /// Sent as `multipart/form-data`
    Form(FormData),
    /// Sent verbatim
    Bytes(Bytes),
    /// Sent verbatim as UTF-8
    Text(String),
}

impl Body {
    /// The JSON payload, if this body is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Form(form)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

/// A single multipart field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Plain text field
    Text(String),
    /// File part
    File {
        /// File contents
        bytes: Bytes,
        /// Name reported to the server
        file_name: Option<String>,
        /// MIME type of the part
        content_type: Option<String>,
    },
}

/// Multipart form payload, the binary counterpart of a JSON body.
///
/// ```
/// use endpoint_tree::types::FormData;
///
/// let form = FormData::new()
///     .text("description", "Test file upload")
///     .file("file", "test content", Some("notes.txt"), Some("text/plain"));
/// assert_eq!(form.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File {
                bytes: bytes.into(),
                file_name: file_name.map(str::to_string),
                content_type: content_type.map(str::to_string),
            },
        ));
        self
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A settled HTTP response.
///
/// Bodies are fully buffered by the transport, so every accessor can be
/// called any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    url: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Assemble a response; used by transports.
    pub fn new(status: u16, url: impl Into<String>, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            url: url.into(),
            headers,
            body: body.into(),
        }
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in `200..=299`.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Final URL of the request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response headers, including every value of repeated names.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, ignoring case. Values that are not visible
    /// ASCII are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Every value of a repeated header such as `Set-Cookie`, in order.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    /// Raw body.
    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Body decoded as UTF-8.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_from_value() {
        assert!(matches!(Query::from(json!({"q": "x"})), Query::Map(_)));
        assert_eq!(Query::from(json!("a=1")), Query::Raw("a=1".to_string()));
        assert_eq!(Query::from(json!([1, 2, 3])), Query::Raw("[1,2,3]".to_string()));
    }

    #[test]
    fn test_query_from_pairs() {
        let query = Query::from(vec![("tag", "a"), ("tag", "b")]);
        assert_eq!(
            query,
            Query::Pairs(vec![
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ])
        );
        assert!(query.as_map().is_none());
    }

    #[test]
    fn test_response_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let response = Response::new(201, "http://api.test/todos", headers, r#"{"id":7}"#);

        assert!(response.ok());
        assert_eq!(response.status(), 201);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
        assert_eq!(response.json::<Value>().unwrap(), json!({"id": 7}));
        assert_eq!(response.text().unwrap(), r#"{"id":7}"#);
    }

    #[test]
    fn test_response_keeps_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", "a=1".parse().unwrap());
        headers.append("set-cookie", "b=2".parse().unwrap());
        let response = Response::new(200, "http://api.test/login", headers, "");

        assert_eq!(response.header_all("Set-Cookie"), ["a=1", "b=2"]);
        assert_eq!(response.header("set-cookie"), Some("a=1"));
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn test_response_decode_error() {
        let response = Response::new(200, "", HeaderMap::new(), "not json");
        assert!(matches!(response.json::<Value>(), Err(ClientError::Decode(_))));

        let response = Response::new(500, "", HeaderMap::new(), Bytes::from_static(&[0xff, 0xfe]));
        assert!(!response.ok());
        assert!(matches!(response.text(), Err(ClientError::Decode(_))));
    }
}
