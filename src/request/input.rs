//! Call input and its classification into path params, query, and body.
//!
//! A call receives one [`CallInput`]. It is classified once, at the call
//! boundary:
//!
//! | Input | GET / HEAD | other methods |
//! |-------|------------|---------------|
//! | [`Structured`](CallInput::Structured) | parts taken as given | parts taken as given |
//! | [`Value`](CallInput::Value) object | query | JSON body (dropped if the overrides carry a body) |
//! | [`Value`](CallInput::Value) non-object | JSON body | JSON body |
//! | [`Form`](CallInput::Form) / [`Bytes`](CallInput::Bytes) | body | body |
//! | [`Empty`](CallInput::Empty) | nothing | nothing |

use crate::endpoint::HttpMethod;
use crate::types::{Body, FormData, Query};
use bytes::Bytes;
use serde_json::{Map, Value};

/// Explicit path params, query, and body for a call.
///
/// Absent parts stay absent; they are never defaulted to empty values.
///
/// ```
/// use endpoint_tree::request::RequestParts;
/// use serde_json::json;
///
/// let parts = RequestParts::new()
///     .param("id", 7)
///     .query(json!({"q": "abc"}))
///     .json(json!({"name": "Zed"}));
/// assert!(parts.params.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    /// Values for the `:name` placeholders of the URL template
    pub params: Option<Map<String, Value>>,
    /// Query-string parameters
    pub query: Option<Query>,
    /// Request payload
    pub body: Option<Body>,
}

impl RequestParts {
    /// Empty parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one path param.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace all path params. Non-object values yield an empty param map.
    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(match params {
            Value::Object(map) => map,
            _ => Map::new(),
        });
        self
    }

    /// Set the query.
    #[must_use]
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body.
    #[must_use]
    pub fn json(self, value: Value) -> Self {
        self.body(Body::Json(value))
    }
}

/// Input supplied to a generated endpoint function.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallInput {
    /// No input
    #[default]
    Empty,
    /// Unstructured JSON value; objects are routed by method, anything else
    /// is the body
    Value(Value),
    /// Multipart form body
    Form(FormData),
    /// Raw binary body
    Bytes(Bytes),
    /// Explicit params / query / body
    Structured(RequestParts),
}

impl From<()> for CallInput {
    fn from(_: ()) -> Self {
        CallInput::Empty
    }
}

impl From<Value> for CallInput {
    fn from(value: Value) -> Self {
        CallInput::Value(value)
    }
}

impl From<&str> for CallInput {
    fn from(value: &str) -> Self {
        CallInput::Value(Value::String(value.to_string()))
    }
}

impl From<String> for CallInput {
    fn from(value: String) -> Self {
        CallInput::Value(Value::String(value))
    }
}

impl From<FormData> for CallInput {
    fn from(form: FormData) -> Self {
        CallInput::Form(form)
    }
}

impl From<Bytes> for CallInput {
    fn from(bytes: Bytes) -> Self {
        CallInput::Bytes(bytes)
    }
}

impl From<RequestParts> for CallInput {
    fn from(parts: RequestParts) -> Self {
        CallInput::Structured(parts)
    }
}

impl<T: Into<CallInput>> From<Option<T>> for CallInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(CallInput::Empty, Into::into)
    }
}

/// Outcome of classifying a [`CallInput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Path params
    pub params: Option<Map<String, Value>>,
    /// Query
    pub query: Option<Query>,
    /// Body
    pub body: Option<Body>,
}

/// Split `input` into params, query, and body.
///
/// `override_has_body` is whether the caller's override options already
/// carry a payload; if so an unstructured object on a body-carrying method is
/// dropped rather than used as the body.
pub fn classify(input: CallInput, method: HttpMethod, override_has_body: bool) -> Classified {
    match input {
        CallInput::Empty => Classified::default(),
        CallInput::Structured(parts) => Classified {
            params: parts.params,
            query: parts.query,
            body: parts.body,
        },
        CallInput::Value(Value::Object(map)) if method.takes_query_input() => Classified {
            query: Some(Query::Map(map)),
            ..Classified::default()
        },
        CallInput::Value(Value::Object(_)) if override_has_body => Classified::default(),
        CallInput::Value(value) => Classified {
            body: Some(Body::Json(value)),
            ..Classified::default()
        },
        CallInput::Form(form) => Classified {
            body: Some(Body::Form(form)),
            ..Classified::default()
        },
        CallInput::Bytes(bytes) => Classified {
            body: Some(Body::Bytes(bytes)),
            ..Classified::default()
        },
    }
}
