//! Per-call override options and the merge with computed defaults.
//!
//! # Merge Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | headers | union, override replaces every value of a name (case-insensitive) |
//! | query | union when both sides are [`Query::Map`], otherwise override replaces |
//! | body | override replaces the inferred body |
//! | method, timeout, throw_http_errors | override wins when set |

use super::ResolvedRequest;
use crate::endpoint::HttpMethod;
use crate::error::{ClientError, Result};
use crate::types::{Body, FormData, Query};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Caller-supplied overrides for a single call.
///
/// ```
/// use endpoint_tree::request::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .header("X-Test", "abc")?
///     .query(json!({"extra": "y"}));
/// assert_eq!(options.headers["x-test"], "abc");
/// # Ok::<(), endpoint_tree::ClientError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Replace the endpoint's method
    pub method: Option<HttpMethod>,
    /// Extra or replacement headers
    pub headers: HeaderMap,
    /// Query parameters
    pub query: Option<Query>,
    /// Payload; takes precedence over any inferred body
    pub body: Option<Body>,
    /// Per-request timeout passed through to the transport
    pub timeout: Option<Duration>,
    /// Whether non-2xx responses are failures (transport default: yes)
    pub throw_http_errors: Option<bool>,
}

impl RequestOptions {
    /// Empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a header, replacing any earlier value for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] if the name or value cannot be
    /// sent on the wire.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::InvalidHeader(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::InvalidHeader(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add every entry of `headers`, keeping repeated values.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            self.headers.append(name, value.clone());
        }
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

    /// Set a multipart body.
    #[must_use]
    pub fn form(self, form: FormData) -> Self {
        self.body(Body::Form(form))
    }

    /// Set a timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Treat non-2xx responses as success when `false`.
    #[must_use]
    pub fn throw_http_errors(mut self, throw: bool) -> Self {
        self.throw_http_errors = Some(throw);
        self
    }

    /// Whether a payload is supplied through the overrides.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// Merge computed query parameters with an override.
pub fn merge_query(computed: Option<Query>, overrides: Option<Query>) -> Option<Query> {
    match (computed, overrides) {
        (Some(Query::Map(mut base)), Some(Query::Map(extra))) => {
            base.extend(extra);
            Some(Query::Map(base))
        }
        (_, Some(overrides)) => Some(overrides),
        (computed, None) => computed,
    }
}

/// Apply `overrides` on top of the computed `defaults`.
pub fn merge(mut defaults: ResolvedRequest, overrides: RequestOptions) -> ResolvedRequest {
    let RequestOptions {
        method,
        headers,
        query,
        body,
        timeout,
        throw_http_errors,
    } = overrides;

    if let Some(method) = method {
        defaults.method = method;
    }
    defaults.headers.extend(headers);
    defaults.query = merge_query(defaults.query.take(), query);
    if body.is_some() {
        defaults.body = body;
    }
    if timeout.is_some() {
        defaults.timeout = timeout;
    }
    if let Some(throw) = throw_http_errors {
        defaults.throw_http_errors = throw;
    }
    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> ResolvedRequest {
        let mut request = ResolvedRequest::new(HttpMethod::Get, "https://api.test/foo");
        request
            .headers
            .insert(http::header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        request.query = Some(Query::from(json!({"id": 1})));
        request
    }

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let merged = merge(defaults(), RequestOptions::new());
        assert_eq!(merged, defaults());
    }

    #[test]
    fn test_headers_union_override_wins() {
        let overrides = RequestOptions::new()
            .header("X-Test", "abc")
            .unwrap()
            .header("authorization", "Custom")
            .unwrap();
        let merged = merge(defaults(), overrides);

        assert_eq!(merged.headers["Authorization"], "Custom");
        assert_eq!(merged.headers.get_all("Authorization").iter().count(), 1);
        assert_eq!(merged.headers["X-Test"], "abc");
    }

    #[test]
    fn test_repeated_override_values_replace_default() {
        let mut computed = defaults();
        computed.headers.insert("accept", HeaderValue::from_static("text/html"));

        let mut extra = HeaderMap::new();
        extra.append("accept", HeaderValue::from_static("application/json"));
        extra.append("accept", HeaderValue::from_static("text/plain"));
        let merged = merge(computed, RequestOptions::new().headers(extra));

        let accept: Vec<_> = merged.headers.get_all("accept").iter().collect();
        assert_eq!(accept, ["application/json", "text/plain"]);
        assert_eq!(merged.headers["authorization"], "Bearer tok");
    }

    #[test]
    fn test_invalid_header_rejected() {
        let error = RequestOptions::new().header("bad name", "x").unwrap_err();
        assert!(matches!(error, ClientError::InvalidHeader(msg) if msg.starts_with("invalid header name")));

        let error = RequestOptions::new().header("X-Test", "line\nbreak").unwrap_err();
        assert!(matches!(error, ClientError::InvalidHeader(msg) if msg.starts_with("invalid header value")));
    }

    #[test]
    fn test_query_maps_union() {
        let overrides = RequestOptions::new().query(json!({"extra": "y", "id": 2}));
        let merged = merge(defaults(), overrides);
        assert_eq!(merged.query, Some(Query::from(json!({"id": 2, "extra": "y"}))));
    }

    #[test]
    fn test_non_map_query_replaces() {
        let merged = merge(defaults(), RequestOptions::new().query("not-an-object"));
        assert_eq!(merged.query, Some(Query::Raw("not-an-object".to_string())));

        let merged = merge(defaults(), RequestOptions::new().query(vec![("a", "1")]));
        assert!(matches!(merged.query, Some(Query::Pairs(_))));
    }

    #[test]
    fn test_map_override_replaces_non_map_computed() {
        let mut computed = defaults();
        computed.query = Some(Query::Raw("a=1".to_string()));
        let merged = merge(computed, RequestOptions::new().query(json!({"b": 2})));
        assert_eq!(merged.query, Some(Query::from(json!({"b": 2}))));
    }

    #[test]
    fn test_merge_query_without_computed() {
        assert_eq!(merge_query(None, None), None);
        assert_eq!(
            merge_query(None, Some(Query::from(json!({"a": 1})))),
            Some(Query::from(json!({"a": 1})))
        );
    }

    #[test]
    fn test_body_override_replaces() {
        let mut computed = defaults();
        computed.body = Some(Body::Json(json!({"x": "hi"})));
        let form = FormData::new().text("id", "123");
        let merged = merge(computed, RequestOptions::new().form(form.clone()));
        assert_eq!(merged.body, Some(Body::Form(form)));
    }

    #[test]
    fn test_passthrough_fields() {
        let overrides = RequestOptions::new()
            .method(HttpMethod::Post)
            .timeout(Duration::from_secs(3))
            .throw_http_errors(false);
        let merged = merge(defaults(), overrides);

        assert_eq!(merged.method, HttpMethod::Post);
        assert_eq!(merged.timeout, Some(Duration::from_secs(3)));
        assert!(!merged.throw_http_errors);
    }
}
