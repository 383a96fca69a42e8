//! Per-call request resolution.
//!
//! Turning a call into a [`ResolvedRequest`] happens in two phases:
//!
//! 1. [`prepare`] (synchronous, at call time): classify the input and
//!    interpolate the URL template. A missing path param fails here, before
//!    anything can reach the network.
//! 2. [`PreparedCall::resolve`] (async, on first access of the handle): fetch
//!    the auth token, which may suspend, compute the default options, and
//!    merge the caller's overrides.
//!
//! # Module Organization
//!
//! ```text
//! request/
//! ├── input     - CallInput and its classification
//! ├── template  - `:name` URL interpolation
//! └── options   - RequestOptions and the merge rules
//! ```

mod input;
mod options;
mod template;

pub use input::{classify, CallInput, Classified, RequestParts};
pub use options::{merge, merge_query, RequestOptions};
pub use template::{interpolate, path_tokens};

use crate::auth::{self, TokenProvider};
use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::Result;
use crate::types::{Body, Query};
use http::header::{HeaderMap, AUTHORIZATION};
use std::time::Duration;

/// Fully resolved request handed to a [`Transport`](crate::transport::Transport).
///
/// Built fresh for each call and discarded after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL without the query string
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Query-string parameters
    pub query: Option<Query>,
    /// Payload
    pub body: Option<Body>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Whether the transport should fail on non-2xx responses
    pub throw_http_errors: bool,
}

impl ResolvedRequest {
    /// A bare request with no headers, query, or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: None,
            body: None,
            timeout: None,
            throw_http_errors: true,
        }
    }
}

/// A call whose input has been classified and whose URL is final, waiting
/// for auth resolution.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    method: HttpMethod,
    requires_auth: bool,
    url: String,
    query: Option<Query>,
    body: Option<Body>,
    overrides: RequestOptions,
}

impl PreparedCall {
    /// Final URL of the call.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve auth and merge the overrides into the request to send.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::InvalidHeader`](crate::ClientError::InvalidHeader)
    /// if the provider's token cannot be sent as a header.
    pub async fn resolve(self, provider: Option<&dyn TokenProvider>) -> Result<ResolvedRequest> {
        let mut defaults = ResolvedRequest::new(self.method, self.url);
        if let Some(value) = auth::authorization_header(self.requires_auth, provider).await? {
            defaults.headers.insert(AUTHORIZATION, value);
        }
        defaults.query = self.query;
        defaults.body = self.body;

        Ok(merge(defaults, self.overrides))
    }
}

/// Classify `input` and interpolate the endpoint URL against `base_url`.
pub fn prepare(
    base_url: &str,
    endpoint: &Endpoint,
    input: CallInput,
    overrides: Option<RequestOptions>,
) -> Result<PreparedCall> {
    let overrides = overrides.unwrap_or_default();
    let classified = classify(input, endpoint.method(), overrides.has_body());
    let path = interpolate(endpoint.url(), classified.params.as_ref())?;

    Ok(PreparedCall {
        method: endpoint.method(),
        requires_auth: endpoint.requires_auth(),
        url: join_url(base_url, &path),
        query: classified.query,
        body: classified.body,
        overrides,
    })
}

/// Concatenate a base URL and an interpolated path, collapsing a doubled
/// slash at the seam.
pub fn join_url(base_url: &str, path: &str) -> String {
    match (base_url.strip_suffix('/'), path.starts_with('/')) {
        (Some(trimmed), true) => format!("{}{}", trimmed, path),
        _ => format!("{}{}", base_url, path),
    }
}
