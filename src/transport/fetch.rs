//! Default transport backed by `reqwest`.
//!
//! # Examples
//!
//! ```
//! use endpoint_tree::transport::{ReqwestTransport, TransportConfig};
//!
//! // Default configuration
//! let transport = ReqwestTransport::new();
//!
//! // Custom configuration
//! let config = TransportConfig {
//!     request_timeout_ms: 5_000,
//!     ..Default::default()
//! };
//! let transport = ReqwestTransport::with_config(config);
//! assert_eq!(transport.config().request_timeout_ms, 5_000);
//! ```

use super::utils::{is_success_status, request_url};
use super::Transport;
use crate::error::TransportError;
use crate::request::ResolvedRequest;
use crate::types::{Body, FormData, FormValue, Response};
use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Connection settings for [`ReqwestTransport`].
///
/// Deserializable so it can live in an application config file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Idle connections kept per host
    pub max_idle_per_host: usize,
    /// Proxy for all traffic; empty for none
    pub proxy_url: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            max_idle_per_host: 32,
            proxy_url: String::new(),
        }
    }
}

/// `reqwest`-backed [`Transport`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: Arc<TransportConfig>,
}

impl ReqwestTransport {
    /// Create a transport with default configuration
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_idle_per_host);

        if !config.proxy_url.is_empty() {
            match reqwest::Proxy::all(&config.proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!("Ignoring invalid proxy {}: {}", config.proxy_url, e),
            }
        }

        let client = builder.build().unwrap_or_default();

        ReqwestTransport {
            client,
            config: Arc::new(config),
        }
    }

    /// Wrap an existing `reqwest::Client`
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport {
            client,
            config: Arc::new(TransportConfig::default()),
        }
    }

    /// Get the transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ResolvedRequest) -> Result<Response, TransportError> {
        let url = request_url(&request.url, request.query.as_ref())?;
        let mut req_builder = self
            .client
            .request(request.method.into(), url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = match request.body {
            Some(Body::Json(value)) => req_builder.json(&value),
            Some(Body::Form(form)) => req_builder.multipart(into_multipart(form)?),
            Some(Body::Bytes(bytes)) => req_builder.body(bytes),
            Some(Body::Text(text)) => req_builder.body(text),
            None => req_builder,
        };

        let response = req_builder
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();

        // Read body
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if request.throw_http_errors && !is_success_status(status) {
            return Err(TransportError::Status {
                status,
                url: final_url,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Response::new(status, final_url, headers, body))
    }
}

fn into_multipart(form: FormData) -> Result<multipart::Form, TransportError> {
    let mut multipart_form = multipart::Form::new();
    for (name, value) in form.fields().iter().cloned() {
        multipart_form = match value {
            FormValue::Text(text) => multipart_form.text(name, text),
            FormValue::File {
                bytes,
                file_name,
                content_type,
            } => {
                let mut part = multipart::Part::bytes(bytes.to_vec());
                if let Some(file_name) = file_name {
                    part = part.file_name(file_name);
                }
                if let Some(content_type) = content_type {
                    part = part
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                }
                multipart_form.part(name, part)
            }
        };
    }
    Ok(multipart_form)
}
