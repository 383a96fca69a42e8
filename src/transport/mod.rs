//! The network boundary.
//!
//! The client never performs I/O itself: every resolved request is handed to
//! a [`Transport`]. The crate ships [`ReqwestTransport`]; tests and embedders
//! can supply their own.
//!
//! # Module Organization
//!
//! ```text
//! transport/
//! ├── fetch  - ReqwestTransport and its configuration
//! └── utils  - query-string encoding and status helpers
//! ```
//!
//! # Implementing a Transport
//!
//! ```
//! use async_trait::async_trait;
//! use endpoint_tree::request::ResolvedRequest;
//! use endpoint_tree::transport::Transport;
//! use endpoint_tree::types::Response;
//! use endpoint_tree::TransportError;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Transport for Echo {
//!     async fn send(&self, request: ResolvedRequest) -> Result<Response, TransportError> {
//!         Ok(Response::new(200, request.url, http::HeaderMap::new(), "echo"))
//!     }
//! }
//! ```

mod fetch;
mod utils;

pub use fetch::{ReqwestTransport, TransportConfig};
pub use utils::{append_query, is_success_status, request_url};

use crate::error::TransportError;
use crate::request::ResolvedRequest;
use crate::types::Response;
use async_trait::async_trait;
use std::sync::Arc;

/// Performs a resolved request.
///
/// Implementations own every networking concern: connection reuse, status
/// handling, body buffering. Errors are returned to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the buffered response.
    async fn send(&self, request: ResolvedRequest) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: ResolvedRequest) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}
