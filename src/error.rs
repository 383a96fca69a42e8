//! Error types for endpoint client calls.
//!
//! Two layers of failure exist:
//!
//! | Type | Raised by | Meaning |
//! |------|-----------|---------|
//! | [`ClientError::MissingPathParam`] | request resolution | a `:token` in the URL template had no value |
//! | [`ClientError::InvalidHeader`] | option builders, auth | a header name or value is not valid on the wire |
//! | [`TransportError`] | the [`Transport`](crate::transport::Transport) | anything the network layer reports |
//!
//! Both are `Clone` because the outcome of a call is memoized and shared by
//! every clone of its [`DeferredResponse`](crate::client::DeferredResponse).

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure reported by a transport.
///
/// The client never reinterprets these: whatever the transport returns is
/// handed to the `on_error` hook and then back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be performed (connection, TLS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-2xx status
    #[error("Request failed with status code {status}: {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Final URL of the request
        url: String,
        /// Response body, lossily decoded as UTF-8
        body: String,
    },

    /// The request could not be expressed on the wire (bad URL, bad content type)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Status code of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced by a client call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A `:name` token in the endpoint URL template had no matching param.
    #[error("Missing param: {0}")]
    MissingPathParam(String),

    /// The transport failed; the inner error is exactly what it returned.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// No endpoint exists at the requested path of the client tree.
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A response body accessor could not decode the payload.
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// The underlying transport error, if this is one.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            ClientError::Transport(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the failure happened before anything was sent.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            ClientError::MissingPathParam(_)
                | ClientError::InvalidHeader(_)
                | ClientError::UnknownEndpoint(_)
        )
    }
}
