#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Endpoint Tree: declarative HTTP clients
//!
//! Describe an API once as a tree of endpoint descriptors (method, URL
//! template, auth requirement) and get back a matching tree of callables.
//! Each call resolves its path params, query, body, and bearer token at call
//! time, and returns a handle that sends the request at most once, on first
//! use.
//!
//! ## Key Features
//!
//! - **URL templates**: `:name` placeholders filled from call params, percent-encoded
//! - **Input classification**: one explicit [`CallInput`] routed to path, query, or body
//! - **Bearer auth**: sync or async token providers, consulted on every call
//! - **Per-call overrides**: headers, query, body, method, timeout
//! - **Deferred dispatch**: [`DeferredResponse`] is lazy and memoized
//! - **Pluggable transport**: [`Transport`] trait with a `reqwest` default
//!
//! ## Module Structure
//!
//! - **[endpoint]** - Endpoint descriptors, factories, and registry groups
//! - **[client]** - Client builder, endpoint functions, deferred responses
//! - **[request]** - Input classification, URL templating, option merging
//! - **[auth]** - Token providers, bearer formatting, `Authorization` header resolution
//! - **[transport]** - Transport trait and the `reqwest` transport
//! - **[types]** - Query, body, form, and response types
//! - **[error]** - Error types and result handling

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use auth::{StaticToken, TokenLookup, TokenProvider};
pub use client::{ApiClient, ClientConfig, ClientGroup, DeferredResponse, EndpointFn};
pub use endpoint::{Endpoint, EndpointGroup, HttpMethod};
pub use error::{ClientError, Result, TransportError};
pub use request::{CallInput, RequestOptions, RequestParts, ResolvedRequest};
pub use transport::{ReqwestTransport, Transport, TransportConfig};
pub use types::{Body, FormData, Query, Response};
