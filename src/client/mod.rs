//! Client built from an endpoint registry.
//!
//! This module turns an [`EndpointGroup`](crate::endpoint::EndpointGroup) into
//! a tree of callables:
//!
//! - **Walk the registry once** into [`ClientGroup`]s of [`EndpointFn`]s
//! - **Resolve each call** into path params, query, body, and auth header
//! - **Merge per-call overrides** with the computed request
//! - **Defer and memoize dispatch** behind a [`DeferredResponse`]
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── builder  - ApiClient, ClientGroup and EndpointFn
//! ├── config   - Client configuration
//! └── deferred - DeferredResponse handle
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ApiClient`] | Root of a generated client |
//! | [`ClientGroup`] | Named group of endpoint functions |
//! | [`EndpointFn`] | Callable for one endpoint |
//! | [`DeferredResponse`] | Lazy, single-dispatch response handle |
//! | [`ClientConfig`] | Base URL, token provider, error hook |
//!
//! # Examples
//!
//! ```no_run
//! use endpoint_tree::client::{ApiClient, ClientConfig};
//! use endpoint_tree::endpoint::{aget, get, EndpointGroup};
//! use endpoint_tree::request::RequestParts;
//!
//! # async fn run() -> endpoint_tree::Result<()> {
//! let endpoints = EndpointGroup::new()
//!     .with_endpoint("get", get("/todos/:id"))
//!     .with_endpoint("mine", aget("/me/todos"));
//!
//! let config = ClientConfig::new("https://api.example.com")
//!     .with_token(|| Some("secret".to_string()));
//! let api = ApiClient::with_reqwest(config, &endpoints);
//!
//! let todo: serde_json::Value = api
//!     .at("get")?
//!     .call(RequestParts::new().param("id", 1))
//!     .json()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod deferred;

pub use builder::{ApiClient, ClientGroup, ClientNode, EndpointFn};
pub use config::{ClientConfig, ErrorHook};
pub use deferred::DeferredResponse;
