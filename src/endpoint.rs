//! Endpoint descriptors and the registry tree.
//!
//! An [`Endpoint`] is static metadata for one HTTP operation: its method, a URL
//! template relative to the client's base URL, and whether it needs a bearer
//! token. Endpoints are arranged into named [`EndpointGroup`]s, which may nest.
//!
//! # Factories
//!
//! | Function | Method | Auth |
//! |----------|--------|------|
//! | [`get`], [`post`], [`put`], [`patch`], [`head`], [`del`] | per name | no |
//! | [`aget`], [`apost`], [`aput`], [`apatch`], [`ahead`], [`adel`] | per name | yes |
//! | [`endpoint`] / [`authed`] | any | explicit / yes |
//!
//! # Examples
//!
//! ```
//! use endpoint_tree::endpoint::{aget, get, post, EndpointGroup};
//!
//! let endpoints = EndpointGroup::new()
//!     .with_endpoint("list", get("/todos"))
//!     .with_endpoint("create", post("/todos"))
//!     .with_group(
//!         "admin",
//!         EndpointGroup::new().with_endpoint("stats", aget("/admin/stats")),
//!     );
//!
//! assert_eq!(endpoints.endpoint_count(), 3);
//! ```
//!
//! Registries can also be loaded from JSON; an object with a `method` and a
//! `url` is an endpoint, any other object is a group:
//!
//! ```
//! use endpoint_tree::endpoint::EndpointGroup;
//!
//! let endpoints: EndpointGroup = serde_json::from_str(r#"{
//!     "todos": {
//!         "get": { "method": "get", "url": "/todos/:id" },
//!         "remove": { "method": "delete", "url": "/todos/:id", "auth": true }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(endpoints.endpoint_count(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether an unstructured object input is sent as the query string
    /// (GET and HEAD) rather than as the body.
    pub fn takes_query_input(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Static description of one HTTP operation.
///
/// Immutable once created; [`with_auth`](Endpoint::with_auth) returns a new
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    method: HttpMethod,
    url: String,
    #[serde(default)]
    auth: bool,
}

impl Endpoint {
    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// URL template relative to the client base URL, e.g. `/todos/:id`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether calls must carry a bearer token.
    pub fn requires_auth(&self) -> bool {
        self.auth
    }

    /// Same endpoint with the auth requirement set to `auth`.
    #[must_use]
    pub fn with_auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }
}

/// Options accepted by [`endpoint`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointOptions {
    /// Require a bearer token (defaults to `false`)
    pub auth: bool,
}

/// Create an endpoint descriptor.
pub fn endpoint(method: HttpMethod, url: impl Into<String>, opts: EndpointOptions) -> Endpoint {
    Endpoint {
        method,
        url: url.into(),
        auth: opts.auth,
    }
}

/// Create an endpoint that requires authentication.
///
/// The client's token provider is consulted on every call and its token is
/// sent as `Authorization: Bearer <token>`.
pub fn authed(method: HttpMethod, url: impl Into<String>) -> Endpoint {
    endpoint(method, url, EndpointOptions { auth: true })
}

/// Short aliases: `ep` for [`endpoint`], `aep` for [`authed`].
pub use self::{authed as aep, endpoint as ep};

/// Create a GET endpoint.
pub fn get(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Get, url, EndpointOptions::default())
}

/// Create a POST endpoint.
pub fn post(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Post, url, EndpointOptions::default())
}

/// Create a PUT endpoint.
pub fn put(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Put, url, EndpointOptions::default())
}

/// Create a PATCH endpoint.
pub fn patch(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Patch, url, EndpointOptions::default())
}

/// Create a HEAD endpoint.
pub fn head(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Head, url, EndpointOptions::default())
}

/// Create a DELETE endpoint.
pub fn del(url: impl Into<String>) -> Endpoint {
    endpoint(HttpMethod::Delete, url, EndpointOptions::default())
}

/// Create an authed GET endpoint.
pub fn aget(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Get, url)
}

/// Create an authed POST endpoint.
pub fn apost(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Post, url)
}

/// Create an authed PUT endpoint.
pub fn aput(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Put, url)
}

/// Create an authed PATCH endpoint.
pub fn apatch(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Patch, url)
}

/// Create an authed HEAD endpoint.
pub fn ahead(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Head, url)
}

/// Create an authed DELETE endpoint.
pub fn adel(url: impl Into<String>) -> Endpoint {
    authed(HttpMethod::Delete, url)
}

/// A node of the registry: either a leaf endpoint or a nested group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointNode {
    /// Leaf descriptor
    Endpoint(Endpoint),
    /// Nested group
    Group(EndpointGroup),
}

impl From<Endpoint> for EndpointNode {
    fn from(endpoint: Endpoint) -> Self {
        EndpointNode::Endpoint(endpoint)
    }
}

impl From<EndpointGroup> for EndpointNode {
    fn from(group: EndpointGroup) -> Self {
        EndpointNode::Group(group)
    }
}

/// Named tree of endpoints.
///
/// Children are owned, so the structure is always a tree. Names are unique
/// within a group; inserting an existing name replaces the previous node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointGroup {
    entries: BTreeMap<String, EndpointNode>,
}

impl EndpointGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert) for a leaf.
    #[must_use]
    pub fn with_endpoint(mut self, name: impl Into<String>, endpoint: Endpoint) -> Self {
        self.insert(name, endpoint);
        self
    }

    /// Builder form of [`insert`](Self::insert) for a nested group.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, group: EndpointGroup) -> Self {
        self.insert(name, group);
        self
    }

    /// Insert a node, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<EndpointNode>) -> Option<EndpointNode> {
        self.entries.insert(name.into(), node.into())
    }

    /// Look up a direct child.
    pub fn get(&self, name: &str) -> Option<&EndpointNode> {
        self.entries.get(name)
    }

    /// Iterate over direct children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of leaf endpoints in the whole subtree.
    pub fn endpoint_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                EndpointNode::Endpoint(_) => 1,
                EndpointNode::Group(group) => group.endpoint_count(),
            })
            .sum()
    }
}
