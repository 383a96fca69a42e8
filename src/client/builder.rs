//! Builds the callable client tree from an endpoint registry.

use super::config::ClientConfig;
use super::deferred::DeferredResponse;
use crate::endpoint::{Endpoint, EndpointGroup, EndpointNode};
use crate::error::{ClientError, Result};
use crate::request::{self, CallInput, RequestOptions, ResolvedRequest};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::Response;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// State shared by every endpoint function of one client.
struct ClientShared {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ClientShared {
    async fn send(&self, request: ResolvedRequest) -> Result<Response> {
        if self.config.enable_logging {
            tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        }

        match self.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                if self.config.enable_logging {
                    tracing::warn!("Request failed: {}", error);
                }
                if let Some(on_error) = &self.config.on_error {
                    on_error(&error);
                }
                Err(ClientError::Transport(error))
            }
        }
    }
}

/// The callable generated for one endpoint.
///
/// Cheap to clone. Each call returns a fresh [`DeferredResponse`]; calls
/// share no state other than the client configuration.
#[derive(Clone)]
pub struct EndpointFn {
    endpoint: Endpoint,
    shared: Arc<ClientShared>,
}

impl EndpointFn {
    /// The descriptor this function was generated from.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Call the endpoint with `input` and no overrides.
    pub fn call(&self, input: impl Into<CallInput>) -> DeferredResponse {
        self.invoke(input.into(), None)
    }

    /// Call the endpoint with `input` and per-call `options`.
    pub fn call_with(&self, input: impl Into<CallInput>, options: RequestOptions) -> DeferredResponse {
        self.invoke(input.into(), Some(options))
    }

    fn invoke(&self, input: CallInput, options: Option<RequestOptions>) -> DeferredResponse {
        let prepared = match request::prepare(&self.shared.config.base_url, &self.endpoint, input, options) {
            Ok(prepared) => prepared,
            Err(error) => {
                if self.shared.config.enable_logging {
                    tracing::debug!(url = self.endpoint.url(), "request not dispatched: {}", error);
                }
                return DeferredResponse::failed(error);
            }
        };

        let shared = Arc::clone(&self.shared);
        DeferredResponse::new(async move {
            let resolved = prepared.resolve(shared.config.token_provider.as_deref()).await?;
            shared.send(resolved).await
        })
    }
}

impl fmt::Debug for EndpointFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EndpointFn").field(&self.endpoint).finish()
    }
}

/// A node of the client tree.
#[derive(Debug, Clone)]
pub enum ClientNode {
    /// Callable endpoint
    Endpoint(EndpointFn),
    /// Nested group
    Group(ClientGroup),
}

/// Group of endpoint functions mirroring an [`EndpointGroup`].
#[derive(Debug, Clone, Default)]
pub struct ClientGroup {
    entries: BTreeMap<String, ClientNode>,
}

impl ClientGroup {
    fn build(group: &EndpointGroup, shared: &Arc<ClientShared>) -> Self {
        let entries = group
            .iter()
            .map(|(name, node)| {
                let client_node = match node {
                    EndpointNode::Endpoint(endpoint) => ClientNode::Endpoint(EndpointFn {
                        endpoint: endpoint.clone(),
                        shared: Arc::clone(shared),
                    }),
                    EndpointNode::Group(child) => ClientNode::Group(ClientGroup::build(child, shared)),
                };
                (name.to_string(), client_node)
            })
            .collect();
        ClientGroup { entries }
    }

    /// Direct child by name.
    pub fn get(&self, name: &str) -> Option<&ClientNode> {
        self.entries.get(name)
    }

    /// Direct child endpoint function by name.
    pub fn endpoint(&self, name: &str) -> Option<&EndpointFn> {
        match self.entries.get(name) {
            Some(ClientNode::Endpoint(endpoint_fn)) => Some(endpoint_fn),
            _ => None,
        }
    }

    /// Direct child group by name.
    pub fn group(&self, name: &str) -> Option<&ClientGroup> {
        match self.entries.get(name) {
            Some(ClientNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Endpoint function at a dotted path such as `"users.get"`.
    pub fn at(&self, path: &str) -> Result<&EndpointFn> {
        let unknown = || ClientError::UnknownEndpoint(path.to_string());
        let (groups, leaf) = match path.rsplit_once('.') {
            Some((groups, leaf)) => (Some(groups), leaf),
            None => (None, path),
        };

        let mut group = self;
        for name in groups.into_iter().flat_map(|g| g.split('.')) {
            group = group.group(name).ok_or_else(unknown)?;
        }
        group.endpoint(leaf).ok_or_else(unknown)
    }

    /// Iterate over direct children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClientNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A client generated from an endpoint registry.
///
/// Built once, synchronously; no I/O happens until an endpoint function is
/// called and its handle is used.
pub struct ApiClient {
    root: ClientGroup,
    shared: Arc<ClientShared>,
}

impl ApiClient {
    /// Build a client over `transport`.
    pub fn new(config: ClientConfig, endpoints: &EndpointGroup, transport: impl Transport + 'static) -> Self {
        let shared = Arc::new(ClientShared {
            config,
            transport: Arc::new(transport),
        });
        let root = ClientGroup::build(endpoints, &shared);

        if shared.config.enable_logging {
            tracing::debug!(
                base_url = %shared.config.base_url,
                endpoints = endpoints.endpoint_count(),
                "client built"
            );
        }

        ApiClient { root, shared }
    }

    /// Build a client over a default [`ReqwestTransport`].
    pub fn with_reqwest(config: ClientConfig, endpoints: &EndpointGroup) -> Self {
        Self::new(config, endpoints, ReqwestTransport::new())
    }

    /// The root group.
    pub fn root(&self) -> &ClientGroup {
        &self.root
    }

    /// Top-level endpoint function by name.
    pub fn endpoint(&self, name: &str) -> Option<&EndpointFn> {
        self.root.endpoint(name)
    }

    /// Top-level group by name.
    pub fn group(&self, name: &str) -> Option<&ClientGroup> {
        self.root.group(name)
    }

    /// Endpoint function at a dotted path.
    pub fn at(&self, path: &str) -> Result<&EndpointFn> {
        self.root.at(path)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.shared.config)
            .field("root", &self.root)
            .finish()
    }
}
