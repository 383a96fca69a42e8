//! Client configuration.

use crate::auth::{AsyncTokenFn, SyncTokenFn, TokenProvider};
use crate::error::TransportError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Callback observing transport failures before they are returned.
pub type ErrorHook = Arc<dyn Fn(&TransportError) + Send + Sync>;

/// Settings supplied once per client.
///
/// # Examples
///
/// ```
/// use endpoint_tree::client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com")
///     .with_token(|| std::env::var("API_TOKEN").ok())
///     .with_on_error(|error| eprintln!("request failed: {}", error));
///
/// assert!(config.token_provider.is_some());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Prefix for every endpoint URL; never scanned for `:name` tokens
    pub base_url: String,

    /// Source of bearer tokens for authed endpoints
    pub token_provider: Option<Arc<dyn TokenProvider>>,

    /// Invoked with every transport error before it is returned
    pub on_error: Option<ErrorHook>,

    /// Emit `tracing` events for dispatches and failures
    pub enable_logging: bool,
}

impl ClientConfig {
    /// Configuration for `base_url` with no auth and no error hook.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Use `provider` for authed endpoints.
    #[must_use]
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Use a synchronous closure as the token provider.
    #[must_use]
    pub fn with_token<F>(self, get_token: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.with_token_provider(SyncTokenFn(get_token))
    }

    /// Use an async closure as the token provider.
    #[must_use]
    pub fn with_async_token<F, Fut>(self, get_token: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        self.with_token_provider(AsyncTokenFn(get_token))
    }

    /// Observe transport errors.
    #[must_use]
    pub fn with_on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&TransportError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Turn `tracing` output on or off.
    #[must_use]
    pub fn with_logging(mut self, enable_logging: bool) -> Self {
        self.enable_logging = enable_logging;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_provider: None,
            on_error: None,
            enable_logging: true,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token_provider", &self.token_provider.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("enable_logging", &self.enable_logging)
            .finish()
    }
}
