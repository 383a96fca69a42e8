//! Bearer token resolution for authed endpoints.
//!
//! A [`TokenProvider`] answers with a [`TokenLookup`], which is either a token
//! available right now or a future that will produce one. The provider is
//! asked again on every call; tokens are never cached by the client.
//!
//! # Examples
//!
//! ```
//! use endpoint_tree::auth::{authorization_header, TokenLookup};
//!
//! let provider = || TokenLookup::pending(async { Some("tok".to_string()) });
//!
//! let header = tokio_test::block_on(authorization_header(true, Some(&provider)))?;
//! assert_eq!(header.unwrap(), "Bearer tok");
//! # Ok::<(), endpoint_tree::ClientError>(())
//! ```

use crate::error::{ClientError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use http::HeaderValue;
use std::future::Future;

const BEARER_SCHEME: &str = "Bearer";

/// Result of asking a provider for a token.
pub enum TokenLookup {
    /// Token known synchronously (`None` means no token)
    Ready(Option<String>),
    /// Token still being fetched
    Pending(BoxFuture<'static, Option<String>>),
}

impl TokenLookup {
    /// A token available right now.
    pub fn ready(token: impl Into<Option<String>>) -> Self {
        TokenLookup::Ready(token.into())
    }

    /// A token that will be produced by `future`.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        TokenLookup::Pending(future.boxed())
    }

    /// Wait for the token, suspending only if it is pending.
    pub async fn resolve(self) -> Option<String> {
        match self {
            TokenLookup::Ready(token) => token,
            TokenLookup::Pending(future) => future.await,
        }
    }
}

impl fmt::Debug for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLookup::Ready(Some(_)) => f.write_str("TokenLookup::Ready(<redacted>)"),
            TokenLookup::Ready(None) => f.write_str("TokenLookup::Ready(None)"),
            TokenLookup::Pending(_) => f.write_str("TokenLookup::Pending"),
        }
    }
}

/// Source of bearer tokens.
///
/// Implemented for any `Fn() -> TokenLookup`; see also [`StaticToken`],
/// [`SyncTokenFn`] and [`AsyncTokenFn`].
pub trait TokenProvider: Send + Sync {
    /// Fetch the current token.
    fn get_token(&self) -> TokenLookup;
}

impl<F> TokenProvider for F
where
    F: Fn() -> TokenLookup + Send + Sync,
{
    fn get_token(&self) -> TokenLookup {
        self()
    }
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

impl TokenProvider for StaticToken {
    fn get_token(&self) -> TokenLookup {
        TokenLookup::Ready(Some(self.0.clone()))
    }
}

/// Adapter for a synchronous `Fn() -> Option<String>`.
pub struct SyncTokenFn<F>(pub F);

impl<F> TokenProvider for SyncTokenFn<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn get_token(&self) -> TokenLookup {
        TokenLookup::Ready((self.0)())
    }
}

/// Adapter for an async `Fn() -> impl Future<Output = Option<String>>`.
pub struct AsyncTokenFn<F>(pub F);

impl<F, Fut> TokenProvider for AsyncTokenFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    fn get_token(&self) -> TokenLookup {
        TokenLookup::pending((self.0)())
    }
}

/// Format a bearer credential for the `Authorization` header.
///
/// ```
/// use endpoint_tree::auth::bearer;
///
/// assert_eq!(bearer("tok"), "Bearer tok");
/// ```
#[inline]
pub fn bearer(token: &str) -> String {
    format!("{} {}", BEARER_SCHEME, token)
}

/// Compute the `Authorization` header value for a call, if any.
///
/// Returns `None` when the endpoint does not require auth, when there is no
/// provider, or when the provider yields no token or an empty one. The value
/// is marked sensitive so it is redacted from `Debug` output.
///
/// # Errors
///
/// Returns [`ClientError::InvalidHeader`] if the token contains bytes that
/// cannot appear in a header value.
pub async fn authorization_header(
    requires_auth: bool,
    provider: Option<&dyn TokenProvider>,
) -> Result<Option<HeaderValue>> {
    let Some(provider) = provider.filter(|_| requires_auth) else {
        return Ok(None);
    };
    let Some(token) = provider.get_token().resolve().await.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let mut value = HeaderValue::try_from(bearer(&token))
        .map_err(|e| ClientError::InvalidHeader(format!("invalid bearer token: {e}")))?;
    value.set_sensitive(true);
    Ok(Some(value))
}
