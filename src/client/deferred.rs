//! Lazily dispatched, memoized response handle.
//!
//! Calling an endpoint returns a [`DeferredResponse`] immediately. Nothing is
//! sent until the handle (or any clone of it) is first awaited or one of its
//! accessors is polled. From then on every access, through any clone, observes
//! the same single request.
//!
//! # Accessors
//!
//! | Accessor | Resolves to |
//! |----------|-------------|
//! | `.await` / [`response`](DeferredResponse::response) | the shared [`Response`] |
//! | [`status`](DeferredResponse::status), [`ok`](DeferredResponse::ok) | status code / success flag |
//! | [`url`](DeferredResponse::url), [`headers`](DeferredResponse::headers), [`header`](DeferredResponse::header), [`header_all`](DeferredResponse::header_all) | response metadata |
//! | [`json`](DeferredResponse::json), [`text`](DeferredResponse::text), [`bytes`](DeferredResponse::bytes) | decoded body |

use crate::error::{ClientError, Result};
use crate::types::Response;
use bytes::Bytes;
use futures::future::{self, BoxFuture, Shared};
use futures::FutureExt;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;

type Dispatch = Shared<BoxFuture<'static, Result<Arc<Response>>>>;

/// Handle to a call that runs at most once, on first use.
///
/// Cloning is cheap; clones share the same underlying request.
#[derive(Clone)]
pub struct DeferredResponse {
    dispatch: Dispatch,
}

impl DeferredResponse {
    /// Wrap a not-yet-started request.
    pub(crate) fn new<F>(request: F) -> Self
    where
        F: Future<Output = Result<Response>> + Send + 'static,
    {
        DeferredResponse {
            dispatch: request.map(|result| result.map(Arc::new)).boxed().shared(),
        }
    }

    /// A handle that settles to `error` without dispatching anything.
    pub(crate) fn failed(error: ClientError) -> Self {
        Self::new(future::ready(Err(error)))
    }

    /// Whether the underlying call has completed.
    pub fn is_settled(&self) -> bool {
        self.dispatch.peek().is_some()
    }

    /// The settled response.
    pub async fn response(&self) -> Result<Arc<Response>> {
        self.dispatch.clone().await
    }

    /// Status code.
    pub async fn status(&self) -> Result<u16> {
        Ok(self.response().await?.status())
    }

    /// Whether the status is 2xx.
    pub async fn ok(&self) -> Result<bool> {
        Ok(self.response().await?.ok())
    }

    /// Final URL.
    pub async fn url(&self) -> Result<String> {
        Ok(self.response().await?.url().to_string())
    }

    /// Response headers.
    pub async fn headers(&self) -> Result<HeaderMap> {
        Ok(self.response().await?.headers().clone())
    }

    /// First value of a response header.
    pub async fn header(&self, name: &str) -> Result<Option<String>> {
        Ok(self.response().await?.header(name).map(str::to_string))
    }

    /// Every value of a repeated response header.
    pub async fn header_all(&self, name: &str) -> Result<Vec<String>> {
        let response = self.response().await?;
        Ok(response.header_all(name).into_iter().map(str::to_string).collect())
    }

    /// Raw body.
    pub async fn bytes(&self) -> Result<Bytes> {
        Ok(self.response().await?.bytes())
    }

    /// Body as UTF-8 text.
    pub async fn text(&self) -> Result<String> {
        self.response().await?.text()
    }

    /// Body deserialized from JSON.
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T> {
        self.response().await?.json()
    }
}

impl IntoFuture for DeferredResponse {
    type Output = Result<Arc<Response>>;
    type IntoFuture = Dispatch;

    fn into_future(self) -> Self::IntoFuture {
        self.dispatch
    }
}

impl fmt::Debug for DeferredResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredResponse")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted(calls: &Arc<AtomicUsize>, body: &'static str) -> DeferredResponse {
        let calls = Arc::clone(calls);
        DeferredResponse::new(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::new(200, "http://api.test/foo", HeaderMap::new(), body))
        })
    }

    #[tokio::test]
    async fn test_not_dispatched_until_accessed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = counted(&calls, "ok");
        let _clone = handle.clone();

        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!handle.is_settled());

        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_many_accessors_one_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = counted(&calls, r#"{"foo":123}"#);

        let status = handle.status();
        let text = handle.text();
        let (status, text) = tokio::join!(status, text);
        assert_eq!(status.unwrap(), 200);
        assert_eq!(text.unwrap(), r#"{"foo":123}"#);

        let value: serde_json::Value = handle.json().await.unwrap();
        assert_eq!(value["foo"], 123);
        assert!(handle.ok().await.unwrap());
        assert_eq!(handle.url().await.unwrap(), "http://api.test/foo");

        let first = handle.clone().await.unwrap();
        let second = handle.await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clones_share_across_tasks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = counted(&calls, "ok");

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let h = handle.clone();
                tokio::spawn(async move { h.bytes().await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), Bytes::from_static(b"ok"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_settled());
    }

    #[tokio::test]
    async fn test_repeated_headers_visible() {
        let handle = DeferredResponse::new(async {
            let mut headers = HeaderMap::new();
            headers.append("set-cookie", "a=1".parse().unwrap());
            headers.append("set-cookie", "b=2".parse().unwrap());
            Ok(Response::new(200, "http://api.test/login", headers, ""))
        });

        assert_eq!(handle.header_all("Set-Cookie").await.unwrap(), ["a=1", "b=2"]);
        assert_eq!(handle.header("set-cookie").await.unwrap().as_deref(), Some("a=1"));
        assert_eq!(handle.headers().await.unwrap().get_all("set-cookie").iter().count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_shared() {
        let error = ClientError::Transport(TransportError::Http("fail".to_string()));
        let handle = DeferredResponse::failed(error.clone());

        assert_eq!(handle.status().await.unwrap_err(), error);
        assert_eq!(handle.text().await.unwrap_err(), error);
        assert_eq!(handle.await.unwrap_err(), error);
    }

    #[tokio::test]
    async fn test_decode_error_does_not_poison_handle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = counted(&calls, "plain text");

        assert!(matches!(
            handle.json::<serde_json::Value>().await,
            Err(ClientError::Decode(_))
        ));
        assert_eq!(handle.text().await.unwrap(), "plain text");
    }
}
