//! HTTP transport for metadata requests, with retry and backoff.
//!
//! # Architecture
//!
//! - [`Transport`] - async trait for "send one request, get text back"
//! - [`HttpTransport`] - reqwest-backed implementation (gzip-aware)
//! - [`RetryingTransport`] - wraps any transport with the 403/transient
//!   backoff policy described by [`RetryPolicy`]
//! - [`Sleeper`] - injectable sleep so backoff is observable in tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tubefetch_core::identity::ThreadRandom;
//! use tubefetch_core::transport::{
//!     ApiRequest, HttpTransport, RetryPolicy, RetryingTransport, TokioSleeper, Transport,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = RetryingTransport::new(
//!     HttpTransport::new()?,
//!     RetryPolicy::default(),
//!     Arc::new(TokioSleeper),
//!     Arc::new(ThreadRandom),
//! );
//! let request = ApiRequest::get("https://example.com/", Duration::from_secs(30));
//! let body = transport.send(&request).await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

mod constants;
mod error;
mod http;
mod retry;

pub use constants::{
    DEFAULT_MAX_ATTEMPTS, METADATA_CONNECT_TIMEOUT, METADATA_TIMEOUT, STREAM_CONNECT_TIMEOUT,
    STREAM_READ_TIMEOUT,
};
pub use error::TransportError;
pub use http::HttpTransport;
pub use retry::{FailureType, RetryDecision, RetryPolicy, RetryingTransport, classify_error};

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// One outbound request: GET when `body` is absent, JSON POST otherwise.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Target URL.
    pub url: String,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Headers to attach.
    pub headers: BTreeMap<String, String>,
    /// Deadline for the whole request.
    pub timeout: Duration,
}

impl ApiRequest {
    /// Creates a GET request with no extra headers.
    #[must_use]
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            body: None,
            headers: BTreeMap::new(),
            timeout,
        }
    }

    /// Creates a JSON POST request.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            body: Some(body),
            headers: BTreeMap::new(),
            timeout,
        }
    }

    /// Replaces the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

/// Sends a request and returns the decoded response text.
///
/// Uses `async_trait` so the negotiation client can hold `dyn Transport` and
/// tests can substitute scripted transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request`, returning the response body as text.
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        (**self).send(request).await
    }
}

/// Suspends the current flow for a duration.
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    /// Sleeps for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every duration requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut guard) = self.sleeps.lock() {
            guard.push(duration);
        }
    }
}
