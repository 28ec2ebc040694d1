//! Retry logic with exponential backoff for metadata requests.
//!
//! # Overview
//!
//! When a request fails, the error is classified into a [`FailureType`]:
//! - [`FailureType::Blocked`] - HTTP 403; retried with exponential backoff plus jitter
//! - [`FailureType::Transient`] - timeouts, network and decode failures; retried after a flat delay
//! - [`FailureType::Permanent`] - any other HTTP status; never retried
//!
//! The [`RetryPolicy`] turns a failure and attempt count into a [`RetryDecision`].
//! [`RetryingTransport`] applies the policy around any [`Transport`].
//!
//! # Example
//!
//! ```
//! use tubefetch_core::identity::FixedRandom;
//! use tubefetch_core::transport::{FailureType, RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::default();
//! match policy.should_retry(FailureType::Blocked, 1, &FixedRandom::default()) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         println!("Retrying in {:?} (attempt {})", delay, attempt);
//!     }
//!     RetryDecision::DoNotRetry { reason } => {
//!         println!("Not retrying: {}", reason);
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::identity::RandomSource;

use super::constants::DEFAULT_MAX_ATTEMPTS;
use super::{ApiRequest, Sleeper, Transport, TransportError};

/// Default base delay for the 403 backoff (1 second).
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Flat delay before retrying a transient failure (1 second).
const DEFAULT_TRANSIENT_DELAY: Duration = Duration::from_secs(1);

/// Backoff multiplier (doubles each attempt).
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Upper bound of the uniform jitter added to backoff delays (1 second).
const MAX_JITTER: Duration = Duration::from_secs(1);

/// Classification of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// HTTP 403: the API is blocking this identity for now.
    Blocked,

    /// Temporary failure: timeout, network error, undecodable body.
    Transient,

    /// Any other HTTP status; retrying would not help.
    Permanent,
}

/// Decision on whether to retry a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Do not retry the request.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Configuration for retry behavior.
///
/// # Delay Calculation
///
/// ```text
/// blocked:   delay = base_delay * 2^(attempt - 1) + uniform(0, 1s)
/// transient: delay = transient_delay
/// ```
///
/// With defaults and 3 attempts, blocked delays fall in `[1s, 2s)` then `[2s, 3s)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Base delay for the first blocked retry.
    base_delay: Duration,

    /// Flat delay used for transient failures.
    transient_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_TRANSIENT_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a retry policy with custom settings (`max_attempts` is at least 1).
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, transient_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            transient_delay,
        }
    }

    /// Creates a policy with a custom `max_attempts`, using defaults for other settings.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_BASE_DELAY, DEFAULT_TRANSIENT_DELAY)
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Determines whether to retry a failed request.
    ///
    /// `attempt` is the 1-indexed attempt that just failed. Jitter for blocked
    /// failures is drawn from `random`.
    #[instrument(skip(self, random), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(
        &self,
        failure_type: FailureType,
        attempt: u32,
        random: &dyn RandomSource,
    ) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = match failure_type {
            FailureType::Blocked => self.backoff_delay(attempt, random),
            _ => self.transient_delay,
        };

        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    /// `base_delay * 2^(attempt - 1) + uniform(0, MAX_JITTER)`.
    fn backoff_delay(&self, attempt: u32, random: &dyn RandomSource) -> Duration {
        let exponent = f64::from(attempt.saturating_sub(1));
        let base = self.base_delay.as_secs_f64() * BACKOFF_MULTIPLIER.powf(exponent);
        let jitter = MAX_JITTER.as_secs_f64() * random.unit();
        Duration::from_secs_f64(base + jitter)
    }
}

/// Classifies a transport error into a failure type for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | HTTP 403 | Blocked |
/// | other HTTP status | Permanent |
/// | Timeout | Transient |
/// | Network | Transient |
/// | Decode | Transient |
/// | ClientBuild | Permanent |
#[must_use]
pub fn classify_error(error: &TransportError) -> FailureType {
    match error {
        TransportError::HttpStatus { status: 403, .. } => FailureType::Blocked,
        TransportError::HttpStatus { .. } | TransportError::ClientBuild { .. } => {
            FailureType::Permanent
        }
        TransportError::Timeout { .. }
        | TransportError::Network { .. }
        | TransportError::Decode { .. } => FailureType::Transient,
    }
}

/// Wraps a [`Transport`] with the retry policy.
///
/// On the final attempt the error is returned un-retried.
#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    random: Arc<dyn RandomSource>,
}

impl<T: Transport> RetryingTransport<T> {
    /// Creates a retrying wrapper around `inner`.
    pub fn new(
        inner: T,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            inner,
            policy,
            sleeper,
            random,
        }
    }

    /// Returns the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let mut attempt: u32 = 1;
        loop {
            match self.inner.send(request).await {
                Ok(body) => return Ok(body),
                Err(error) => {
                    let failure = classify_error(&error);
                    match self
                        .policy
                        .should_retry(failure, attempt, self.random.as_ref())
                    {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            warn!(
                                url = %request.url,
                                error = %error,
                                ?failure,
                                delay_secs = delay.as_secs_f64(),
                                "request failed, retrying"
                            );
                            self.sleeper.sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(url = %request.url, %reason, "giving up on request");
                            return Err(error);
                        }
                    }
                }
            }
        }
    }
}
