//! Retry loop with linear backoff for transient failures
//!
//! 5xx responses and connection-level transport failures are retried with a
//! linearly increasing delay. 4xx responses and client-side timeouts are
//! surfaced immediately: repeating them cannot succeed, and a timeout must
//! resolve within one timeout budget, not one per attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::Response;
use tracing::warn;

use crate::config::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};
use crate::error::ApiError;

/// Retry policy: total number of attempts and base backoff delay.
///
/// The wait before retry `k` (1-based) is `delay * k`, so a three-attempt
/// policy sleeps `delay` and then `2 * delay` between tries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per logical request, including the first (>= 1)
    pub attempts: u32,
    /// Base delay for the linear backoff
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `attempts` is clamped to at least one.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Set the number of attempts (clamped to at least one).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Set the base backoff delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Backoff to wait after `attempt` failed tries.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.delay * attempt
    }
}

/// Failure of a single attempt, before normalization into [`ApiError`].
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// The attempt exceeded its timeout budget and was aborted
    Timeout,
    /// The transport failed before a complete response was received
    Transport(reqwest::Error),
}

/// Classify a transport failure as transient (worth retrying) or fatal.
///
/// Connection-level failures (refused, reset, unreachable, resolution
/// failures reported by the connector) and interrupted transfers are
/// transient. Request construction, redirect-policy, and body-decode
/// failures are fatal.
pub(crate) fn is_transient(error: &reqwest::Error) -> bool {
    if error.is_builder() || error.is_decode() || error.is_redirect() {
        return false;
    }
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Run `op` up to `policy.attempts` times.
///
/// A 2xx or 4xx response ends the loop immediately. A 5xx response or a
/// transient transport failure is retried with `delay * attempt` between
/// tries; once attempts are exhausted the last response or error is
/// surfaced. Timeouts are never retried.
pub(crate) async fn execute_with_retry<F, Fut>(
    op: F,
    policy: &RetryPolicy,
) -> Result<Response, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, AttemptError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(response) if response.status().is_server_error() && attempt < attempts => {
                let wait = policy.backoff(attempt);
                warn!(
                    status = response.status().as_u16(),
                    attempt,
                    total = attempts,
                    wait_ms = wait.as_millis() as u64,
                    "server error, retrying"
                );
                tokio::time::sleep(wait).await;
            }
            Ok(response) => return Ok(response),
            Err(AttemptError::Timeout) => return Err(ApiError::timeout()),
            Err(AttemptError::Transport(error)) if attempt < attempts && is_transient(&error) => {
                let wait = policy.backoff(attempt);
                warn!(
                    error = %error,
                    attempt,
                    total = attempts,
                    wait_ms = wait.as_millis() as u64,
                    "transport failure, retrying"
                );
                tokio::time::sleep(wait).await;
            }
            Err(AttemptError::Transport(error)) => {
                return Err(ApiError::network(error.to_string()));
            }
        }
        attempt += 1;
    }
}
