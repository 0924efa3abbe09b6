//! Per-request options
//!
//! Each call owns its configuration: values are resolved once at call time
//! and nothing is shared between concurrent requests. Unset fields fall back
//! to the [`ClientConfig`] defaults.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ClientConfig;

use super::retry::RetryPolicy;

/// Options for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Override for the per-attempt timeout
    pub timeout: Option<Duration>,
    /// Override for the retry policy
    pub retry: Option<RetryPolicy>,
    /// Skip the content-type default and the authorization header
    pub skip_auth: bool,
    /// Extra headers merged into the outgoing request
    pub headers: HeaderMap,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-attempt timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry policy for this request.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Send the caller's headers untouched: no content-type default, no
    /// authorization header.
    pub fn with_skip_auth(mut self, skip_auth: bool) -> Self {
        self.skip_auth = skip_auth;
        self
    }

    /// Add a header to the outgoing request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Effective timeout after applying the client default.
    pub(crate) fn effective_timeout(&self, defaults: &ClientConfig) -> Duration {
        self.timeout.unwrap_or(defaults.timeout)
    }

    /// Effective retry policy after applying the client default.
    pub(crate) fn effective_retry(&self, defaults: &ClientConfig) -> RetryPolicy {
        self.retry.clone().unwrap_or_else(|| defaults.retry.clone())
    }
}
