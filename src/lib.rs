//! apix - configured HTTP request client
//!
//! Wraps `reqwest` with the cross-cutting behavior every caller of a JSON
//! API needs:
//!
//! - **Timeout**: each attempt runs under a bounded timer and is aborted
//!   when the budget is exceeded (surfaced as status 408)
//! - **Retry**: 5xx responses and transient transport failures are retried
//!   with linear backoff; 4xx responses and timeouts are not
//! - **Errors**: every failure path normalizes into [`ApiError`], so callers
//!   branch on a status code instead of downcasting transport exceptions
//! - **Auth**: a pluggable [`TokenProvider`] attaches bearer tokens
//! - **Config**: explicit, immutable [`ClientConfig`], loadable from the
//!   environment with fail-fast validation
//!
//! # Example
//!
//! ```no_run
//! use apix::{ApiClient, ApiError, RequestConfig};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! async fn fetch_user(client: &ApiClient) -> Result<User, ApiError> {
//!     client.get("/users/1", RequestConfig::new()).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

// Re-export main types for convenience
pub use config::{ClientConfig, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use error::{ApiError, ConfigError};
pub use http::{
    ApiClient, Body, EnvToken, Method, NoAuth, RequestConfig, RetryPolicy, StaticToken,
    StatusCode, TokenProvider,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
