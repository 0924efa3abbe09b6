//! HTTP request client with bounded timeout, bounded retry, and normalized
//! error handling.
//!
//! This module provides:
//! - URL resolution against an environment-derived base URL
//! - Pluggable bearer-token authentication
//! - Linear-backoff retry for 5xx responses and transient transport failures
//! - A per-attempt timeout whose timer is released on every exit path
//! - Content-type-aware response decoding

pub mod auth;
pub mod client;
pub mod request;
pub mod retry;


pub use auth::{EnvToken, NoAuth, StaticToken, TokenProvider};
pub use client::{ApiClient, Body};
pub use request::RequestConfig;
pub use retry::RetryPolicy;

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
