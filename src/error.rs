//! Error types for the apix client
//!
//! Every per-request failure funnels into [`ApiError`] before reaching the
//! caller; configuration problems surface as [`ConfigError`] at startup and
//! never as part of the per-request flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Normalized request failure surfaced to callers.
///
/// `status` is the HTTP status code of the final response, with two reserved
/// values: `0` for non-HTTP transport failures and `408` for a client-side
/// timeout. Callers branch on `status` directly rather than on error types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,
    /// HTTP status code; 0 = network failure, 408 = client-side timeout
    pub status: u16,
    /// Status text of the response, or a synthetic label
    pub status_text: String,
    /// Decoded response payload, if any
    pub data: Option<Value>,
}

impl ApiError {
    /// Build an error from a non-success HTTP status.
    ///
    /// Well-known statuses map to a fixed message table; anything else falls
    /// back to `"Error {status}: {status_text}"`.
    pub fn from_status(status: u16, status_text: &str, data: Option<Value>) -> Self {
        let message = match status_message(status) {
            Some(message) => message.to_string(),
            None => format!("Error {status}: {status_text}"),
        };
        Self {
            message,
            status,
            status_text: status_text.to_string(),
            data,
        }
    }

    /// Client-side timeout: the attempt was aborted before a response arrived.
    pub fn timeout() -> Self {
        Self {
            message: "Request timed out".to_string(),
            status: 408,
            status_text: "Request Timeout".to_string(),
            data: None,
        }
    }

    /// Unclassified network or transport failure, preserving the original
    /// message when one is available.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 0,
            status_text: "Network Error".to_string(),
            data: None,
        }
    }

    /// True when the request was aborted by the client-side timeout.
    pub fn is_timeout(&self) -> bool {
        self.status == 408
    }

    /// True when no HTTP response was involved in the failure.
    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    /// True when the server answered with a 4xx status.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// True when the server answered with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Fixed message table for well-known statuses.
fn status_message(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Invalid request"),
        401 => Some("Unauthorized. Please log in again."),
        403 => Some("Access denied"),
        404 => Some("Resource not found"),
        500 => Some("Internal server error"),
        502 => Some("Server temporarily unavailable"),
        503 => Some("Service temporarily unavailable"),
        _ => None,
    }
}

/// Errors raised while loading configuration or constructing the client.
///
/// These are fatal at startup; a process with a malformed environment should
/// not get as far as issuing requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured base URL is not a well-formed URL
    #[error("Invalid base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// An environment variable holds a value of the wrong shape
    #[error("Invalid value for {var}: {message}")]
    InvalidEnvVar { var: String, message: String },

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
