//! Client configuration and environment loading
//!
//! Defaults live in explicit constants and are injected through
//! [`ClientConfig`] rather than read from hidden process-wide state, so a
//! client under test can be configured without touching the environment.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::http::RetryPolicy;

/// Default per-attempt timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default number of attempts per logical request.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default base delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Environment variable holding the base URL prefixed to relative endpoints.
pub const ENV_BASE_URL: &str = "API_BASE_URL";

/// Environment variable overriding the default request timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "API_TIMEOUT_MS";

/// Immutable configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prefix for relative endpoints; absolute endpoints bypass it
    pub base_url: Option<Url>,
    /// Default per-attempt timeout
    pub timeout: Duration,
    /// Default retry policy
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for relative endpoints.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the default per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file when one is present, then `API_BASE_URL` and
    /// `API_TIMEOUT_MS`. Malformed values fail fast with [`ConfigError`];
    /// absent values fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let base_url = match env::var(ENV_BASE_URL) {
            Ok(raw) if !raw.trim().is_empty() => {
                let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
                    value: raw.clone(),
                    source,
                })?;
                Some(url)
            }
            _ => None,
        };

        let timeout = match env::var(ENV_TIMEOUT_MS) {
            Ok(raw) => {
                let millis: u64 =
                    raw.trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidEnvVar {
                            var: ENV_TIMEOUT_MS.to_string(),
                            message: format!(
                                "expected a positive integer of milliseconds, got {raw:?}"
                            ),
                        })?;
                if millis == 0 {
                    return Err(ConfigError::InvalidEnvVar {
                        var: ENV_TIMEOUT_MS.to_string(),
                        message: "timeout must be positive".to_string(),
                    });
                }
                Duration::from_millis(millis)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            timeout,
            retry: RetryPolicy::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_millis(1_000));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_base_url(Url::parse("https://api.example.com").unwrap())
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::new(5, Duration::from_millis(200)));

        assert_eq!(
            config.base_url.as_ref().map(|u| u.as_str()),
            Some("https://api.example.com/")
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.attempts, 5);
    }

    // All environment manipulation lives in one test: parallel tests sharing
    // process-wide env vars would otherwise race.
    #[test]
    fn test_from_env() {
        let original_base = env::var(ENV_BASE_URL).ok();
        let original_timeout = env::var(ENV_TIMEOUT_MS).ok();

        env::remove_var(ENV_BASE_URL);
        env::remove_var(ENV_TIMEOUT_MS);
        let config = ClientConfig::from_env().unwrap();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        env::set_var(ENV_BASE_URL, "https://api.example.com");
        env::set_var(ENV_TIMEOUT_MS, "5000");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(
            config.base_url.as_ref().map(|u| u.as_str()),
            Some("https://api.example.com/")
        );
        assert_eq!(config.timeout, Duration::from_millis(5_000));

        env::set_var(ENV_BASE_URL, "not a url");
        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));

        env::set_var(ENV_BASE_URL, "https://api.example.com");
        env::set_var(ENV_TIMEOUT_MS, "0");
        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));

        env::set_var(ENV_TIMEOUT_MS, "soon");
        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));

        match original_base {
            Some(value) => env::set_var(ENV_BASE_URL, value),
            None => env::remove_var(ENV_BASE_URL),
        }
        match original_timeout {
            Some(value) => env::set_var(ENV_TIMEOUT_MS, value),
            None => env::remove_var(ENV_TIMEOUT_MS),
        }
    }
}
