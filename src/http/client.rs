//! The request client: URL resolution, header assembly, timeout and retry
//! composition, and content-type-aware response decoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};

use super::auth::{NoAuth, TokenProvider};
use super::request::RequestConfig;
use super::retry::{execute_with_retry, AttemptError};

/// Decoded response body: structured JSON or raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// View the body as a JSON value; raw text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Body::Json(value) => value,
            Body::Text(text) => Value::String(text),
        }
    }
}

/// HTTP request client with bounded timeout and bounded retry.
///
/// Each call is an independent unit of work: configuration is resolved per
/// call, the timeout timer and retry state are owned by the call, and no
/// state is shared between concurrent requests. Failure always surfaces as
/// [`ApiError`]; callers never observe raw transport errors.
#[derive(Clone)]
pub struct ApiClient {
    http: ReqwestClient,
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a client with the given configuration and no token source.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = ReqwestClient::builder()
            .build()
            .map_err(ConfigError::ClientBuild)?;
        Ok(Self {
            http,
            config,
            tokens: Arc::new(NoAuth),
        })
    }

    /// Create a client from environment-derived configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Replace the token source.
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET request decoding the response into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None, config).await
    }

    /// DELETE request decoding the response into `T`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, None, config).await
    }

    /// POST request serializing `body` as JSON.
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serialize_body(body)?;
        self.request(Method::POST, endpoint, Some(payload), config)
            .await
    }

    /// PUT request serializing `body` as JSON.
    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serialize_body(body)?;
        self.request(Method::PUT, endpoint, Some(payload), config)
            .await
    }

    /// PATCH request serializing `body` as JSON.
    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serialize_body(body)?;
        self.request(Method::PATCH, endpoint, Some(payload), config)
            .await
    }

    /// Perform a request and decode the successful response into `T`.
    ///
    /// A raw-text response body decodes into `T = String`; JSON bodies
    /// decode into any matching `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        let decoded = self.execute(method, endpoint, body, &config).await?;
        serde_json::from_value(decoded.into_value())
            .map_err(|error| ApiError::network(format!("Failed to decode response body: {error}")))
    }

    /// Execute a request, returning the decoded body of a successful
    /// response or the normalized error.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        config: &RequestConfig,
    ) -> Result<Body, ApiError> {
        let url = self.resolve_url(endpoint);
        let headers = self.build_headers(config);
        let timeout = config.effective_timeout(&self.config);
        let retry = config.effective_retry(&self.config);

        debug!(%method, %url, attempts = retry.attempts, "sending request");

        let response = execute_with_retry(
            || self.attempt(method.clone(), &url, &headers, body.as_ref(), timeout),
            &retry,
        )
        .await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let decoded = decode_body(response).await?;

        if !status.is_success() {
            return Err(ApiError::from_status(
                status.as_u16(),
                &status_text,
                Some(decoded.into_value()),
            ));
        }
        Ok(decoded)
    }

    /// One attempt under its timeout budget.
    ///
    /// The timer and the in-flight request are dropped together on every
    /// exit path, so an aborted attempt leaves no lingering work.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        headers: &HeaderMap,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Response, AttemptError> {
        let mut request = self.http.request(method, url).headers(headers.clone());
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        match tokio::time::timeout(timeout, request.send()).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(AttemptError::Transport(error)),
            Err(_) => Err(AttemptError::Timeout),
        }
    }

    /// Absolute endpoints are used verbatim; relative endpoints are prefixed
    /// with the configured base URL.
    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        match &self.config.base_url {
            Some(base) => format!("{}{}", base.as_str().trim_end_matches('/'), endpoint),
            None => endpoint.to_string(),
        }
    }

    /// Merge caller headers with the content-type default and, when a token
    /// is available, the bearer authorization header. With `skip_auth` the
    /// caller's headers are sent untouched.
    fn build_headers(&self, config: &RequestConfig) -> HeaderMap {
        let mut headers = config.headers.clone();
        if config.skip_auth {
            return headers;
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.tokens.token() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}

fn serialize_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|error| ApiError::network(format!("Failed to serialize request body: {error}")))
}

/// Decode a response body according to its declared content type.
async fn decode_body(response: Response) -> Result<Body, ApiError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        response
            .json::<Value>()
            .await
            .map(Body::Json)
            .map_err(|error| ApiError::network(format!("Failed to decode JSON response: {error}")))
    } else {
        response
            .text()
            .await
            .map(Body::Text)
            .map_err(|error| ApiError::network(format!("Failed to read response body: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::StaticToken;
    use serde_json::json;
    use url::Url;

    fn client_with_base(base: &str) -> ApiClient {
        let config = ClientConfig::new().with_base_url(Url::parse(base).unwrap());
        ApiClient::new(config).unwrap()
    }

    #[test]
    fn test_resolve_url_relative() {
        let client = client_with_base("https://api.example.com");
        assert_eq!(
            client.resolve_url("/todos"),
            "https://api.example.com/todos"
        );
    }

    #[test]
    fn test_resolve_url_base_trailing_slash() {
        let client = client_with_base("https://api.example.com/");
        assert_eq!(
            client.resolve_url("/todos"),
            "https://api.example.com/todos"
        );
    }

    #[test]
    fn test_resolve_url_absolute_bypasses_base() {
        let client = client_with_base("https://api.example.com");
        assert_eq!(
            client.resolve_url("https://other.example.com/x"),
            "https://other.example.com/x"
        );
        assert_eq!(
            client.resolve_url("http://other.example.com/x"),
            "http://other.example.com/x"
        );
    }

    #[test]
    fn test_resolve_url_without_base() {
        let client = ApiClient::new(ClientConfig::new()).unwrap();
        assert_eq!(client.resolve_url("/todos"), "/todos");
    }

    #[test]
    fn test_build_headers_sets_content_type_and_bearer() {
        let client = client_with_base("https://api.example.com")
            .with_token_provider(Arc::new(StaticToken::new("token-123")));

        let headers = client.build_headers(&RequestConfig::new());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token-123");
    }

    #[test]
    fn test_build_headers_without_token() {
        let client = client_with_base("https://api.example.com");
        let headers = client.build_headers(&RequestConfig::new());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_build_headers_skip_auth_leaves_headers_untouched() {
        let client = client_with_base("https://api.example.com")
            .with_token_provider(Arc::new(StaticToken::new("token-123")));

        let config = RequestConfig::new().with_skip_auth(true).with_header(
            reqwest::header::HeaderName::from_static("x-custom"),
            HeaderValue::from_static("1"),
        );
        let headers = client.build_headers(&config);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(CONTENT_TYPE).is_none());
        assert_eq!(headers.get("x-custom").unwrap(), "1");
    }

    #[test]
    fn test_build_headers_preserves_custom_headers() {
        let client = client_with_base("https://api.example.com");
        let config = RequestConfig::new().with_header(
            reqwest::header::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc"),
        );
        let headers = client.build_headers(&config);
        assert_eq!(headers.get("x-request-id").unwrap(), "abc");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_content_type_default_overrides_caller_value() {
        let client = client_with_base("https://api.example.com");
        let config = RequestConfig::new().with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain"),
        );
        let headers = client.build_headers(&config);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_body_into_value() {
        assert_eq!(
            Body::Json(json!({"a": 1})).into_value(),
            json!({"a": 1})
        );
        assert_eq!(
            Body::Text("plain".to_string()).into_value(),
            Value::String("plain".to_string())
        );
    }
}
