//! # HTTP Client Utilities
//!
//! Shared HTTP client for provider implementations.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - A client-wide timeout as a safety net
//! - Per-request deadline and cancellation taken from a [`QueryContext`]
//! - JSON deserialization
//! - Status code to [`ProviderError`] mapping
//!
//! # Examples
//!
//! ```ignore
//! use lookup_race::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.get("https://api.example.com/endpoint", &ctx).await?;
//! ```

use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default client-wide timeout in milliseconds.
pub const DEFAULT_CLIENT_TIMEOUT_MS: u64 = 5000;

/// HTTP client wrapper for providers.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Client-wide timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified client-wide timeout.
    ///
    /// Individual requests are additionally bounded by the deadline of the
    /// [`QueryContext`] they run under.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("lookup-race/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured client-wide timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// The request is abandoned, and its connection dropped, when the
    /// context deadline passes or the context is cancelled.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Cancelled` if `ctx` is cancelled first.
    /// - `ProviderError::Timeout` if the deadline passes first.
    /// - `ProviderError::Connection` if the request fails.
    /// - `ProviderError::Decode` if the response cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str, ctx: &QueryContext) -> ProviderResult<T> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;
            self.handle_response(response).await
        };

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(ProviderError::Cancelled),
            result = tokio::time::timeout_at(ctx.deadline().instant(), request) => {
                result.unwrap_or_else(|_| Err(ProviderError::timeout(format!("deadline exceeded for {}", url))))
            }
        }
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Err(ProviderError::empty_response("response body is empty"));
            }
            serde_json::from_slice::<T>(&body)
                .map_err(|e| ProviderError::decode(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    /// Maps a reqwest error to a ProviderError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout("Request timed out")
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps an HTTP status code to a ProviderError.
    fn map_status_error(&self, status: StatusCode, body: &str) -> ProviderError {
        match status {
            StatusCode::NOT_FOUND => ProviderError::not_found(format!("Resource not found: {}", body)),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("Rate limit exceeded"),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(format!("Upstream timeout ({})", status))
            }
            _ => ProviderError::status(status.as_u16(), body.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: String,
    }

    fn ctx(ms: u64) -> QueryContext {
        QueryContext::with_timeout(Duration::from_millis(ms))
    }

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn get_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value":"x"}"#))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let payload: Payload = client
            .get(&format!("{}/ok", server.uri()), &ctx(2000))
            .await
            .unwrap();
        assert_eq!(payload.value, "x");
    }

    #[tokio::test]
    async fn get_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let result: ProviderResult<Payload> = client.get(&server.uri(), &ctx(2000)).await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn get_maps_server_error_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let result: ProviderResult<Payload> = client.get(&server.uri(), &ctx(2000)).await;
        assert_eq!(result.unwrap_err().status_code(), Some(500));
    }

    #[tokio::test]
    async fn get_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let result: ProviderResult<Payload> = client.get(&server.uri(), &ctx(2000)).await;
        assert!(matches!(result, Err(ProviderError::Decode { .. })));
    }

    #[tokio::test]
    async fn get_rejects_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let result: ProviderResult<Payload> = client.get(&server.uri(), &ctx(2000)).await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn get_honours_context_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"value":"late"}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let started = std::time::Instant::now();
        let result: ProviderResult<Payload> = client.get(&server.uri(), &ctx(50)).await;

        assert!(matches!(result, Err(ProviderError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn get_returns_cancelled_when_context_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let context = ctx(2000);
        let canceller = context.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result: ProviderResult<Payload> = client.get(&server.uri(), &context).await;
        assert_eq!(result.unwrap_err(), ProviderError::Cancelled);
    }
}
