//! # HTTP Client Utilities
//!
//! Shared HTTP client wrapper for source adapters.
//!
//! This module provides a reusable client with:
//! - A default timeout, overridable per request
//! - Per-request header sets, so adapters never share mutable request state
//! - Mapping of transport and status failures to [`SourceError`]
//!
//! # Examples
//!
//! ```ignore
//! use fx_quotes::infrastructure::sources::http_client::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::new(30_000)?;
//! let html = client.get_text(url, Duration::from_secs(10), HeaderMap::new()).await?;
//! ```

use crate::infrastructure::sources::error::{SourceError, SourceResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Browser-like user agent; some sources refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/120.0.0.0 Safari/537.36"
);

/// HTTP client wrapper for source adapters.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Default request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified default timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> SourceResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        Self::with_headers(timeout_ms, headers)
    }

    /// Creates a new HTTP client with custom default headers.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Internal` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| SourceError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the default timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Timeout` or `SourceError::Connection` if the request fails,
    /// or a status-derived error for non-2xx responses.
    pub async fn get_text(
        &self,
        url: &str,
        timeout: Duration,
        headers: HeaderMap,
    ) -> SourceResult<String> {
        let response = self.send_get(url, timeout, headers).await?;
        let response = self.check_status(response).await?;

        response
            .text()
            .await
            .map_err(|e| SourceError::protocol(format!("Failed to read response body: {}", e)))
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Timeout` or `SourceError::Connection` if the request fails.
    /// Returns `SourceError::Protocol` if the response cannot be parsed.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
        headers: HeaderMap,
    ) -> SourceResult<T> {
        let response = self.send_get(url, timeout, headers).await?;
        let response = self.check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::protocol(format!("Failed to parse response: {}", e)))
    }

    async fn send_get(
        &self,
        url: &str,
        timeout: Duration,
        headers: HeaderMap,
    ) -> SourceResult<Response> {
        self.client
            .get(url)
            .timeout(timeout)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, timeout))
    }

    async fn check_status(&self, response: Response) -> SourceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_body = response.text().await.unwrap_or_default();
        Err(self.map_status_error(status, &error_body))
    }

    /// Maps a reqwest error to a SourceError.
    fn map_reqwest_error(&self, error: reqwest::Error, timeout: Duration) -> SourceError {
        if error.is_timeout() {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            SourceError::timeout_with_duration("Request timed out", timeout_ms)
        } else if error.is_connect() {
            SourceError::connection(format!("Connection failed: {}", error))
        } else {
            SourceError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps an HTTP status code to a SourceError.
    fn map_status_error(&self, status: StatusCode, body: &str) -> SourceError {
        let body = truncate(body, 200);
        match status {
            StatusCode::TOO_MANY_REQUESTS => SourceError::rate_limited("Rate limit exceeded"),
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                SourceError::connection(format!("Server error ({}): {}", status, body))
            }
            _ => SourceError::protocol(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

fn truncate(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => body.get(..idx).unwrap_or(body),
        None => body,
    }
}
