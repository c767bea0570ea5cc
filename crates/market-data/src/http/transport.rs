//! Raw HTTP transport used by the resilient client.
//!
//! The transport performs exactly one GET and reports what came back. Retry,
//! backoff and rate limiting live one layer up in [`ResilientClient`], which
//! lets tests swap the network for a scripted fake.
//!
//! [`ResilientClient`]: super::ResilientClient

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;

use crate::errors::MarketDataError;

/// Outcome of a single HTTP exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed `Retry-After` header, in seconds
    pub retry_after: Option<u64>,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-shot HTTP GET.
///
/// Implementations return `Err` only for transport failures (DNS, TLS,
/// connection reset, timeout). Any response with a status line, including
/// 4xx and 5xx, comes back as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(
        &self,
        provider: &str,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, MarketDataError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("coinfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        provider: &str,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, MarketDataError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: provider.to_string(),
                    }
                } else {
                    MarketDataError::Network {
                        provider: provider.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.map_err(|e| MarketDataError::Network {
            provider: provider.to_string(),
            message: format!("Failed to read response: {}", e),
        })?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}
