//! Retrying HTTP client shared by every provider adapter.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::transport::{HttpTransport, ReqwestTransport};
use crate::errors::{MarketDataError, RetryClass};
use crate::registry::RateLimiter;

/// Default attempt ceiling per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps a single outbound GET with rate limiting, retry and backoff.
///
/// Every attempt first waits on the shared [`RateLimiter`]. A 429 answer sleeps
/// for the provider's `Retry-After` hint (or the computed backoff when the
/// header is missing) and tries again. Network failures and other error
/// statuses back off by `base_delay * 2^attempt`. When all attempts are spent
/// the caller gets [`MarketDataError::RetriesExhausted`] carrying the last
/// error; nothing is raised past this boundary.
pub struct ResilientClient {
    transport: Arc<dyn HttpTransport>,
    rate_limiter: Arc<RateLimiter>,
    max_attempts: u32,
    base_delay: Duration,
}

impl ResilientClient {
    pub fn new(transport: Arc<dyn HttpTransport>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            transport,
            rate_limiter,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Client over a real `reqwest` transport.
    pub fn with_reqwest(rate_limiter: Arc<RateLimiter>) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), rate_limiter)
    }

    /// Override the retry policy. An attempt ceiling of zero is treated as one.
    pub fn with_retry_policy(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// GET `url` with `params`, returning the response body on a 2xx answer.
    pub async fn fetch(
        &self,
        provider: &str,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<String, MarketDataError> {
        let mut last_error: Option<MarketDataError> = None;

        for attempt in 0..self.max_attempts {
            self.rate_limiter.wait(provider).await;
            debug!("{} request: {} ({} params)", provider, url, params.len());

            let error = match self.transport.get(provider, url, params, timeout).await {
                Ok(response) if response.status == 429 => {
                    let wait = response
                        .retry_after
                        .map(Duration::from_secs)
                        .unwrap_or_else(|| self.backoff(attempt));
                    warn!("{} rate limited, waiting {:?}", provider, wait);
                    last_error = Some(MarketDataError::RateLimited {
                        provider: provider.to_string(),
                    });
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => MarketDataError::HttpStatus {
                    provider: provider.to_string(),
                    status: response.status,
                },
                Err(e) => e,
            };

            if error.retry_class() != RetryClass::WithBackoff {
                return Err(error);
            }

            if attempt + 1 < self.max_attempts {
                let delay = self.backoff(attempt);
                warn!(
                    "{} request failed (attempt {}), retrying in {:?}: {}",
                    provider,
                    attempt + 1,
                    delay,
                    error
                );
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        error!(
            "{} request failed after {} attempts: {}",
            provider, self.max_attempts, last_error
        );

        Err(MarketDataError::RetriesExhausted {
            provider: provider.to_string(),
            attempts: self.max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Transport replaying a fixed script of outcomes.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, MarketDataError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<HttpResponse, MarketDataError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(
            &self,
            provider: &str,
            _url: &str,
            _params: &[(&str, String)],
            _timeout: Duration,
        ) -> Result<HttpResponse, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(MarketDataError::Network {
                        provider: provider.to_string(),
                        message: "script exhausted".to_string(),
                    })
                })
        }
    }

    fn status(code: u16, retry_after: Option<u64>) -> Result<HttpResponse, MarketDataError> {
        Ok(HttpResponse {
            status: code,
            retry_after,
            body: String::new(),
        })
    }

    fn network() -> Result<HttpResponse, MarketDataError> {
        Err(MarketDataError::Network {
            provider: "OKX".to_string(),
            message: "connection reset".to_string(),
        })
    }

    fn client(transport: Arc<ScriptedTransport>) -> ResilientClient {
        let limiter = Arc::new(RateLimiter::new());
        limiter.configure("OKX", Duration::ZERO);
        ResilientClient::new(transport, limiter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::ok("{}"))]);
        let client = client(transport.clone());

        let body = client.fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT).await;
        assert_eq!(body.unwrap(), "{}");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_backs_off_then_succeeds() {
        let transport = ScriptedTransport::new(vec![network(), network(), Ok(HttpResponse::ok("ok"))]);
        let client = client(transport.clone());

        let start = Instant::now();
        let body = client.fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT).await;
        assert_eq!(body.unwrap(), "ok");
        assert_eq!(transport.calls(), 3);
        // 1s after the first failure, 2s after the second
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_carry_last_error() {
        let transport = ScriptedTransport::new(vec![network(), network(), status(503, None)]);
        let client = client(transport.clone());

        let err = client
            .fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(transport.calls(), 3);
        match err {
            MarketDataError::RetriesExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_error, "HTTP 503 from OKX");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_honors_retry_after() {
        let transport = ScriptedTransport::new(vec![status(429, Some(7)), Ok(HttpResponse::ok("ok"))]);
        let client = client(transport.clone());

        let start = Instant::now();
        let body = client.fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT).await;
        assert_eq!(body.unwrap(), "ok");
        assert!(start.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_without_header_uses_backoff() {
        let transport = ScriptedTransport::new(vec![
            status(429, None),
            status(429, None),
            Ok(HttpResponse::ok("ok")),
        ]);
        let client = client(transport.clone());

        let start = Instant::now();
        let body = client.fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT).await;
        assert_eq!(body.unwrap(), "ok");
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_immediately() {
        let transport = ScriptedTransport::new(vec![Err(MarketDataError::malformed("OKX", "bad"))]);
        let client = client(transport.clone());

        let err = client
            .fetch("OKX", "http://x", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(transport.calls(), 1);
        assert_eq!(err.retry_class(), RetryClass::NextProvider);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_attempt_waits_on_rate_limiter() {
        let transport = ScriptedTransport::new(vec![network(), Ok(HttpResponse::ok("ok"))]);
        let limiter = Arc::new(RateLimiter::new());
        limiter.configure("COINGECKO", Duration::from_secs(10));
        let client = ResilientClient::new(transport.clone(), limiter)
            .with_retry_policy(3, Duration::from_millis(1));

        let start = Instant::now();
        client
            .fetch("COINGECKO", "http://x", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
