//! Fake transport for adapter tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::http::{HttpResponse, HttpTransport, ResilientClient};
use crate::registry::RateLimiter;

/// Answers each request with the body of the first route whose path
/// fragment is contained in the URL; unrouted URLs get a 404.
pub(crate) struct RouteTransport {
    routes: Vec<(&'static str, String)>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RouteTransport {
    pub(crate) fn new(routes: Vec<(&'static str, String)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// URLs and query params seen so far.
    pub(crate) fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn param(&self, index: usize, name: &str) -> Option<String> {
        self.requests()
            .get(index)?
            .1
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl HttpTransport for RouteTransport {
    async fn get(
        &self,
        _provider: &str,
        url: &str,
        params: &[(&str, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, MarketDataError> {
        self.requests.lock().unwrap().push((
            url.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        let response = self
            .routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment))
            .map(|(_, body)| HttpResponse::ok(body.clone()))
            .unwrap_or(HttpResponse {
                status: 404,
                retry_after: None,
                body: String::new(),
            });
        Ok(response)
    }
}

/// Resilient client over `transport` with no spacing and a single attempt.
pub(crate) fn client(transport: Arc<RouteTransport>) -> Arc<ResilientClient> {
    let limiter = Arc::new(RateLimiter::new());
    for provider in ["OKX", "GATEIO", "BINANCE", "COINGECKO", "COINCAP"] {
        limiter.configure(provider, Duration::ZERO);
    }
    Arc::new(ResilientClient::new(transport, limiter).with_retry_policy(1, Duration::ZERO))
}
