//! CoinGecko market data provider implementation.
//!
//! This module provides aggregated market data from the CoinGecko public API:
//! - Batch prices via /simple/price
//! - Market summary via /coins/{id}
//! - Historical price and volume series via /coins/{id}/market_chart
//!
//! The free tier is strict about request rates, so this provider sits near
//! the end of the priority order and is spaced 10s apart.
//! API documentation: https://docs.coingecko.com/reference/introduction

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::http::ResilientClient;
use crate::models::{normalize_history, Asset, HistoricalPrice, MarketSummary, PricePoint};
use crate::provider::parse;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";
const TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API Response Structures
// ============================================================================

/// Per-coin entry of /simple/price
#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Value,
    #[serde(default)]
    usd_24h_change: Option<Value>,
}

/// Response from /coins/{id}
#[derive(Debug, Deserialize)]
struct CoinResponse {
    market_data: MarketData,
}

/// Currency-keyed values such as `{"usd": 97000.0, "eur": ...}`
type ByCurrency = HashMap<String, Value>;

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: ByCurrency,
    #[serde(default)]
    market_cap: ByCurrency,
    #[serde(default)]
    total_volume: ByCurrency,
    #[serde(default)]
    high_24h: ByCurrency,
    #[serde(default)]
    low_24h: ByCurrency,
    #[serde(default)]
    price_change_percentage_24h: Option<Value>,
    #[serde(default)]
    price_change_percentage_7d: Option<Value>,
}

/// Response from /coins/{id}/market_chart; each point is `[ms, value]`
#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<Vec<Value>>,
    #[serde(default)]
    total_volumes: Vec<Vec<Value>>,
}

// ============================================================================
// CoinGeckoProvider
// ============================================================================

/// CoinGecko aggregator provider.
pub struct CoinGeckoProvider {
    client: Arc<ResilientClient>,
}

impl CoinGeckoProvider {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);
        self.client.fetch(PROVIDER_ID, &url, params, TIMEOUT).await
    }

    fn usd(values: &ByCurrency) -> Option<Decimal> {
        parse::decimal_opt(PROVIDER_ID, values.get("usd"))
    }

    /// `[ms, value]` chart point.
    fn chart_point(point: &[Value]) -> Option<(i64, Decimal)> {
        let timestamp = parse::timestamp(PROVIDER_ID, point.first()?).ok()?;
        let value = parse::decimal(PROVIDER_ID, point.get(1)?).ok()?;
        Some((timestamp, value))
    }

    /// Pair each price point with the volume reported at the same timestamp.
    fn merge_chart(chart: MarketChart) -> Vec<HistoricalPrice> {
        let volumes: HashMap<i64, Decimal> = chart
            .total_volumes
            .iter()
            .filter_map(|point| Self::chart_point(point))
            .collect();

        let points: Vec<HistoricalPrice> = chart
            .prices
            .iter()
            .filter_map(|point| Self::chart_point(point))
            .map(|(timestamp, price)| HistoricalPrice {
                timestamp,
                price,
                volume: volumes.get(&timestamp).copied(),
            })
            .collect();

        let skipped = chart.prices.len() - points.len();
        if skipped > 0 {
            warn!("CoinGecko: skipped {} malformed chart points", skipped);
        }
        normalize_history(points)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        4
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            prices: true,
            candles: false,
            summary: true,
            history: true,
            intervals: &[],
            min_interval: Duration::from_secs(10),
        }
    }

    fn symbol(&self, asset: Asset) -> Option<&'static str> {
        Some(match asset {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Sol => "solana",
            Asset::Bnb => "binancecoin",
            Asset::Xrp => "ripple",
            Asset::Doge => "dogecoin",
        })
    }

    async fn current_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PricePoint>, MarketDataError> {
        let mapped: Vec<(Asset, &'static str)> = assets
            .iter()
            .filter_map(|&a| self.symbol(a).map(|id| (a, id)))
            .collect();
        if mapped.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<&str> = mapped.iter().map(|(_, id)| *id).collect();
        let body = self
            .fetch(
                "/simple/price",
                &[
                    ("ids", ids.join(",")),
                    ("vs_currencies", "usd".to_string()),
                    ("include_24hr_change", "true".to_string()),
                ],
            )
            .await?;
        let data: HashMap<String, SimplePrice> = parse::json(PROVIDER_ID, &body)?;

        let mut prices = HashMap::new();
        for (asset, id) in mapped {
            let Some(entry) = data.get(id) else {
                continue;
            };
            let price = parse::decimal(PROVIDER_ID, &entry.usd)?;
            let change = parse::decimal_opt(PROVIDER_ID, entry.usd_24h_change.as_ref())
                .unwrap_or_default();
            prices.insert(asset, PricePoint::new(asset, price, change, PROVIDER_ID));
        }

        debug!("CoinGecko: got prices for {:?}", prices.keys().collect::<Vec<_>>());
        Ok(prices)
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let id = self.require_symbol(asset)?;
        let body = self
            .fetch(
                &format!("/coins/{}", id),
                &[
                    ("localization", "false".to_string()),
                    ("tickers", "false".to_string()),
                    ("community_data", "false".to_string()),
                    ("developer_data", "false".to_string()),
                ],
            )
            .await?;
        let coin: CoinResponse = parse::json(PROVIDER_ID, &body)?;
        let data = coin.market_data;

        let price = Self::usd(&data.current_price)
            .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "missing current_price.usd"))?;

        let mut summary = MarketSummary::new(asset, price, PROVIDER_ID);
        summary.market_cap = Self::usd(&data.market_cap);
        summary.volume_24h = Self::usd(&data.total_volume);
        summary.high_24h = Self::usd(&data.high_24h);
        summary.low_24h = Self::usd(&data.low_24h);
        summary.change_24h =
            parse::decimal_opt(PROVIDER_ID, data.price_change_percentage_24h.as_ref());
        summary.change_7d =
            parse::decimal_opt(PROVIDER_ID, data.price_change_percentage_7d.as_ref());
        Ok(summary)
    }

    async fn price_history(
        &self,
        asset: Asset,
        days: u32,
    ) -> Result<Vec<HistoricalPrice>, MarketDataError> {
        let id = self.require_symbol(asset)?;
        let body = self
            .fetch(
                &format!("/coins/{}/market_chart", id),
                &[
                    ("vs_currency", "usd".to_string()),
                    ("days", days.max(1).to_string()),
                ],
            )
            .await?;
        let chart: MarketChart = parse::json(PROVIDER_ID, &body)?;
        let points = Self::merge_chart(chart);

        debug!("CoinGecko: fetched {} history points for {} ({}d)", points.len(), asset, days);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{client, RouteTransport};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_current_prices() {
        let body = r#"{
            "bitcoin": {"usd": 97123.5, "usd_24h_change": 1.25},
            "ripple": {"usd": 2.31}
        }"#;
        let transport = RouteTransport::new(vec![("/simple/price", body.to_string())]);
        let provider = CoinGeckoProvider::new(client(transport.clone()));

        let prices = provider
            .current_prices(&[Asset::Btc, Asset::Xrp, Asset::Doge])
            .await
            .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&Asset::Btc].price, dec!(97123.5));
        assert_eq!(prices[&Asset::Btc].change_24h, dec!(1.25));
        assert_eq!(prices[&Asset::Xrp].change_24h, dec!(0));
        assert_eq!(
            transport.param(0, "ids").as_deref(),
            Some("bitcoin,ripple,dogecoin")
        );
    }

    #[tokio::test]
    async fn test_market_summary() {
        let body = r#"{"id":"ethereum","market_data":{
            "current_price":{"usd":3600.5,"eur":3300},
            "market_cap":{"usd":430000000000},
            "total_volume":{"usd":15000000000},
            "high_24h":{"usd":3650},
            "low_24h":{"usd":3500},
            "price_change_percentage_24h":2.1,
            "price_change_percentage_7d":-4.2
        }}"#;
        let transport = RouteTransport::new(vec![("/coins/ethereum", body.to_string())]);
        let provider = CoinGeckoProvider::new(client(transport));

        let summary = provider.market_summary(Asset::Eth).await.unwrap();
        assert_eq!(summary.price, dec!(3600.5));
        assert_eq!(summary.market_cap, Some(dec!(430000000000)));
        assert_eq!(summary.change_7d, Some(dec!(-4.2)));
        assert_eq!(summary.source, "COINGECKO");
    }

    #[tokio::test]
    async fn test_price_history_joins_volumes() {
        let body = r#"{
            "prices": [[1700000120000, 102.0], [1700000000000, 100.0], [1700000060000, 101.0]],
            "market_caps": [],
            "total_volumes": [[1700000000000, 5000.0], [1700000060000, 5100.0]]
        }"#;
        let transport = RouteTransport::new(vec![("/market_chart", body.to_string())]);
        let provider = CoinGeckoProvider::new(client(transport.clone()));

        let history = provider.price_history(Asset::Sol, 60).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].timestamp, 1_700_000_000_000);
        assert_eq!(history[0].volume, Some(dec!(5000)));
        assert_eq!(history[2].volume, None);
        assert_eq!(transport.param(0, "days").as_deref(), Some("60"));
    }

    #[tokio::test]
    async fn test_candles_not_supported() {
        let provider = CoinGeckoProvider::new(client(RouteTransport::new(vec![])));
        let err = provider
            .candles(Asset::Btc, crate::models::Interval::Hour1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::NotSupported { .. }));
    }
}
