//! CoinCap market data provider implementation.
//!
//! - Batch prices via /assets?ids=
//! - Market summary via /assets/{id}
//! - Historical prices via /assets/{id}/history
//!
//! CoinCap returns every number as a string and has no geo restrictions,
//! which makes it the last resort in the priority order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::http::ResilientClient;
use crate::models::{normalize_history, Asset, HistoricalPrice, MarketSummary, PricePoint};
use crate::provider::parse;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://api.coincap.io/v2";
const PROVIDER_ID: &str = "COINCAP";
const TIMEOUT: Duration = Duration::from_secs(10);

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetData {
    id: String,
    price_usd: Option<String>,
    #[serde(default)]
    change_percent24_hr: Option<String>,
    #[serde(default)]
    market_cap_usd: Option<String>,
    #[serde(default)]
    volume_usd24_hr: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryPoint {
    price_usd: String,
    /// Epoch milliseconds
    time: i64,
}

// ============================================================================
// CoinCapProvider
// ============================================================================

/// CoinCap aggregator provider.
pub struct CoinCapProvider {
    client: Arc<ResilientClient>,
}

impl CoinCapProvider {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);
        self.client.fetch(PROVIDER_ID, &url, params, TIMEOUT).await
    }

    /// Sampling interval for a history window: 5 minutes up to a day,
    /// hourly up to a week, twice daily beyond.
    fn history_interval(days: u32) -> &'static str {
        match days {
            0..=1 => "m5",
            2..=7 => "h1",
            _ => "h12",
        }
    }

    fn price_of(asset: &AssetData) -> Result<Decimal, MarketDataError> {
        let text = asset
            .price_usd
            .as_deref()
            .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "missing priceUsd"))?;
        parse::decimal_str(PROVIDER_ID, text)
    }
}

#[async_trait]
impl MarketDataProvider for CoinCapProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        5
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            prices: true,
            candles: false,
            summary: true,
            history: true,
            intervals: &[],
            min_interval: Duration::from_secs(1),
        }
    }

    fn symbol(&self, asset: Asset) -> Option<&'static str> {
        Some(match asset {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Sol => "solana",
            Asset::Bnb => "binance-coin",
            Asset::Xrp => "xrp",
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
        let body = self.fetch("/assets", &[("ids", ids.join(","))]).await?;
        let envelope: Envelope<Vec<AssetData>> = parse::json(PROVIDER_ID, &body)?;

        let mut prices = HashMap::new();
        for data in &envelope.data {
            let Some(&(asset, _)) = mapped.iter().find(|(_, id)| *id == data.id) else {
                continue;
            };
            match Self::price_of(data) {
                Ok(price) => {
                    let change = parse::decimal_text(PROVIDER_ID, data.change_percent24_hr.as_deref())
                        .unwrap_or_default();
                    prices.insert(asset, PricePoint::new(asset, price, change, PROVIDER_ID));
                }
                Err(e) => warn!("CoinCap: skipping {}: {}", data.id, e),
            }
        }

        debug!("CoinCap: got prices for {:?}", prices.keys().collect::<Vec<_>>());
        Ok(prices)
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let id = self.require_symbol(asset)?;
        let body = self.fetch(&format!("/assets/{}", id), &[]).await?;
        let envelope: Envelope<AssetData> = parse::json(PROVIDER_ID, &body)?;
        let data = envelope.data;

        // CoinCap publishes neither a 7d change nor a 24h range.
        let mut summary = MarketSummary::new(asset, Self::price_of(&data)?, PROVIDER_ID);
        summary.market_cap = parse::decimal_text(PROVIDER_ID, data.market_cap_usd.as_deref());
        summary.volume_24h = parse::decimal_text(PROVIDER_ID, data.volume_usd24_hr.as_deref());
        summary.change_24h = parse::decimal_text(PROVIDER_ID, data.change_percent24_hr.as_deref());
        Ok(summary)
    }

    async fn price_history(
        &self,
        asset: Asset,
        days: u32,
    ) -> Result<Vec<HistoricalPrice>, MarketDataError> {
        let id = self.require_symbol(asset)?;
        let end = Utc::now().timestamp_millis();
        let start = end - i64::from(days.max(1)) * DAY_MS;

        let body = self
            .fetch(
                &format!("/assets/{}/history", id),
                &[
                    ("interval", Self::history_interval(days).to_string()),
                    ("start", start.to_string()),
                    ("end", end.to_string()),
                ],
            )
            .await?;
        let envelope: Envelope<Vec<HistoryPoint>> = parse::json(PROVIDER_ID, &body)?;

        let points = envelope
            .data
            .iter()
            .map(|p| {
                Ok(HistoricalPrice {
                    timestamp: p.time,
                    price: parse::decimal_str(PROVIDER_ID, &p.price_usd)?,
                    volume: None,
                })
            })
            .collect::<Result<Vec<_>, MarketDataError>>()?;

        debug!("CoinCap: fetched {} history points for {} ({}d)", points.len(), asset, days);
        Ok(normalize_history(points))
    }
}
