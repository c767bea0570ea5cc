//! Binance market data provider implementation.
//!
//! - 24h tickers via /ticker/24hr (batch `symbols` parameter)
//! - Klines via /klines (oldest first)
//!
//! Binance geo-blocks some regions with HTTP 451, which surfaces here as an
//! exhausted retry and sends the registry on to the next provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::http::ResilientClient;
use crate::models::{normalize_candles, Asset, Candle, Interval, MarketSummary, PricePoint};
use crate::provider::parse;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://api.binance.com/api/v3";
const PROVIDER_ID: &str = "BINANCE";
const TIMEOUT: Duration = Duration::from_secs(5);

/// Largest page /klines will serve.
const MAX_CANDLES: usize = 1000;

// ============================================================================
// API Response Structures
// ============================================================================

/// Entry of /ticker/24hr
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    symbol: String,
    last_price: String,
    price_change_percent: String,
    #[serde(default)]
    high_price: Option<String>,
    #[serde(default)]
    low_price: Option<String>,
    #[serde(default)]
    quote_volume: Option<String>,
}

// ============================================================================
// BinanceProvider
// ============================================================================

/// Binance spot market data provider.
pub struct BinanceProvider {
    client: Arc<ResilientClient>,
}

impl BinanceProvider {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);
        self.client.fetch(PROVIDER_ID, &url, params, TIMEOUT).await
    }

    /// `["BTCUSDT","ETHUSDT"]`, the JSON array form the batch endpoint expects.
    fn symbols_param(symbols: &[&str]) -> String {
        let quoted: Vec<String> = symbols.iter().map(|s| format!("\"{}\"", s)).collect();
        format!("[{}]", quoted.join(","))
    }

    fn parse_kline(row: &[Value]) -> Result<Candle, MarketDataError> {
        // [open time, o, h, l, c, volume, close time, quote volume, trades, ...]
        Ok(Candle::new(
            parse::timestamp(PROVIDER_ID, parse::field(PROVIDER_ID, row, 0)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 1)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 2)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 3)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 4)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 5)?)?,
        ))
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            prices: true,
            candles: true,
            summary: true,
            history: false,
            // Binance accepts the canonical codes verbatim.
            intervals: &Interval::ALL,
            min_interval: Duration::from_millis(500),
        }
    }

    fn symbol(&self, asset: Asset) -> Option<&'static str> {
        Some(match asset {
            Asset::Btc => "BTCUSDT",
            Asset::Eth => "ETHUSDT",
            Asset::Sol => "SOLUSDT",
            Asset::Bnb => "BNBUSDT",
            Asset::Xrp => "XRPUSDT",
            Asset::Doge => "DOGEUSDT",
        })
    }

    async fn current_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PricePoint>, MarketDataError> {
        let mapped: Vec<(Asset, &'static str)> = assets
            .iter()
            .filter_map(|&a| self.symbol(a).map(|s| (a, s)))
            .collect();
        if mapped.is_empty() {
            return Ok(HashMap::new());
        }

        let symbols: Vec<&str> = mapped.iter().map(|(_, s)| *s).collect();
        let body = self
            .fetch("/ticker/24hr", &[("symbols", Self::symbols_param(&symbols))])
            .await?;
        let tickers: Vec<Ticker24h> = parse::json(PROVIDER_ID, &body)?;

        let mut prices = HashMap::new();
        for ticker in tickers {
            let Some(&(asset, _)) = mapped.iter().find(|(_, s)| *s == ticker.symbol) else {
                continue;
            };
            let price = parse::decimal_str(PROVIDER_ID, &ticker.last_price)?;
            let change = parse::decimal_str(PROVIDER_ID, &ticker.price_change_percent)?;
            prices.insert(asset, PricePoint::new(asset, price, change, PROVIDER_ID));
        }

        debug!("Binance: got prices for {:?}", prices.keys().collect::<Vec<_>>());
        Ok(prices)
    }

    async fn candles(
        &self,
        asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let symbol = self.require_symbol(asset)?;
        let body = self
            .fetch(
                "/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.as_str().to_string()),
                    ("limit", limit.min(MAX_CANDLES).to_string()),
                ],
            )
            .await?;
        let rows: Vec<Vec<Value>> = parse::json(PROVIDER_ID, &body)?;

        let candles = rows
            .iter()
            .map(|row| Self::parse_kline(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Binance: fetched {} {} klines for {}", candles.len(), interval, asset);
        Ok(normalize_candles(candles, limit))
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let symbol = self.require_symbol(asset)?;
        let body = self
            .fetch("/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;
        let ticker: Ticker24h = parse::json(PROVIDER_ID, &body)?;

        let mut summary = MarketSummary::new(
            asset,
            parse::decimal_str(PROVIDER_ID, &ticker.last_price)?,
            PROVIDER_ID,
        );
        summary.change_24h = parse::decimal_str(PROVIDER_ID, &ticker.price_change_percent).ok();
        summary.high_24h = parse::decimal_text(PROVIDER_ID, ticker.high_price.as_deref());
        summary.low_24h = parse::decimal_text(PROVIDER_ID, ticker.low_price.as_deref());
        summary.volume_24h = parse::decimal_text(PROVIDER_ID, ticker.quote_volume.as_deref());
        Ok(summary)
    }
}
