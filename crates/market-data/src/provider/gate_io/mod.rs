//! Gate.io market data provider implementation.
//!
//! This module provides market data from the Gate.io v4 spot API:
//! - All spot tickers via /spot/tickers (filtered locally)
//! - Candles via /spot/candlesticks
//!
//! Candlestick rows put volume first and close before high/low/open, with
//! timestamps in seconds; they are reshaped into canonical OHLCV here.
//! API documentation: https://www.gate.io/docs/developers/apiv4/

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::http::ResilientClient;
use crate::models::{normalize_candles, Asset, Candle, Interval, MarketSummary, PricePoint};
use crate::provider::parse;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://api.gateio.ws/api/v4";
const PROVIDER_ID: &str = "GATEIO";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Largest page /spot/candlesticks will serve.
const MAX_CANDLES: usize = 1000;

const INTERVALS: &[Interval] = &[
    Interval::Minute1,
    Interval::Minute5,
    Interval::Minute15,
    Interval::Minute30,
    Interval::Hour1,
    Interval::Hour4,
    Interval::Day1,
    Interval::Week1,
];

// ============================================================================
// API Response Structures
// ============================================================================

/// Entry of /spot/tickers
#[derive(Debug, Deserialize)]
struct Ticker {
    currency_pair: String,
    last: String,
    /// 24h change in percent
    #[serde(default)]
    change_percentage: Option<String>,
    #[serde(default)]
    high_24h: Option<String>,
    #[serde(default)]
    low_24h: Option<String>,
    #[serde(default)]
    quote_volume: Option<String>,
}

/// Error object returned in place of data
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    label: String,
    #[serde(default)]
    message: String,
}

// ============================================================================
// GateIoProvider
// ============================================================================

/// Gate.io spot market data provider.
pub struct GateIoProvider {
    client: Arc<ResilientClient>,
}

impl GateIoProvider {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    fn interval_code(interval: Interval) -> Option<&'static str> {
        match interval {
            Interval::Minute1 => Some("1m"),
            Interval::Minute5 => Some("5m"),
            Interval::Minute15 => Some("15m"),
            Interval::Minute30 => Some("30m"),
            Interval::Hour1 => Some("1h"),
            Interval::Hour4 => Some("4h"),
            Interval::Day1 => Some("1d"),
            Interval::Week1 => Some("7d"),
            _ => None,
        }
    }

    fn asset_for_pair(&self, pair: &str) -> Option<Asset> {
        Asset::ALL
            .into_iter()
            .find(|&a| self.symbol(a) == Some(pair))
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);
        let body = self.client.fetch(PROVIDER_ID, &url, params, TIMEOUT).await?;

        // Gate.io reports some failures as a 200 with an error object.
        if body.trim_start().starts_with('{') {
            if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(MarketDataError::malformed(
                    PROVIDER_ID,
                    format!("{}: {}", error.label, error.message),
                ));
            }
        }
        Ok(body)
    }

    async fn fetch_tickers(&self, params: &[(&str, String)]) -> Result<Vec<Ticker>, MarketDataError> {
        let body = self.fetch("/spot/tickers", params).await?;
        let tickers: Vec<Ticker> = parse::json(PROVIDER_ID, &body)?;
        if tickers.is_empty() {
            return Err(MarketDataError::EmptyResponse {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Ok(tickers)
    }

    fn parse_candle_row(row: &[Value]) -> Result<Candle, MarketDataError> {
        // [t (s), quote volume, close, high, low, open, base volume, closed]
        let seconds = parse::timestamp(PROVIDER_ID, parse::field(PROVIDER_ID, row, 0)?)?;
        let volume = match row.get(6) {
            Some(v) => parse::decimal(PROVIDER_ID, v)?,
            None => parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 1)?)?,
        };
        Ok(Candle::new(
            seconds * 1000,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 5)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 3)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 4)?)?,
            parse::decimal(PROVIDER_ID, parse::field(PROVIDER_ID, row, 2)?)?,
            volume,
        ))
    }
}

#[async_trait]
impl MarketDataProvider for GateIoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            prices: true,
            candles: true,
            summary: true,
            history: false,
            intervals: INTERVALS,
            min_interval: Duration::from_millis(500),
        }
    }

    fn symbol(&self, asset: Asset) -> Option<&'static str> {
        Some(match asset {
            Asset::Btc => "BTC_USDT",
            Asset::Eth => "ETH_USDT",
            Asset::Sol => "SOL_USDT",
            Asset::Bnb => "BNB_USDT",
            Asset::Xrp => "XRP_USDT",
            Asset::Doge => "DOGE_USDT",
        })
    }

    async fn current_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PricePoint>, MarketDataError> {
        if !assets.iter().any(|&a| self.symbol(a).is_some()) {
            return Ok(HashMap::new());
        }

        // The unfiltered endpoint returns every pair in one request.
        let tickers = self.fetch_tickers(&[]).await?;

        let mut prices = HashMap::new();
        for ticker in &tickers {
            let Some(asset) = self.asset_for_pair(&ticker.currency_pair) else {
                continue;
            };
            if !assets.contains(&asset) {
                continue;
            }
            match parse::decimal_str(PROVIDER_ID, &ticker.last) {
                Ok(price) => {
                    let change = parse::decimal_text(PROVIDER_ID, ticker.change_percentage.as_deref())
                        .unwrap_or_default();
                    prices.insert(asset, PricePoint::new(asset, price, change, PROVIDER_ID));
                }
                Err(e) => warn!("Gate.io: skipping {}: {}", ticker.currency_pair, e),
            }
        }

        debug!("Gate.io: got prices for {:?}", prices.keys().collect::<Vec<_>>());
        Ok(prices)
    }

    async fn candles(
        &self,
        asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let pair = self.require_symbol(asset)?;
        let code = Self::interval_code(interval).ok_or_else(|| {
            MarketDataError::UnsupportedInterval {
                provider: PROVIDER_ID.to_string(),
                interval: interval.to_string(),
            }
        })?;

        let body = self
            .fetch(
                "/spot/candlesticks",
                &[
                    ("currency_pair", pair.to_string()),
                    ("interval", code.to_string()),
                    ("limit", limit.min(MAX_CANDLES).to_string()),
                ],
            )
            .await?;
        let rows: Vec<Vec<Value>> = parse::json(PROVIDER_ID, &body)?;

        let candles = rows
            .iter()
            .map(|row| Self::parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Gate.io: fetched {} {} candles for {}", candles.len(), interval, asset);
        Ok(normalize_candles(candles, limit))
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let pair = self.require_symbol(asset)?;
        let tickers = self
            .fetch_tickers(&[("currency_pair", pair.to_string())])
            .await?;
        let ticker = tickers
            .iter()
            .find(|t| t.currency_pair == pair)
            .ok_or_else(|| MarketDataError::EmptyResponse {
                provider: PROVIDER_ID.to_string(),
            })?;

        let mut summary = MarketSummary::new(
            asset,
            parse::decimal_str(PROVIDER_ID, &ticker.last)?,
            PROVIDER_ID,
        );
        summary.change_24h = parse::decimal_text(PROVIDER_ID, ticker.change_percentage.as_deref());
        summary.high_24h = parse::decimal_text(PROVIDER_ID, ticker.high_24h.as_deref());
        summary.low_24h = parse::decimal_text(PROVIDER_ID, ticker.low_24h.as_deref());
        summary.volume_24h = parse::decimal_text(PROVIDER_ID, ticker.quote_volume.as_deref());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{client, RouteTransport};
    use rust_decimal_macros::dec;

    const TICKERS: &str = r#"[
        {"currency_pair":"BTC_USDT","last":"97100.1","change_percentage":"-0.85","high_24h":"98000","low_24h":"96000","quote_volume":"5000000"},
        {"currency_pair":"GT_USDT","last":"5.1","change_percentage":"1.0"},
        {"currency_pair":"ETH_USDT","last":"3610","change_percentage":""}
    ]"#;

    #[tokio::test]
    async fn test_current_prices_filters_requested_pairs() {
        let transport = RouteTransport::new(vec![("/spot/tickers", TICKERS.to_string())]);
        let provider = GateIoProvider::new(client(transport));

        let prices = provider
            .current_prices(&[Asset::Btc, Asset::Eth, Asset::Sol])
            .await
            .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&Asset::Btc].price, dec!(97100.1));
        assert_eq!(prices[&Asset::Btc].change_24h, dec!(-0.85));
        assert_eq!(prices[&Asset::Eth].change_24h, dec!(0));
    }

    #[tokio::test]
    async fn test_candles_reorder_volume_first_rows() {
        let body = r#"[
            ["1700000000","1005000","100.5","101","99","100","10050","true"],
            ["1700000060","1015000","101.5","102","100","101","10000","true"]
        ]"#;
        let transport = RouteTransport::new(vec![("/spot/candlesticks", body.to_string())]);
        let provider = GateIoProvider::new(client(transport.clone()));

        let candles = provider
            .candles(Asset::Btc, Interval::Hour1, 50)
            .await
            .unwrap();
        assert_eq!(candles.len(), 2);
        let first = &candles[0];
        assert_eq!(first.timestamp, 1_700_000_000_000);
        assert_eq!(first.open, dec!(100));
        assert_eq!(first.high, dec!(101));
        assert_eq!(first.low, dec!(99));
        assert_eq!(first.close, dec!(100.5));
        assert_eq!(first.volume, dec!(10050));
        assert_eq!(transport.param(0, "currency_pair").as_deref(), Some("BTC_USDT"));
    }

    #[tokio::test]
    async fn test_unsupported_interval() {
        let provider = GateIoProvider::new(client(RouteTransport::new(vec![])));
        let err = provider
            .candles(Asset::Btc, Interval::Minute3, 200)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedInterval { .. }));
    }

    #[tokio::test]
    async fn test_error_object_is_malformed() {
        let transport = RouteTransport::new(vec![(
            "/spot/tickers",
            r#"{"label":"INVALID_CURRENCY_PAIR","message":"Invalid currency pair"}"#.to_string(),
        )]);
        let provider = GateIoProvider::new(client(transport));
        let err = provider.market_summary(Asset::Btc).await.unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_market_summary() {
        let transport = RouteTransport::new(vec![("/spot/tickers", TICKERS.to_string())]);
        let provider = GateIoProvider::new(client(transport));

        let summary = provider.market_summary(Asset::Btc).await.unwrap();
        assert_eq!(summary.price, dec!(97100.1));
        assert_eq!(summary.volume_24h, Some(dec!(5000000)));
        assert_eq!(summary.high_24h, Some(dec!(98000)));
    }
}
