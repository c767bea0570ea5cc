//! OKX market data provider implementation.
//!
//! This module provides market data from the OKX public v5 API:
//! - Spot tickers via /market/ticker (one instrument per request)
//! - Candles via /market/candles (newest first)
//!
//! Public endpoints need no API key. OKX allows 20 requests per 2 seconds
//! per IP on market endpoints; we stay well under with a 500ms spacing.
//! API documentation: https://www.okx.com/docs-v5/en/

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::http::ResilientClient;
use crate::models::{normalize_candles, Asset, Candle, Interval, MarketSummary, PricePoint};
use crate::provider::parse::{self, percent_change};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://www.okx.com/api/v5";
const PROVIDER_ID: &str = "OKX";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Largest page /market/candles will serve.
const MAX_CANDLES: usize = 300;

const INTERVALS: &[Interval] = &[
    Interval::Minute1,
    Interval::Minute3,
    Interval::Minute5,
    Interval::Minute15,
    Interval::Minute30,
    Interval::Hour1,
    Interval::Hour2,
    Interval::Hour4,
    Interval::Hour6,
    Interval::Hour12,
    Interval::Day1,
    Interval::Week1,
];

// ============================================================================
// API Response Structures
// ============================================================================

/// Envelope shared by every v5 endpoint. `code` is "0" on success.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Entry of /market/ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    last: String,
    #[serde(default)]
    open24h: Option<String>,
    /// Open price at UTC+8 midnight, used when open24h is missing
    #[serde(default)]
    sod_utc8: Option<String>,
    #[serde(default)]
    high24h: Option<String>,
    #[serde(default)]
    low24h: Option<String>,
    /// 24h volume in quote currency for spot pairs
    #[serde(default)]
    vol_ccy24h: Option<String>,
}

// ============================================================================
// OkxProvider
// ============================================================================

/// OKX spot market data provider.
pub struct OkxProvider {
    client: Arc<ResilientClient>,
}

impl OkxProvider {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    /// OKX bar code for a canonical interval (hours and up are upper-case).
    fn interval_code(interval: Interval) -> Option<&'static str> {
        Some(match interval {
            Interval::Minute1 => "1m",
            Interval::Minute3 => "3m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1H",
            Interval::Hour2 => "2H",
            Interval::Hour4 => "4H",
            Interval::Hour6 => "6H",
            Interval::Hour12 => "12H",
            Interval::Day1 => "1D",
            Interval::Week1 => "1W",
        })
    }

    async fn fetch<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);
        let body = self.client.fetch(PROVIDER_ID, &url, params, TIMEOUT).await?;
        let envelope: Envelope<T> = parse::json(PROVIDER_ID, &body)?;

        if envelope.code != "0" {
            return Err(MarketDataError::malformed(
                PROVIDER_ID,
                format!("code {}: {}", envelope.code, envelope.msg),
            ));
        }
        if envelope.data.is_empty() {
            return Err(MarketDataError::EmptyResponse {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Ok(envelope.data)
    }

    async fn fetch_ticker(&self, inst_id: &str) -> Result<Ticker, MarketDataError> {
        let mut data: Vec<Ticker> = self
            .fetch("/market/ticker", &[("instId", inst_id.to_string())])
            .await?;
        Ok(data.swap_remove(0))
    }

    /// Last price and 24h change, falling back from open24h to the UTC+8
    /// session open and finally to the last price itself.
    fn price_and_change(ticker: &Ticker) -> Result<(Decimal, Decimal), MarketDataError> {
        let last = parse::decimal_str(PROVIDER_ID, &ticker.last)?;
        let open = [ticker.open24h.as_deref(), ticker.sod_utc8.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|s| parse::decimal_str(PROVIDER_ID, s).ok())
            .find(|d| !d.is_zero())
            .unwrap_or(last);
        Ok((last, percent_change(open, last)))
    }

    fn parse_candle_row(row: &[Value]) -> Result<Candle, MarketDataError> {
        // [ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]
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
impl MarketDataProvider for OkxProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
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
            Asset::Btc => "BTC-USDT",
            Asset::Eth => "ETH-USDT",
            Asset::Sol => "SOL-USDT",
            Asset::Bnb => "BNB-USDT",
            Asset::Xrp => "XRP-USDT",
            Asset::Doge => "DOGE-USDT",
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

        // One ticker per instrument; the rate limiter spaces these out.
        let results = join_all(mapped.iter().map(|&(asset, inst_id)| async move {
            let ticker = self.fetch_ticker(inst_id).await?;
            let (price, change) = Self::price_and_change(&ticker)?;
            Ok::<_, MarketDataError>(PricePoint::new(asset, price, change, PROVIDER_ID))
        }))
        .await;

        let mut prices = HashMap::new();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(point) => {
                    prices.insert(point.asset, point);
                }
                Err(e) => {
                    warn!("OKX: ticker failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if prices.is_empty() => Err(e),
            _ => {
                debug!("OKX: got prices for {:?}", prices.keys().collect::<Vec<_>>());
                Ok(prices)
            }
        }
    }

    async fn candles(
        &self,
        asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let inst_id = self.require_symbol(asset)?;
        let bar = Self::interval_code(interval).ok_or_else(|| {
            MarketDataError::UnsupportedInterval {
                provider: PROVIDER_ID.to_string(),
                interval: interval.to_string(),
            }
        })?;

        let rows: Vec<Vec<Value>> = self
            .fetch(
                "/market/candles",
                &[
                    ("instId", inst_id.to_string()),
                    ("bar", bar.to_string()),
                    ("limit", limit.min(MAX_CANDLES).to_string()),
                ],
            )
            .await?;

        let candles = rows
            .iter()
            .map(|row| Self::parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("OKX: fetched {} {} candles for {}", candles.len(), interval, asset);
        Ok(normalize_candles(candles, limit))
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let inst_id = self.require_symbol(asset)?;
        let ticker = self.fetch_ticker(inst_id).await?;
        let (price, change) = Self::price_and_change(&ticker)?;

        let mut summary = MarketSummary::new(asset, price, PROVIDER_ID);
        summary.change_24h = Some(change);
        summary.high_24h = parse::decimal_text(PROVIDER_ID, ticker.high24h.as_deref());
        summary.low_24h = parse::decimal_text(PROVIDER_ID, ticker.low24h.as_deref());
        summary.volume_24h = parse::decimal_text(PROVIDER_ID, ticker.vol_ccy24h.as_deref());
        Ok(summary)
    }
}
