use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coinfeed_indicators::IndicatorSet;
use coinfeed_market_data::{Asset, MarketSummary, PricePoint};

/// Baseline price and 24h change served when every provider and the cache
/// come up empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedQuote {
    pub price: Decimal,
    pub change_24h: Decimal,
}

impl SimulatedQuote {
    pub fn new(price: Decimal, change_24h: Decimal) -> Self {
        Self { price, change_24h }
    }
}

/// Everything known about one asset at snapshot time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSnapshot {
    pub price: Option<PricePoint>,
    pub summary: Option<MarketSummary>,
    pub indicators: IndicatorSet,
}

/// Point-in-time view over a set of assets.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub generated_at: DateTime<Utc>,
    pub assets: BTreeMap<Asset, AssetSnapshot>,
}
