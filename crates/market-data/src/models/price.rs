use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Latest price of one asset from one provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub asset: Asset,

    /// Last traded price in USD(T)
    pub price: Decimal,

    /// 24h change in percent
    pub change_24h: Decimal,

    /// Source of the price (OKX, GATEIO, ..., SIMULATED)
    pub source: String,
}

impl PricePoint {
    pub fn new(asset: Asset, price: Decimal, change_24h: Decimal, source: &str) -> Self {
        Self {
            asset,
            price,
            change_24h,
            source: source.to_string(),
        }
    }
}

/// Detailed 24h market snapshot for one asset.
///
/// Exchanges don't publish market capitalisation or a 7d change, so those
/// fields are only filled by aggregators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub asset: Asset,

    pub price: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,

    /// 24h traded volume in quote currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_7d: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<Decimal>,

    pub source: String,
}

impl MarketSummary {
    /// Create a summary with only the price populated.
    pub fn new(asset: Asset, price: Decimal, source: &str) -> Self {
        Self {
            asset,
            price,
            market_cap: None,
            volume_24h: None,
            change_24h: None,
            change_7d: None,
            high_24h: None,
            low_24h: None,
            source: source.to_string(),
        }
    }
}

/// One point of an aggregator's historical price series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Epoch milliseconds, UTC
    pub timestamp: i64,

    pub price: Decimal,

    /// Rolling volume at this point, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

/// Sort a historical series oldest-first and drop duplicate timestamps.
pub fn normalize_history(mut points: Vec<HistoricalPrice>) -> Vec<HistoricalPrice> {
    points.retain(|p| p.price > Decimal::ZERO);
    points.sort_by_key(|p| p.timestamp);
    points.dedup_by_key(|p| p.timestamp);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_point_new() {
        let point = PricePoint::new(Asset::Btc, dec!(97000.5), dec!(1.5), "OKX");
        assert_eq!(point.price, dec!(97000.5));
        assert_eq!(point.source, "OKX");
    }

    #[test]
    fn test_summary_optional_fields_skipped() {
        let summary = MarketSummary::new(Asset::Eth, dec!(3600), "BINANCE");
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("market_cap").is_none());
        assert_eq!(json["asset"], "ETH");
    }

    #[test]
    fn test_normalize_history_orders_and_dedups() {
        let points = vec![
            HistoricalPrice {
                timestamp: 3,
                price: dec!(3),
                volume: None,
            },
            HistoricalPrice {
                timestamp: 1,
                price: dec!(1),
                volume: None,
            },
            HistoricalPrice {
                timestamp: 3,
                price: dec!(3),
                volume: None,
            },
            HistoricalPrice {
                timestamp: 2,
                price: dec!(0),
                volume: None,
            },
        ];
        let normalized = normalize_history(points);
        let stamps: Vec<_> = normalized.iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![1, 3]);
    }
}
