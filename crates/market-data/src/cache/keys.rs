//! Deterministic cache keys.
//!
//! The same logical request always maps to the same key, whatever order the
//! caller listed its assets in.

use crate::models::{Asset, Interval};

/// `prices:{assets}` with assets sorted and deduplicated.
pub fn prices_key(assets: &[Asset]) -> String {
    let mut sorted: Vec<&str> = assets.iter().map(Asset::symbol).collect();
    sorted.sort_unstable();
    sorted.dedup();
    format!("prices:{}", sorted.join(","))
}

pub fn candles_key(asset: Asset, interval: Interval, limit: usize) -> String {
    format!("candles:{}:{}:{}", asset, interval, limit)
}

pub fn summary_key(asset: Asset) -> String {
    format!("summary:{}", asset)
}

pub fn historical_key(asset: Asset, days: u32) -> String {
    format!("historical:{}:{}", asset, days)
}

pub fn indicators_key(asset: Asset, interval: Interval) -> String {
    format!("indicators:{}:{}", asset, interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_key_ignores_order_and_duplicates() {
        let a = prices_key(&[Asset::Sol, Asset::Btc, Asset::Eth]);
        let b = prices_key(&[Asset::Eth, Asset::Sol, Asset::Btc, Asset::Btc]);
        assert_eq!(a, b);
        assert_eq!(a, "prices:BTC,ETH,SOL");
    }

    #[test]
    fn test_parameterised_keys() {
        assert_eq!(
            candles_key(Asset::Btc, Interval::Minute3, 200),
            "candles:BTC:3m:200"
        );
        assert_eq!(summary_key(Asset::Doge), "summary:DOGE");
        assert_eq!(historical_key(Asset::Eth, 60), "historical:ETH:60");
        assert_eq!(
            indicators_key(Asset::Sol, Interval::Hour4),
            "indicators:SOL:4h"
        );
    }
}
