//! Static per-asset baseline used as the last price fallback.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use coinfeed_market_data::{Asset, PricePoint};

use super::market_constants::SIMULATED_SOURCE;
use super::market_model::SimulatedQuote;

/// Baseline quotes keyed by asset. Every supported asset always has one.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPrices {
    quotes: BTreeMap<Asset, SimulatedQuote>,
}

impl Default for SimulatedPrices {
    fn default() -> Self {
        let quote = |price: i64, price_scale: u32, change: i64, change_scale: u32| {
            SimulatedQuote::new(
                Decimal::new(price, price_scale),
                Decimal::new(change, change_scale),
            )
        };
        let quotes = BTreeMap::from([
            (Asset::Btc, quote(97_000, 0, 15, 1)),
            (Asset::Eth, quote(3_600, 0, 21, 1)),
            (Asset::Sol, quote(220, 0, 32, 1)),
            (Asset::Bnb, quote(680, 0, 8, 1)),
            (Asset::Xrp, quote(23, 1, -12, 1)),
            (Asset::Doge, quote(40, 2, 45, 1)),
        ]);
        Self { quotes }
    }
}

impl SimulatedPrices {
    /// Replace the baseline for every asset in `overrides`; others keep theirs.
    pub fn update(&mut self, overrides: HashMap<Asset, SimulatedQuote>) {
        self.quotes.extend(overrides);
    }

    pub fn quote(&self, asset: Asset) -> Option<SimulatedQuote> {
        self.quotes.get(&asset).copied()
    }

    pub fn price_point(&self, asset: Asset) -> Option<PricePoint> {
        self.quote(asset)
            .map(|q| PricePoint::new(asset, q.price, q.change_24h, SIMULATED_SOURCE))
    }

    /// Price points for every requested asset.
    pub fn price_points(&self, assets: &[Asset]) -> HashMap<Asset, PricePoint> {
        assets
            .iter()
            .filter_map(|&asset| self.price_point(asset).map(|p| (asset, p)))
            .collect()
    }
}
