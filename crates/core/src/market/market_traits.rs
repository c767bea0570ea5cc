use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use coinfeed_indicators::IndicatorSet;
use coinfeed_market_data::{
    Asset, CacheEntryStatus, Candle, HistoricalPrice, Interval, MarketSummary, PricePoint,
};

use super::market_model::{MarketSnapshot, SimulatedQuote};
use crate::errors::Result;

/// Trait defining the contract for market data service operations.
///
/// Provider outages never surface as errors here: every read has a defined
/// fallback (stale cache, simulated baseline, empty result or a minimal
/// indicator set). The only error is an unrecognised asset symbol.
#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Latest prices; never empty for a non-empty request.
    async fn get_current_prices(&self, assets: &[Asset]) -> HashMap<Asset, PricePoint>;

    /// Like [`get_current_prices`](Self::get_current_prices) for raw symbols.
    async fn get_current_prices_by_symbol(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<Asset, PricePoint>>;

    async fn get_candles(&self, asset: Asset, interval: Interval, limit: usize) -> Vec<Candle>;

    async fn get_market_summary(&self, asset: Asset) -> Option<MarketSummary>;

    async fn get_price_history(&self, asset: Asset, days: u32) -> Vec<HistoricalPrice>;

    async fn get_indicators(&self, asset: Asset, interval: Interval) -> IndicatorSet;

    /// Prices, summaries and indicators for `assets` at the configured interval.
    async fn get_snapshot(&self, assets: &[Asset]) -> MarketSnapshot;

    fn update_simulated_prices(&self, overrides: HashMap<Asset, SimulatedQuote>);

    fn clear_cache(&self);

    fn cache_status(&self) -> BTreeMap<String, CacheEntryStatus>;
}
