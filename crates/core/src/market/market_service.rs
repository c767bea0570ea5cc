use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use num_traits::ToPrimitive;

use coinfeed_indicators::{IndicatorEngine, IndicatorSet, PriceChanges, PriceSeries};
use coinfeed_market_data::cache::keys::{
    candles_key, historical_key, indicators_key, prices_key, summary_key,
};
use coinfeed_market_data::{
    default_providers, Asset, CacheEntryStatus, Candle, HistoricalPrice, Interval, MarketSummary,
    PricePoint, ProviderRegistry, RateLimiter, ResilientClient, TieredCache,
};

use super::indicator_input::{candle_series, closes, history_series};
use super::market_constants::{
    CHANGE_1H_CANDLES, CHANGE_4H_CANDLES, CHANGE_DAILY_CANDLES, MIN_HISTORY_POINTS,
};
use super::market_model::{AssetSnapshot, MarketSnapshot, SimulatedQuote};
use super::market_traits::MarketDataServiceTrait;
use super::simulated::SimulatedPrices;
use crate::config::CoreConfig;
use crate::errors::Result;

/// Cached, fallback-aware market data access.
///
/// Reads go fresh cache -> providers in priority order -> stale cache ->
/// terminal fallback. Only successful live results are written back; the
/// simulated baseline and minimal indicator sets are never cached.
pub struct MarketDataService {
    registry: Arc<ProviderRegistry>,
    cache: Arc<TieredCache>,
    simulated: RwLock<SimulatedPrices>,
    engine: IndicatorEngine,
    config: CoreConfig,
}

impl MarketDataService {
    pub fn new(registry: Arc<ProviderRegistry>, config: CoreConfig) -> Self {
        Self {
            registry,
            cache: Arc::new(TieredCache::new(config.fresh_ttl, config.stale_ttl)),
            simulated: RwLock::new(SimulatedPrices::default()),
            engine: IndicatorEngine::new(),
            config,
        }
    }

    /// Service over the five built-in providers with real HTTP.
    pub fn from_config(config: CoreConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new());
        let client = Arc::new(
            ResilientClient::with_reqwest(limiter.clone())
                .with_retry_policy(config.max_attempts, config.base_retry_delay),
        );
        let providers = default_providers(client);
        limiter.configure_providers(&providers);
        let registry = Arc::new(ProviderRegistry::new(providers));
        Self::new(registry, config)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn read_simulated(&self) -> RwLockReadGuard<'_, SimulatedPrices> {
        self.simulated.read().unwrap_or_else(|poisoned| {
            warn!("Simulated prices lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_simulated(&self) -> RwLockWriteGuard<'_, SimulatedPrices> {
        self.simulated.write().unwrap_or_else(|poisoned| {
            warn!("Simulated prices lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Multi-horizon changes from dedicated 1h, 4h and daily candle fetches.
    async fn price_changes(&self, asset: Asset) -> PriceChanges {
        let (hourly, four_hourly, daily) = futures::join!(
            self.get_candles(asset, Interval::Hour1, CHANGE_1H_CANDLES),
            self.get_candles(asset, Interval::Hour4, CHANGE_4H_CANDLES),
            self.get_candles(asset, Interval::Day1, CHANGE_DAILY_CANDLES),
        );
        PriceChanges::from_closes(&closes(&hourly), &closes(&four_hourly), &closes(&daily))
    }

    /// Best available series: fine candles, else the historical lookback.
    async fn indicator_series(&self, asset: Asset, interval: Interval) -> Option<PriceSeries> {
        let candles = self
            .get_candles(asset, interval, self.config.candle_limit)
            .await;
        if candles.len() >= self.config.min_candles {
            return Some(candle_series(&candles, interval));
        }

        let days = self.config.history_days;
        let history = self.get_price_history(asset, days).await;
        if history.len() < MIN_HISTORY_POINTS {
            debug!(
                "No usable series for {} ({} candles, {} historical points)",
                asset,
                candles.len(),
                history.len()
            );
            return None;
        }

        info!(
            "Computing {} indicators from {} historical points, only {} {} candles available",
            asset,
            history.len(),
            candles.len(),
            interval
        );
        match history_series(&history, days) {
            Ok(series) => Some(series),
            Err(e) => {
                warn!("Unusable price history for {}: {}", asset, e);
                None
            }
        }
    }

    async fn minimal_indicators(&self, asset: Asset, changes: PriceChanges) -> IndicatorSet {
        let price = self
            .get_current_prices(&[asset])
            .await
            .get(&asset)
            .and_then(|p| p.price.to_f64())
            .unwrap_or(0.0);
        warn!("Serving minimal indicator set for {} around {}", asset, price);
        IndicatorSet::minimal(price, changes)
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn get_current_prices(&self, assets: &[Asset]) -> HashMap<Asset, PricePoint> {
        if assets.is_empty() {
            return HashMap::new();
        }

        let key = prices_key(assets);
        if let Some(hit) = self.cache.get::<Vec<PricePoint>>(&key, false) {
            return to_price_map(hit.value);
        }

        let live = self.registry.fetch_prices(assets).await;
        if !live.is_empty() {
            let points: Vec<&PricePoint> = live.values().collect();
            self.cache.set(&key, &points);
            return live;
        }

        if let Some(hit) = self.cache.get::<Vec<PricePoint>>(&key, true) {
            return to_price_map(hit.value);
        }

        warn!(
            "All price providers failed for [{}], using simulated prices",
            assets
                .iter()
                .map(Asset::symbol)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.read_simulated().price_points(assets)
    }

    async fn get_current_prices_by_symbol(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<Asset, PricePoint>> {
        let assets = symbols
            .iter()
            .map(|s| Asset::from_str(s))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.get_current_prices(&assets).await)
    }

    async fn get_candles(&self, asset: Asset, interval: Interval, limit: usize) -> Vec<Candle> {
        let key = candles_key(asset, interval, limit);
        if let Some(hit) = self.cache.get::<Vec<Candle>>(&key, false) {
            return hit.value;
        }

        let live = self.registry.fetch_candles(asset, interval, limit).await;
        if !live.is_empty() {
            self.cache.set(&key, &live);
            return live;
        }

        self.cache
            .get::<Vec<Candle>>(&key, true)
            .map(|hit| hit.value)
            .unwrap_or_default()
    }

    async fn get_market_summary(&self, asset: Asset) -> Option<MarketSummary> {
        let key = summary_key(asset);
        if let Some(hit) = self.cache.get::<MarketSummary>(&key, false) {
            return Some(hit.value);
        }

        if let Some(summary) = self.registry.fetch_summary(asset).await {
            self.cache.set(&key, &summary);
            return Some(summary);
        }

        self.cache
            .get::<MarketSummary>(&key, true)
            .map(|hit| hit.value)
    }

    async fn get_price_history(&self, asset: Asset, days: u32) -> Vec<HistoricalPrice> {
        let key = historical_key(asset, days);
        if let Some(hit) = self.cache.get::<Vec<HistoricalPrice>>(&key, false) {
            return hit.value;
        }

        let live = self.registry.fetch_history(asset, days).await;
        if !live.is_empty() {
            self.cache.set(&key, &live);
            return live;
        }

        self.cache
            .get::<Vec<HistoricalPrice>>(&key, true)
            .map(|hit| hit.value)
            .unwrap_or_default()
    }

    async fn get_indicators(&self, asset: Asset, interval: Interval) -> IndicatorSet {
        let key = indicators_key(asset, interval);
        if let Some(hit) = self.cache.get::<IndicatorSet>(&key, false) {
            return hit.value;
        }

        let (series, changes) = futures::join!(
            self.indicator_series(asset, interval),
            self.price_changes(asset)
        );

        if let Some(series) = series {
            match self.engine.compute(&series, changes) {
                Ok(set) => {
                    self.cache.set(&key, &set);
                    return set;
                }
                Err(e) => warn!("Indicator computation failed for {}: {}", asset, e),
            }
        }

        if let Some(hit) = self.cache.get::<IndicatorSet>(&key, true) {
            return hit.value;
        }

        self.minimal_indicators(asset, changes).await
    }

    async fn get_snapshot(&self, assets: &[Asset]) -> MarketSnapshot {
        let interval = self.config.indicator_interval;
        let mut prices = self.get_current_prices(assets).await;

        let details = join_all(assets.iter().map(|&asset| async move {
            let (summary, indicators) = futures::join!(
                self.get_market_summary(asset),
                self.get_indicators(asset, interval)
            );
            (asset, summary, indicators)
        }))
        .await;

        let assets = details
            .into_iter()
            .map(|(asset, summary, indicators)| {
                let snapshot = AssetSnapshot {
                    price: prices.remove(&asset),
                    summary,
                    indicators,
                };
                (asset, snapshot)
            })
            .collect();

        MarketSnapshot {
            generated_at: Utc::now(),
            assets,
        }
    }

    fn update_simulated_prices(&self, overrides: HashMap<Asset, SimulatedQuote>) {
        debug!("Updating simulated prices for {} assets", overrides.len());
        self.write_simulated().update(overrides);
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }

    fn cache_status(&self) -> BTreeMap<String, CacheEntryStatus> {
        self.cache.status()
    }
}

fn to_price_map(points: Vec<PricePoint>) -> HashMap<Asset, PricePoint> {
    points.into_iter().map(|p| (p.asset, p)).collect()
}
