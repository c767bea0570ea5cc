//! Provider registry for orchestrating market data providers.
//!
//! The registry walks providers in a fixed priority order, handling:
//! - Provider selection based on declared capabilities, intervals and symbol maps
//! - Fallback to the next provider on any failure or empty answer
//! - Diagnostic tracking for debugging provider selection
//!
//! Every provider error is absorbed here. Callers get an empty value when no
//! provider could answer and decide on their own fallbacks (stale cache,
//! simulated baseline).

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};

use super::{FetchDiagnostics, SkipReason};
use crate::errors::MarketDataError;
use crate::models::{Asset, Candle, HistoricalPrice, Interval, MarketSummary, PricePoint, ProviderId};
use crate::provider::{MarketDataProvider, Operation};

/// Provider registry for orchestrating market data fetching.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl ProviderRegistry {
    /// Create a new provider registry.
    ///
    /// Providers are ordered by their declared priority (lower first). Ties
    /// keep the order they were given in.
    pub fn new(mut providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// Get all providers, in the order they are tried.
    pub fn providers(&self) -> &[Arc<dyn MarketDataProvider>] {
        &self.providers
    }

    /// Latest prices for `assets`.
    pub async fn fetch_prices(&self, assets: &[Asset]) -> HashMap<Asset, PricePoint> {
        self.fetch_prices_with_diagnostics(assets).await.0
    }

    /// Latest prices for `assets` with diagnostics.
    ///
    /// The first non-empty answer is held. While it covers fewer assets than
    /// requested, later providers are still tried and a strictly larger answer
    /// replaces the held one. Answers are never merged across providers.
    pub async fn fetch_prices_with_diagnostics(
        &self,
        assets: &[Asset],
    ) -> (HashMap<Asset, PricePoint>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let wanted: HashSet<Asset> = assets.iter().copied().collect();
        let mut held: HashMap<Asset, PricePoint> = HashMap::new();

        if wanted.is_empty() {
            return (held, diagnostics);
        }

        for provider in &self.providers {
            if held.len() >= wanted.len() {
                break;
            }

            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            if let Some(reason) = Self::skip_reason(provider.as_ref(), Operation::Prices, assets, None) {
                debug!("Skipping provider '{}' for prices: {}", provider_id, reason);
                diagnostics.record_skip(provider_id, reason);
                continue;
            }

            match provider.current_prices(assets).await {
                Ok(mut prices) => {
                    prices.retain(|asset, _| wanted.contains(asset));
                    diagnostics.record_result(provider_id.clone(), prices.len());

                    if prices.len() > held.len() {
                        debug!(
                            "Holding {} of {} prices from '{}'",
                            prices.len(),
                            wanted.len(),
                            provider_id
                        );
                        held = prices;
                    }
                }
                Err(e) => {
                    warn!("Provider '{}' failed for prices: {}", provider_id, e);
                    diagnostics.record_error(provider_id, e.to_string());
                }
            }
        }

        if held.is_empty() {
            warn!("All providers failed for prices: {}", diagnostics.summary());
        } else {
            info!("Prices fetched: {}", diagnostics.summary());
        }
        (held, diagnostics)
    }

    /// Up to `limit` candles, oldest first. Empty when no provider answers.
    pub async fn fetch_candles(&self, asset: Asset, interval: Interval, limit: usize) -> Vec<Candle> {
        self.fetch_candles_with_diagnostics(asset, interval, limit)
            .await
            .0
    }

    /// Candles with diagnostics. The first non-empty answer wins.
    pub async fn fetch_candles_with_diagnostics(
        &self,
        asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> (Vec<Candle>, FetchDiagnostics) {
        let (candles, diagnostics) = self
            .first_non_empty(
                Operation::Candles,
                asset,
                Some(interval),
                move |provider| async move { provider.candles(asset, interval, limit).await },
                Vec::len,
            )
            .await;
        (candles.unwrap_or_default(), diagnostics)
    }

    /// 24h market summary for one asset.
    pub async fn fetch_summary(&self, asset: Asset) -> Option<MarketSummary> {
        self.fetch_summary_with_diagnostics(asset).await.0
    }

    /// Market summary with diagnostics. The first answer wins.
    pub async fn fetch_summary_with_diagnostics(
        &self,
        asset: Asset,
    ) -> (Option<MarketSummary>, FetchDiagnostics) {
        self.first_non_empty(
            Operation::Summary,
            asset,
            None,
            move |provider| async move { provider.market_summary(asset).await },
            |_: &MarketSummary| 1,
        )
        .await
    }

    /// Price series over the last `days` days. Empty when no provider answers.
    pub async fn fetch_history(&self, asset: Asset, days: u32) -> Vec<HistoricalPrice> {
        self.fetch_history_with_diagnostics(asset, days).await.0
    }

    /// Price history with diagnostics. The first non-empty answer wins.
    pub async fn fetch_history_with_diagnostics(
        &self,
        asset: Asset,
        days: u32,
    ) -> (Vec<HistoricalPrice>, FetchDiagnostics) {
        let (history, diagnostics) = self
            .first_non_empty(
                Operation::History,
                asset,
                None,
                move |provider| async move { provider.price_history(asset, days).await },
                Vec::len,
            )
            .await;
        (history.unwrap_or_default(), diagnostics)
    }

    /// Walk eligible providers until one returns a value with at least one item.
    async fn first_non_empty<T, F, Fut>(
        &self,
        operation: Operation,
        asset: Asset,
        interval: Option<Interval>,
        call: F,
        items: fn(&T) -> usize,
    ) -> (Option<T>, FetchDiagnostics)
    where
        F: Fn(Arc<dyn MarketDataProvider>) -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let mut diagnostics = FetchDiagnostics::new();

        for provider in &self.providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            if let Some(reason) = Self::skip_reason(provider.as_ref(), operation, &[asset], interval) {
                debug!(
                    "Skipping provider '{}' for {} {}: {}",
                    provider_id,
                    operation.as_str(),
                    asset,
                    reason
                );
                diagnostics.record_skip(provider_id, reason);
                continue;
            }

            match call(Arc::clone(provider)).await {
                Ok(value) => {
                    let count = items(&value);
                    diagnostics.record_result(provider_id.clone(), count);
                    if count > 0 {
                        info!(
                            "{} for {} fetched: {}",
                            operation.as_str(),
                            asset,
                            diagnostics.summary()
                        );
                        return (Some(value), diagnostics);
                    }
                    debug!("Provider '{}' returned no {} for {}", provider_id, operation.as_str(), asset);
                }
                Err(e) => {
                    warn!(
                        "Provider '{}' failed for {} {}: {}",
                        provider_id,
                        operation.as_str(),
                        asset,
                        e
                    );
                    diagnostics.record_error(provider_id, e.to_string());
                }
            }
        }

        warn!(
            "All providers failed for {} {}: {}",
            operation.as_str(),
            asset,
            diagnostics.summary()
        );
        (None, diagnostics)
    }

    /// Why `provider` can't serve this request, if it can't.
    fn skip_reason(
        provider: &dyn MarketDataProvider,
        operation: Operation,
        assets: &[Asset],
        interval: Option<Interval>,
    ) -> Option<SkipReason> {
        let capabilities = provider.capabilities();
        if !capabilities.supports(operation) {
            return Some(SkipReason::OperationNotSupported);
        }
        if let Some(interval) = interval {
            if !capabilities.supports_interval(interval) {
                return Some(SkipReason::IntervalNotSupported {
                    interval: interval.to_string(),
                });
            }
        }
        if !assets.iter().any(|&a| provider.symbol(a).is_some()) {
            return Some(SkipReason::AssetNotMapped);
        }
        None
    }
}
