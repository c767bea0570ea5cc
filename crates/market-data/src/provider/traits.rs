//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Asset, Candle, HistoricalPrice, Interval, MarketSummary, PricePoint};

use super::capabilities::{Operation, ProviderCapabilities};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The registry will use the provider's capabilities and priority
/// to determine when and how to use it.
///
/// Every operation except [`id`](Self::id), [`priority`](Self::priority),
/// [`capabilities`](Self::capabilities) and [`symbol`](Self::symbol) has a
/// default returning `NotSupported`, so an adapter only implements what its
/// API actually offers.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use coinfeed_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyExchange;
///
/// #[async_trait]
/// impl MarketDataProvider for MyExchange {
///     fn id(&self) -> &'static str {
///         "MY_EXCHANGE"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         // ...
///     }
///
///     fn symbol(&self, asset: Asset) -> Option<&'static str> {
///         // ...
///     }
///
///     // ... implement current_prices / candles
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "OKX", "COINGECKO", etc.
    /// Used for logging, rate limiting and diagnostics.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Provider-native identifier for `asset`, or `None` when unmapped.
    fn symbol(&self, asset: Asset) -> Option<&'static str>;

    /// Latest price for each requested asset.
    ///
    /// Unmapped assets are skipped; a partial map is a valid answer.
    async fn current_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PricePoint>, MarketDataError> {
        let _ = assets;
        Err(self.not_supported(Operation::Prices))
    }

    /// Up to `limit` candles, oldest first.
    async fn candles(
        &self,
        asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let _ = (asset, interval, limit);
        Err(self.not_supported(Operation::Candles))
    }

    /// 24h market summary for one asset.
    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        let _ = asset;
        Err(self.not_supported(Operation::Summary))
    }

    /// Price series covering the last `days` days, oldest first.
    async fn price_history(
        &self,
        asset: Asset,
        days: u32,
    ) -> Result<Vec<HistoricalPrice>, MarketDataError> {
        let _ = (asset, days);
        Err(self.not_supported(Operation::History))
    }

    /// Error returned by the default operation implementations.
    fn not_supported(&self, operation: Operation) -> MarketDataError {
        MarketDataError::NotSupported {
            operation: operation.as_str().to_string(),
            provider: self.id().to_string(),
        }
    }

    /// Resolve `asset` or report it as unmapped.
    fn require_symbol(&self, asset: Asset) -> Result<&'static str, MarketDataError> {
        self.symbol(asset)
            .ok_or_else(|| MarketDataError::AssetNotMapped {
                provider: self.id().to_string(),
                asset: asset.to_string(),
            })
    }
}
