//! Coinfeed Core - market data service over the provider layer.
//!
//! Wires the provider registry, tiered cache and indicator engine into
//! [`MarketDataService`], the single entry point callers use for prices,
//! candles, summaries and indicators.

pub mod config;
pub mod errors;
pub mod market;

pub use config::CoreConfig;
pub use errors::{CoreError, Result};
pub use market::{
    AssetSnapshot, MarketDataService, MarketDataServiceTrait, MarketSnapshot, SimulatedPrices,
    SimulatedQuote,
};
