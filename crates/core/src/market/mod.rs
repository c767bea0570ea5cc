//! Market data service - cached, fallback-aware access to prices, candles
//! and technical indicators.

mod indicator_input;
pub mod market_constants;
mod market_model;
mod market_service;
mod market_traits;
mod simulated;

pub use market_model::{AssetSnapshot, MarketSnapshot, SimulatedQuote};
pub use market_service::MarketDataService;
pub use market_traits::MarketDataServiceTrait;
pub use simulated::SimulatedPrices;
