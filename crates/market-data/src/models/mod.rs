//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `types` - Type aliases for common identifiers (ProviderId, TimestampMs)
//! - `asset` - Canonical asset enumeration (Asset)
//! - `interval` - Canonical candle interval vocabulary (Interval)
//! - `price` - Price snapshots and history (PricePoint, MarketSummary, HistoricalPrice)
//! - `candle` - OHLCV bars (Candle)

mod asset;
mod candle;
mod interval;
mod price;
mod types;

pub use asset::Asset;
pub use candle::{normalize_candles, Candle};
pub use interval::{Interval, ParseIntervalError};
pub use price::{normalize_history, HistoricalPrice, MarketSummary, PricePoint};
pub use types::{ProviderId, TimestampMs};
