//! Coinfeed Market Data Crate
//!
//! This crate provides multi-source crypto market data fetching for a small,
//! fixed set of assets.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Five public REST providers: OKX, Gate.io, Binance, CoinGecko, CoinCap
//! - Fallback across providers in a fixed priority order
//! - Per-provider request spacing, retry and exponential backoff
//! - An in-memory cache with fresh and stale-but-usable windows
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Caller       | --> |   TieredCache    |  (fresh / stale windows)
//! +------------------+     +------------------+
//!                                  | miss
//!                                  v
//!                          +------------------+
//!                          | ProviderRegistry |  (priority order, fallback)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (OKX, Gate.io, Binance, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ResilientClient  |  (retry, backoff, 429)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   RateLimiter    |  (min interval per provider)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Asset`] - Canonical asset enumeration
//! - [`Interval`] - Canonical candle interval vocabulary
//! - [`PricePoint`] - Latest price with 24h change
//! - [`Candle`] - OHLCV bar, oldest first in every sequence
//! - [`MarketSummary`] - 24h market snapshot
//! - [`HistoricalPrice`] - Point of a day-span price series
//!
//! # Type Aliases
//!
//! - [`ProviderId`] - Provider identifier (e.g., "OKX", "COINGECKO")
//! - [`TimestampMs`] - Epoch milliseconds, UTC

pub mod cache;
pub mod errors;
pub mod http;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{
    normalize_candles, normalize_history, Asset, Candle, HistoricalPrice, Interval,
    MarketSummary, ParseIntervalError, PricePoint, ProviderId, TimestampMs,
};

// Re-export error types
pub use errors::{MarketDataError, RetryClass};

// Re-export cache types
pub use cache::{CacheEntryStatus, Cached, TieredCache};

// Re-export HTTP types
pub use http::{HttpResponse, HttpTransport, ReqwestTransport, ResilientClient};

// Re-export provider types
pub use provider::binance::BinanceProvider;
pub use provider::coincap::CoinCapProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::gate_io::GateIoProvider;
pub use provider::okx::OkxProvider;
pub use provider::{default_providers, MarketDataProvider, Operation, ProviderCapabilities};

// Re-export registry types
pub use registry::{FetchDiagnostics, ProviderAttempt, ProviderRegistry, RateLimiter, SkipReason};
