//! Core error types for the coinfeed service.
//!
//! Market data failures are absorbed by the service and never surface here;
//! what remains are configuration problems and unknown asset symbols.

use thiserror::Error;

use coinfeed_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Root error type for the service layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}
