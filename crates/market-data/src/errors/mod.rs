//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the HTTP client and the provider registry
/// should handle the error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The asset symbol is not part of the canonical enumeration.
    /// No provider and no fallback can serve it.
    #[error("Unsupported asset: {0}")]
    UnsupportedAsset(String),

    /// The provider has no symbol mapping for this asset.
    #[error("Asset {asset} is not mapped for provider {provider}")]
    AssetNotMapped {
        /// The provider lacking the mapping
        provider: String,
        /// Canonical asset symbol
        asset: String,
    },

    /// The provider has no encoding for the requested candle interval.
    #[error("Interval {interval} is not supported by {provider}")]
    UnsupportedInterval {
        /// The provider lacking the interval
        provider: String,
        /// Canonical interval string
        interval: String,
    },

    /// The provider does not implement this operation at all.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// Operation name (e.g. "candles")
        operation: String,
        /// Provider identifier
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// Provider identifier
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {provider} - {message}")]
    Network {
        /// Provider identifier
        provider: String,
        /// Transport error description
        message: String,
    },

    /// The provider payload could not be parsed into the canonical form.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// Provider identifier
        provider: String,
        /// Parse failure description
        message: String,
    },

    /// The provider answered successfully but with no usable data.
    #[error("Empty response from {provider}")]
    EmptyResponse {
        /// Provider identifier
        provider: String,
    },

    /// All attempts against a provider failed.
    #[error("{provider} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Provider identifier
        provider: String,
        /// Number of attempts made
        attempts: u32,
        /// Description of the final error
        last_error: String,
    },
}

impl MarketDataError {
    /// Convenience constructor for parse failures.
    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinfeed_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "OKX".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::UnsupportedAsset("PEPE".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::UnsupportedAsset(_) => RetryClass::Never,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::Network { .. } => RetryClass::WithBackoff,

            Self::AssetNotMapped { .. }
            | Self::UnsupportedInterval { .. }
            | Self::NotSupported { .. }
            | Self::MalformedResponse { .. }
            | Self::EmptyResponse { .. }
            | Self::RetriesExhausted { .. } => RetryClass::NextProvider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_asset_never_retries() {
        let error = MarketDataError::UnsupportedAsset("PEPE".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_transient_errors_retry_with_backoff() {
        let errors = [
            MarketDataError::RateLimited {
                provider: "OKX".to_string(),
            },
            MarketDataError::Timeout {
                provider: "GATEIO".to_string(),
            },
            MarketDataError::HttpStatus {
                provider: "BINANCE".to_string(),
                status: 503,
            },
            MarketDataError::Network {
                provider: "COINCAP".to_string(),
                message: "connection reset".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.retry_class(), RetryClass::WithBackoff, "{}", error);
        }
    }

    #[test]
    fn test_soft_failures_try_next_provider() {
        let error = MarketDataError::malformed("COINGECKO", "missing field `usd`");
        assert_eq!(error.retry_class(), RetryClass::NextProvider);

        let error = MarketDataError::AssetNotMapped {
            provider: "GATEIO".to_string(),
            asset: "BNB".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);

        let error = MarketDataError::RetriesExhausted {
            provider: "BINANCE".to_string(),
            attempts: 3,
            last_error: "HTTP 451 from BINANCE".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::UnsupportedAsset("PEPE".to_string());
        assert_eq!(format!("{}", error), "Unsupported asset: PEPE");

        let error = MarketDataError::RateLimited {
            provider: "COINGECKO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: COINGECKO");

        let error = MarketDataError::RetriesExhausted {
            provider: "OKX".to_string(),
            attempts: 3,
            last_error: "Timeout: OKX".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "OKX failed after 3 attempts: Timeout: OKX"
        );
    }
}
