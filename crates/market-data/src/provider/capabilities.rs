//! Provider capabilities.
//!
//! Describes which operations an adapter can serve so the registry can build
//! a per-operation provider list out of the fixed priority order.

use std::time::Duration;

use crate::models::Interval;

/// The operations a provider can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Prices,
    Candles,
    Summary,
    History,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::Candles => "candles",
            Self::Summary => "summary",
            Self::History => "history",
        }
    }
}

/// Describes the capabilities of a market data provider.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Batch or per-asset current prices.
    pub prices: bool,

    /// OHLCV candles.
    pub candles: bool,

    /// 24h market summary.
    pub summary: bool,

    /// Historical price series by day span.
    pub history: bool,

    /// Candle intervals the provider has an encoding for.
    pub intervals: &'static [Interval],

    /// Minimum delay between two requests to this provider.
    pub min_interval: Duration,
}

impl ProviderCapabilities {
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Prices => self.prices,
            Operation::Candles => self.candles,
            Operation::Summary => self.summary,
            Operation::History => self.history,
        }
    }

    pub fn supports_interval(&self, interval: Interval) -> bool {
        self.intervals.contains(&interval)
    }
}
