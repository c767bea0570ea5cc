use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::TimestampMs;

/// One OHLCV bar.
///
/// Every provider's candle payload is normalized into this shape:
/// oldest-first, millisecond timestamps, volume in base currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time, epoch milliseconds UTC
    pub timestamp: TimestampMs,

    pub open: Decimal,

    pub high: Decimal,

    pub low: Decimal,

    pub close: Decimal,

    /// Traded volume in base currency
    pub volume: Decimal,
}

impl Candle {
    pub fn new(
        timestamp: TimestampMs,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar open time as a UTC datetime.
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// A bar is usable when its range is not inverted and it traded above zero.
    pub fn is_valid(&self) -> bool {
        self.high >= self.low && self.close > Decimal::ZERO
    }
}

/// Bring a provider's candle list into canonical order.
///
/// Sorts oldest-first, removes duplicate timestamps, drops inverted or
/// zero-priced bars and keeps at most the newest `limit` bars.
pub fn normalize_candles(mut candles: Vec<Candle>, limit: usize) -> Vec<Candle> {
    candles.retain(Candle::is_valid);
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    candles
}
