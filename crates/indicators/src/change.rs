//! Multi-horizon percent changes.

use serde::{Deserialize, Serialize};

/// Percent change from `from` to `to`; 0 when `from` is not positive.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from <= 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

/// Percent change between the close `periods` bars back and the latest close.
/// 0 when there are not enough closes.
pub fn change_over(closes: &[f64], periods: usize) -> f64 {
    if periods == 0 || closes.len() <= periods {
        return 0.0;
    }
    let last = closes.len() - 1;
    percent_change(closes[last - periods], closes[last])
}

/// Percent changes over 1h, 4h, 24h and 7d, each 0 when unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChanges {
    pub change_1h: f64,
    pub change_4h: f64,
    pub change_24h: f64,
    pub change_7d: f64,
}

impl PriceChanges {
    /// Changes from the closes of dedicated 1h, 4h and daily candle fetches.
    ///
    /// The short horizons compare the last two candles at their interval; the
    /// weekly change compares the latest daily close with the one 7 days back.
    pub fn from_closes(hourly: &[f64], four_hourly: &[f64], daily: &[f64]) -> Self {
        Self {
            change_1h: change_over(hourly, 1),
            change_4h: change_over(four_hourly, 1),
            change_24h: change_over(daily, 1),
            change_7d: change_over(daily, 7),
        }
    }
}
