//! Moving Average Convergence Divergence (MACD) indicator

use super::ema::EMA;
use crate::series::PriceSeries;
use crate::traits::MultiOutputIndicator;

/// MACD result for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    /// EMA(fast) - EMA(slow)
    pub macd: f64,
    /// Damped MACD standing in for the signal line
    pub signal: f64,
    /// MACD - signal
    pub histogram: f64,
}

/// MACD with a damped signal line.
///
/// The signal line is `macd * damping` rather than an EMA of the MACD
/// history, so crossovers only reflect the sign of the MACD itself.
#[derive(Debug, Clone)]
pub struct MACD {
    pub fast: usize,
    pub slow: usize,
    pub damping: f64,
}

impl MACD {
    pub fn new(fast: usize, slow: usize, damping: f64) -> Self {
        Self {
            fast,
            slow,
            damping,
        }
    }

    pub fn of(&self, closes: &[f64]) -> MacdResult {
        let macd = EMA::new(self.fast).of(closes) - EMA::new(self.slow).of(closes);
        let signal = macd * self.damping;
        MacdResult {
            macd,
            signal,
            histogram: macd - signal,
        }
    }
}

impl Default for MACD {
    fn default() -> Self {
        Self::new(12, 26, 0.8)
    }
}

impl MultiOutputIndicator for MACD {
    type Output = MacdResult;

    fn compute_all(&self, series: &PriceSeries) -> Self::Output {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn warmup_periods(&self) -> usize {
        self.slow
    }
}
