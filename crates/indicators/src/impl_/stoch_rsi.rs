//! Stochastic RSI indicator

use super::rsi::{NEUTRAL_RSI, RSI};
use crate::series::PriceSeries;
use crate::traits::Indicator;

/// Stochastic RSI
///
/// Positions the latest RSI within the min/max of the trailing `period` RSI
/// values, each computed over a window ending one sample later than the
/// previous. Returns 50 when history is short or the range is flat.
#[derive(Debug, Clone)]
pub struct StochRSI {
    pub period: usize,
}

impl StochRSI {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn of(&self, values: &[f64]) -> f64 {
        if self.period == 0 || values.len() + 1 < 2 * self.period {
            return NEUTRAL_RSI;
        }

        let rsi = RSI::new(self.period);
        let first_end = values.len() + 1 - self.period;
        let history: Vec<f64> = (first_end..=values.len())
            .map(|end| rsi.of(&values[..end]))
            .collect();

        let min = history.iter().copied().fold(f64::INFINITY, f64::min);
        let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range <= 0.0 {
            return NEUTRAL_RSI;
        }

        let current = history.last().copied().unwrap_or(NEUTRAL_RSI);
        (current - min) / range * 100.0
    }
}

impl Indicator for StochRSI {
    fn value(&self, series: &PriceSeries) -> f64 {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "STOCH_RSI"
    }

    fn warmup_periods(&self) -> usize {
        (2 * self.period).saturating_sub(1)
    }
}
