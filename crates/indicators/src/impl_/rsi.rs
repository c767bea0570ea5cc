//! Relative Strength Index (RSI) indicator

use super::tail;
use crate::series::PriceSeries;
use crate::traits::Indicator;

/// RSI reported when there is not enough history.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index
///
/// Average gain and average loss are the sums of the last `period` gains and
/// losses divided by `period`. A zero average loss yields 100.
#[derive(Debug, Clone)]
pub struct RSI {
    /// Number of periods for the RSI
    pub period: usize,
}

impl RSI {
    /// Creates a new RSI indicator with the given period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI over `values`; [`NEUTRAL_RSI`] with fewer than `period` values.
    pub fn of(&self, values: &[f64]) -> f64 {
        if self.period == 0 || values.len() < self.period {
            return NEUTRAL_RSI;
        }

        let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let recent = tail(&changes, self.period);
        let gains: f64 = recent.iter().filter(|c| **c > 0.0).sum();
        let losses: f64 = recent.iter().filter(|c| **c < 0.0).map(|c| -c).sum();

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Indicator for RSI {
    fn value(&self, series: &PriceSeries) -> f64 {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
