//! Simple Moving Average (SMA) indicator

use super::{mean, tail};
use crate::series::PriceSeries;
use crate::traits::Indicator;

/// Simple Moving Average
///
/// Arithmetic mean of the last N values. With fewer than N values the
/// latest value is returned as is.
#[derive(Debug, Clone)]
pub struct SMA {
    /// Number of periods for the moving average
    pub period: usize,
}

impl SMA {
    /// Creates a new SMA indicator with the given period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// SMA over an arbitrary column (closes, volumes).
    pub fn of(&self, values: &[f64]) -> f64 {
        let Some(&last) = values.last() else {
            return 0.0;
        };
        if self.period == 0 || values.len() < self.period {
            return last;
        }
        mean(tail(values, self.period))
    }
}

impl Indicator for SMA {
    fn value(&self, series: &PriceSeries) -> f64 {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
