//! Rate of Change (ROC) indicator

use crate::series::PriceSeries;
use crate::traits::Indicator;

/// Rate of Change: percent change between the latest close and the close
/// `period` bars earlier. 0 with insufficient history.
#[derive(Debug, Clone)]
pub struct ROC {
    pub period: usize,
}

impl ROC {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn of(&self, values: &[f64]) -> f64 {
        if values.len() <= self.period {
            return 0.0;
        }
        let last = values[values.len() - 1];
        let prior = values[values.len() - 1 - self.period];
        if prior <= 0.0 {
            return 0.0;
        }
        (last - prior) / prior * 100.0
    }
}

impl Indicator for ROC {
    fn value(&self, series: &PriceSeries) -> f64 {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "ROC"
    }

    fn warmup_periods(&self) -> usize {
        self.period + 1
    }
}
