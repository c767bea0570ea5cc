//! Exponential Moving Average (EMA) indicator

use super::mean;
use crate::series::PriceSeries;
use crate::traits::Indicator;

/// Exponential Moving Average
///
/// Seeded with the simple average of the first `period` values, then
/// `ema = (price - ema) * multiplier + ema` over the rest.
/// Multiplier = 2 / (period + 1)
#[derive(Debug, Clone)]
pub struct EMA {
    /// Number of periods for the EMA
    pub period: usize,
}

impl EMA {
    /// Creates a new EMA indicator with the given period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculates the EMA multiplier (smoothing factor).
    fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// EMA over an arbitrary column. Fewer than `period` values degrade to
    /// the latest value.
    pub fn of(&self, values: &[f64]) -> f64 {
        let Some(&last) = values.last() else {
            return 0.0;
        };
        if self.period == 0 || values.len() < self.period {
            return last;
        }

        let alpha = self.multiplier();
        let seed = mean(&values[..self.period]);
        values[self.period..]
            .iter()
            .fold(seed, |ema, price| (price - ema) * alpha + ema)
    }
}

impl Indicator for EMA {
    fn value(&self, series: &PriceSeries) -> f64 {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_by_sma() {
        // Seed = mean(1,2,3) = 2; then 4 -> 3; then 5 -> 4
        let ema = EMA::new(3);
        assert!((ema.of(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_exact_period_is_sma() {
        let ema = EMA::new(4);
        assert!((ema.of(&[2.0, 4.0, 6.0, 8.0]) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_constant_series() {
        let values = vec![42.5; 60];
        for period in [1, 9, 21, 50] {
            assert!((EMA::new(period).of(&values) - 42.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ema_insufficient_data_returns_last() {
        let ema = EMA::new(50);
        assert_eq!(ema.of(&[1.0, 2.0, 3.0]), 3.0);
    }

    #[test]
    fn test_ema_multiplier() {
        let ema = EMA::new(10);
        assert!((ema.multiplier() - 2.0 / 11.0).abs() < 1e-10);
    }
}
