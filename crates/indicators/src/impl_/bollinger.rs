//! Bollinger Bands indicator

use super::{mean, tail};
use crate::series::PriceSeries;
use crate::traits::MultiOutputIndicator;

/// Bollinger Bands result for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerResult {
    /// Upper band = SMA + std_factor * std
    pub upper: f64,
    /// Middle band = SMA
    pub middle: f64,
    /// Lower band = SMA - std_factor * std
    pub lower: f64,
}

impl BollingerResult {
    /// Band width as a percentage of the middle band.
    pub fn width_pct(&self) -> f64 {
        if self.middle == 0.0 {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle * 100.0
    }

    /// Bands at `pct` above and below `price`.
    pub fn around(price: f64, pct: f64) -> Self {
        Self {
            upper: price * (1.0 + pct),
            middle: price,
            lower: price * (1.0 - pct),
        }
    }
}

/// Bollinger Bands
///
/// Calculates three bands based on standard deviation around a simple moving average:
/// - Upper Band = SMA + (std_factor * StdDev)
/// - Middle Band = SMA
/// - Lower Band = SMA - (std_factor * StdDev)
///
/// Uses population standard deviation (n), not sample (n-1). With fewer than
/// `period` closes the bands sit at the latest close ± `fallback_pct`.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    /// Period for the SMA and standard deviation
    pub period: usize,
    /// Multiplier for standard deviation (typically 2.0)
    pub std_factor: f64,
    /// Band offset used while history is short
    pub fallback_pct: f64,
}

impl BollingerBands {
    /// Creates new Bollinger Bands with the given parameters.
    pub fn new(period: usize, std_factor: f64) -> Self {
        Self {
            period,
            std_factor,
            fallback_pct: 0.02,
        }
    }

    pub fn of(&self, closes: &[f64]) -> BollingerResult {
        let last = closes.last().copied().unwrap_or(0.0);
        if self.period == 0 || closes.len() < self.period {
            return BollingerResult::around(last, self.fallback_pct);
        }

        let window = tail(closes, self.period);
        let sma = mean(window);
        let variance = window.iter().map(|x| (x - sma).powi(2)).sum::<f64>() / self.period as f64;
        let std = variance.sqrt();

        BollingerResult {
            upper: sma + self.std_factor * std,
            middle: sma,
            lower: sma - self.std_factor * std,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Output = BollingerResult;

    fn compute_all(&self, series: &PriceSeries) -> Self::Output {
        self.of(series.closes())
    }

    fn name(&self) -> &str {
        "BOLLINGER"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
