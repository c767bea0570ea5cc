//! Average True Range (ATR) indicator

use super::{mean, tail};
use crate::series::PriceSeries;
use crate::traits::Indicator;

/// Average True Range
///
/// Simple average of the trailing `period` true ranges. The first bar has
/// no previous close, so its true range is just High - Low.
#[derive(Debug, Clone)]
pub struct ATR {
    /// Number of periods for ATR calculation
    pub period: usize,
}

impl ATR {
    /// Creates a new ATR indicator with the given period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculates True Range for a bar given the previous close.
    ///
    /// TR = max(High - Low, |High - Prev_Close|, |Low - Prev_Close|)
    #[inline]
    fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
        let hl = high - low;
        let hc = (high - prev_close).abs();
        let lc = (low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// True range column for `series`.
    pub fn true_ranges(series: &PriceSeries) -> Vec<f64> {
        let (highs, lows, closes) = (series.highs(), series.lows(), series.closes());
        (0..series.len())
            .map(|i| {
                if i == 0 {
                    highs[0] - lows[0]
                } else {
                    Self::true_range(highs[i], lows[i], closes[i - 1])
                }
            })
            .collect()
    }
}

impl Indicator for ATR {
    fn value(&self, series: &PriceSeries) -> f64 {
        if self.period == 0 || series.is_empty() {
            return 0.0;
        }
        mean(tail(&Self::true_ranges(series), self.period))
    }

    fn name(&self) -> &str {
        "ATR"
    }

    fn warmup_periods(&self) -> usize {
        self.period + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Bar;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_true_range_uses_gap_from_previous_close() {
        // Gap up: prev close 10, bar 14..12 -> TR = |14 - 10| = 4
        let series = PriceSeries::from_bars(&[bar(11.0, 9.0, 10.0), bar(14.0, 12.0, 13.0)], 1);
        assert_eq!(ATR::true_ranges(&series), vec![2.0, 4.0]);
    }

    #[test]
    fn test_atr_trailing_average() {
        let bars: Vec<Bar> = (0..20).map(|_| bar(102.0, 98.0, 100.0)).collect();
        let series = PriceSeries::from_bars(&bars, 1);
        assert!((ATR::new(14).value(&series) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_atr_approximated_from_closes() {
        // Flat closes with a ±1% synthetic band -> TR = 2% of price
        let series = PriceSeries::from_closes(vec![100.0; 30], vec![], 1).unwrap();
        assert!((ATR::new(14).value(&series) - 2.0).abs() < 1e-9);
    }
}
