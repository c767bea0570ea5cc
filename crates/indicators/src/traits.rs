//! Indicator traits.
//!
//! Every indicator reduces a [`PriceSeries`] to its latest value. Indicators
//! never fail: short histories produce the documented neutral default.

use crate::series::PriceSeries;

/// Single-output indicator.
pub trait Indicator {
    /// Latest value of the indicator over `series`.
    fn value(&self, series: &PriceSeries) -> f64;

    /// Indicator name (e.g., "EMA", "RSI").
    fn name(&self) -> &str;

    /// Points needed before the value stops being a fallback.
    fn warmup_periods(&self) -> usize;
}

/// Indicator producing several related values at once.
pub trait MultiOutputIndicator {
    /// Result type holding all outputs.
    type Output;

    /// Latest outputs of the indicator over `series`.
    fn compute_all(&self, series: &PriceSeries) -> Self::Output;

    /// Indicator name (e.g., "BOLLINGER").
    fn name(&self) -> &str;

    /// Points needed before the outputs stop being a fallback.
    fn warmup_periods(&self) -> usize;
}
