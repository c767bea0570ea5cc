//! Volume analytics: ratio, On-Balance Volume, trend and divergence.

use super::{mean, tail};
use crate::signals::{Divergence, VolumeTrend};

/// Bars compared by [`volume_trend`] and [`price_volume_divergence`].
pub const VOLUME_WINDOW: usize = 10;

/// Relative change that counts as a volume trend.
const TREND_THRESHOLD: f64 = 0.2;

/// Relative rise that counts as volume confirmation.
const CONFIRMATION_THRESHOLD: f64 = 0.1;

/// Current volume over its average; 1.0 when the average is zero.
pub fn volume_ratio(current: f64, average: f64) -> f64 {
    if average == 0.0 {
        return 1.0;
    }
    current / average
}

/// Volume traded over the last `bars_per_day` bars.
pub fn volume_24h(volumes: &[f64], bars_per_day: usize) -> f64 {
    tail(volumes, bars_per_day.max(1)).iter().sum()
}

/// On-Balance Volume: running sum adding volume on up-closes and
/// subtracting it on down-closes.
pub fn obv(closes: &[f64], volumes: &[f64]) -> f64 {
    closes
        .windows(2)
        .zip(volumes.iter().skip(1))
        .fold(0.0, |acc, (pair, volume)| {
            if pair[1] > pair[0] {
                acc + volume
            } else if pair[1] < pair[0] {
                acc - volume
            } else {
                acc
            }
        })
}

/// Recent half-window average volume against the half-window before it,
/// with a ±20% band for "stable".
pub fn volume_trend(volumes: &[f64], window: usize) -> VolumeTrend {
    let half = window / 2;
    if half == 0 || volumes.len() < half * 2 {
        return VolumeTrend::Stable;
    }

    let recent_window = tail(volumes, half * 2);
    let prior = mean(&recent_window[..half]);
    let recent = mean(&recent_window[half..]);
    if prior <= 0.0 {
        return VolumeTrend::Stable;
    }

    let change = recent / prior - 1.0;
    if change > TREND_THRESHOLD {
        VolumeTrend::Increasing
    } else if change < -TREND_THRESHOLD {
        VolumeTrend::Decreasing
    } else {
        VolumeTrend::Stable
    }
}

/// Price direction over the trailing window against whether the window's
/// second-half volume beats its first half by more than 10%. `None` when the
/// first half traded no volume.
pub fn price_volume_divergence(closes: &[f64], volumes: &[f64], window: usize) -> Divergence {
    if window < 2 || closes.len() < window || volumes.len() < window {
        return Divergence::None;
    }

    let prices = tail(closes, window);
    let price_change = prices[window - 1] - prices[0];

    let vols = tail(volumes, window);
    let half = window / 2;
    let first = mean(&vols[..half]);
    let second = mean(&vols[half..]);
    // No volume to confirm or contradict the move.
    if first <= 0.0 {
        return Divergence::None;
    }
    let volume_rising = second > first * (1.0 + CONFIRMATION_THRESHOLD);

    if price_change > 0.0 && !volume_rising {
        Divergence::Bearish
    } else if price_change < 0.0 && volume_rising {
        Divergence::Bullish
    } else {
        Divergence::None
    }
}
