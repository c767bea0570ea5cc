//! Categorical readings derived from indicator values.

use serde::{Deserialize, Serialize};

/// EMA stack alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendDirection {
    /// Bullish iff fast > mid > slow, bearish iff fast < mid < slow.
    pub fn classify(fast: f64, mid: f64, slow: f64) -> Self {
        if fast > mid && mid > slow {
            Self::Bullish
        } else if fast < mid && mid < slow {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

/// Trend strength in -100..=100.
///
/// With a strictly aligned EMA stack the strength is 50 plus the fast-to-slow
/// spread (in percent, capped at 50), signed by direction. Otherwise it is the
/// raw spread clamped to the range.
pub fn trend_strength(fast: f64, mid: f64, slow: f64) -> f64 {
    let spread = if slow == 0.0 {
        0.0
    } else {
        (fast - slow) / slow * 100.0
    };

    match TrendDirection::classify(fast, mid, slow) {
        TrendDirection::Bullish => 50.0 + spread.abs().min(50.0),
        TrendDirection::Bearish => -(50.0 + spread.abs().min(50.0)),
        TrendDirection::Neutral => spread.clamp(-100.0, 100.0),
    }
}

/// ATR relative to price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityLevel {
    High,
    Medium,
    Low,
}

impl VolatilityLevel {
    /// High above 3% of price, low under 1%.
    pub fn classify(atr: f64, price: f64) -> Self {
        if price <= 0.0 {
            return Self::Medium;
        }
        let ratio = atr / price;
        if ratio > 0.03 {
            Self::High
        } else if ratio < 0.01 {
            Self::Low
        } else {
            Self::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Where the price sits inside the Bollinger band range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    Upper,
    Middle,
    Lower,
}

impl PricePosition {
    /// Upper above 70% of the band width, lower below 30%.
    pub fn classify(price: f64, upper: f64, lower: f64) -> Self {
        let range = upper - lower;
        if range <= 0.0 {
            return Self::Middle;
        }
        let position = (price - lower) / range;
        if position > 0.7 {
            Self::Upper
        } else if position < 0.3 {
            Self::Lower
        } else {
            Self::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Middle => "middle",
            Self::Lower => "lower",
        }
    }
}

/// Current volume against its 20-period average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeStatus {
    High,
    Normal,
    Low,
}

impl VolumeStatus {
    /// High above a 1.5x ratio, low under 0.5x.
    pub fn classify(ratio: f64) -> Self {
        if ratio > 1.5 {
            Self::High
        } else if ratio < 0.5 {
            Self::Low
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

/// Direction of recent volume against the half-window before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl VolumeTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// Price move without matching volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    /// Price falling while volume rises
    Bullish,
    /// Price rising without volume confirmation
    Bearish,
    None,
}

impl Divergence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction() {
        assert_eq!(TrendDirection::classify(3.0, 2.0, 1.0), TrendDirection::Bullish);
        assert_eq!(TrendDirection::classify(1.0, 2.0, 3.0), TrendDirection::Bearish);
        assert_eq!(TrendDirection::classify(2.0, 3.0, 1.0), TrendDirection::Neutral);
        assert_eq!(TrendDirection::classify(1.0, 1.0, 1.0), TrendDirection::Neutral);
    }

    #[test]
    fn test_trend_strength() {
        // Aligned, 2% spread
        assert!((trend_strength(102.0, 101.0, 100.0) - 52.0).abs() < 1e-9);
        assert!((trend_strength(98.0, 99.0, 100.0) + 52.0).abs() < 1e-9);
        // Aligned with a huge spread caps at 100
        assert_eq!(trend_strength(300.0, 200.0, 100.0), 100.0);
        // Misaligned: raw spread
        assert!((trend_strength(101.0, 103.0, 100.0) - 1.0).abs() < 1e-9);
        assert_eq!(trend_strength(1.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_volatility_level() {
        assert_eq!(VolatilityLevel::classify(4.0, 100.0), VolatilityLevel::High);
        assert_eq!(VolatilityLevel::classify(0.5, 100.0), VolatilityLevel::Low);
        assert_eq!(VolatilityLevel::classify(2.0, 100.0), VolatilityLevel::Medium);
    }

    #[test]
    fn test_price_position() {
        assert_eq!(PricePosition::classify(109.0, 110.0, 90.0), PricePosition::Upper);
        assert_eq!(PricePosition::classify(100.0, 110.0, 90.0), PricePosition::Middle);
        assert_eq!(PricePosition::classify(91.0, 110.0, 90.0), PricePosition::Lower);
        assert_eq!(PricePosition::classify(5.0, 5.0, 5.0), PricePosition::Middle);
    }

    #[test]
    fn test_volume_status() {
        assert_eq!(VolumeStatus::classify(3.0), VolumeStatus::High);
        assert_eq!(VolumeStatus::classify(1.0), VolumeStatus::Normal);
        assert_eq!(VolumeStatus::classify(0.4), VolumeStatus::Low);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Divergence::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&VolumeTrend::Increasing).unwrap(),
            "\"increasing\""
        );
    }
}
