use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical candle interval vocabulary.
///
/// Providers translate to and from their own encodings; see each adapter's
/// `interval_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Interval {
    pub const ALL: [Interval; 12] = [
        Interval::Minute1,
        Interval::Minute3,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Hour2,
        Interval::Hour4,
        Interval::Hour6,
        Interval::Hour12,
        Interval::Day1,
        Interval::Week1,
    ];

    /// Canonical string form (`"3m"`, `"4h"`, `"1d"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour12 => "12h",
            Self::Day1 => "1d",
            Self::Week1 => "1w",
        }
    }

    pub fn minutes(&self) -> u64 {
        match self {
            Self::Minute1 => 1,
            Self::Minute3 => 3,
            Self::Minute5 => 5,
            Self::Minute15 => 15,
            Self::Minute30 => 30,
            Self::Hour1 => 60,
            Self::Hour2 => 120,
            Self::Hour4 => 240,
            Self::Hour6 => 360,
            Self::Hour12 => 720,
            Self::Day1 => 1440,
            Self::Week1 => 10080,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes() * 60)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an interval string is not in the canonical vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown interval: {0}")]
pub struct ParseIntervalError(pub String);

impl FromStr for Interval {
    type Err = ParseIntervalError;

    /// Accepts the canonical form plus the common upper-case hour/day/week
    /// spellings used by exchanges (`"1H"`, `"1D"`, `"1W"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = match trimmed.chars().last() {
            Some('H') | Some('D') | Some('W') => trimmed.to_ascii_lowercase(),
            _ => trimmed.to_string(),
        };
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == normalized)
            .ok_or_else(|| ParseIntervalError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_canonical_strings() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
    }

    #[test]
    fn test_exchange_spellings() {
        assert_eq!("4H".parse::<Interval>().unwrap(), Interval::Hour4);
        assert_eq!("1D".parse::<Interval>().unwrap(), Interval::Day1);
    }

    #[test]
    fn test_minutes_are_case_sensitive() {
        // "1M" is a month on most exchanges, never a minute.
        assert!("1M".parse::<Interval>().is_err());
        assert!("7x".parse::<Interval>().is_err());
    }

    #[test]
    fn test_duration() {
        assert_eq!(Interval::Minute3.duration(), Duration::from_secs(180));
        assert_eq!(Interval::Day1.duration(), Duration::from_secs(86_400));
    }
}
