//! Input series for the indicator engine.

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// Half-width of the synthetic high/low band used when only closes are known.
pub const APPROX_RANGE_PCT: f64 = 0.01;

/// Where an indicator set's input came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fine-grained OHLCV candles
    Candles,
    /// Coarser historical price points, high/low approximated
    Historical,
    /// No usable series; defaults around the current price
    Minimal,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candles => "candles",
            Self::Historical => "historical",
            Self::Minimal => "minimal",
        }
    }
}

/// One bar in `f64`. Indicators only read the range, close and volume, so
/// the open is not carried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column-oriented price series, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    close: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    volume: Vec<f64>,
    bars_per_day: usize,
    source: DataSource,
}

impl PriceSeries {
    /// Series from real OHLCV bars.
    ///
    /// `bars_per_day` is how many bars make up 24 hours at the bar interval;
    /// it sizes the `volume_24h` window.
    pub fn from_bars(bars: &[Bar], bars_per_day: usize) -> Self {
        Self {
            close: bars.iter().map(|b| b.close).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            volume: bars.iter().map(|b| b.volume).collect(),
            bars_per_day: bars_per_day.max(1),
            source: DataSource::Candles,
        }
    }

    /// Series from close prices only, with high/low set to close ± 1%.
    ///
    /// `volumes` may be empty when the source has no volume; otherwise it must
    /// match `closes` in length.
    pub fn from_closes(
        closes: Vec<f64>,
        volumes: Vec<f64>,
        bars_per_day: usize,
    ) -> Result<Self, IndicatorError> {
        let volume = if volumes.is_empty() {
            vec![0.0; closes.len()]
        } else if volumes.len() == closes.len() {
            volumes
        } else {
            return Err(IndicatorError::LengthMismatch(format!(
                "{} closes, {} volumes",
                closes.len(),
                volumes.len()
            )));
        };

        Ok(Self {
            high: closes.iter().map(|c| c * (1.0 + APPROX_RANGE_PCT)).collect(),
            low: closes.iter().map(|c| c * (1.0 - APPROX_RANGE_PCT)).collect(),
            close: closes,
            volume,
            bars_per_day: bars_per_day.max(1),
            source: DataSource::Historical,
        })
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn closes(&self) -> &[f64] {
        &self.close
    }

    pub fn highs(&self) -> &[f64] {
        &self.high
    }

    pub fn lows(&self) -> &[f64] {
        &self.low
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volume
    }

    pub fn bars_per_day(&self) -> usize {
        self.bars_per_day
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Most recent close, or 0 for an empty series.
    pub fn last_close(&self) -> f64 {
        self.close.last().copied().unwrap_or(0.0)
    }
}
