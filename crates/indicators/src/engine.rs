//! Indicator engine producing a full [`IndicatorSet`] from a price series.

use serde::{Deserialize, Serialize};

use crate::change::PriceChanges;
use crate::error::IndicatorError;
use crate::impl_::atr::ATR;
use crate::impl_::bollinger::{BollingerBands, BollingerResult};
use crate::impl_::ema::EMA;
use crate::impl_::macd::MACD;
use crate::impl_::roc::ROC;
use crate::impl_::rsi::{NEUTRAL_RSI, RSI};
use crate::impl_::sma::SMA;
use crate::impl_::stoch_rsi::StochRSI;
use crate::impl_::volume::{
    obv, price_volume_divergence, volume_24h, volume_ratio, volume_trend, VOLUME_WINDOW,
};
use crate::series::{DataSource, PriceSeries};
use crate::signals::{
    trend_strength, Divergence, PricePosition, TrendDirection, VolatilityLevel, VolumeStatus,
    VolumeTrend,
};
use crate::traits::{Indicator, MultiOutputIndicator};

/// Band offset of the minimal set, as a fraction of price.
const MINIMAL_BAND_PCT: f64 = 0.02;

/// The full indicator record for one asset and interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub current_price: f64,

    // Trend
    pub sma_7: f64,
    pub sma_14: f64,
    pub ema_9: f64,
    pub ema_21: f64,
    pub ema_50: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub trend_direction: TrendDirection,
    pub trend_strength: f64,

    // Momentum
    pub rsi_14: f64,
    pub stoch_rsi: f64,
    pub roc_10: f64,

    // Volatility
    pub atr_14: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub bb_width: f64,
    pub volatility_level: VolatilityLevel,

    // Volume
    pub volume_24h: f64,
    pub volume_ma_5: f64,
    pub volume_ma_20: f64,
    pub volume_ratio: f64,
    pub volume_status: VolumeStatus,
    pub obv: f64,
    pub volume_trend: VolumeTrend,
    pub price_volume_divergence: Divergence,

    // Multi-horizon change
    pub change_1h: f64,
    pub change_4h: f64,
    pub change_24h: f64,
    pub change_7d: f64,

    pub price_position: PricePosition,
    pub data_source: DataSource,
}

impl IndicatorSet {
    /// Defaults around `price` for when no usable series exists.
    ///
    /// Moving averages equal the price, oscillators sit at neutral, bands are
    /// ±2% and volume metrics are zero.
    pub fn minimal(price: f64, changes: PriceChanges) -> Self {
        let bands = BollingerResult::around(price, MINIMAL_BAND_PCT);
        Self {
            current_price: price,
            sma_7: price,
            sma_14: price,
            ema_9: price,
            ema_21: price,
            ema_50: price,
            macd: 0.0,
            macd_signal: 0.0,
            macd_histogram: 0.0,
            trend_direction: TrendDirection::Neutral,
            trend_strength: 0.0,
            rsi_14: NEUTRAL_RSI,
            stoch_rsi: NEUTRAL_RSI,
            roc_10: 0.0,
            atr_14: 0.0,
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            bb_width: bands.width_pct(),
            volatility_level: VolatilityLevel::Medium,
            volume_24h: 0.0,
            volume_ma_5: 0.0,
            volume_ma_20: 0.0,
            volume_ratio: 1.0,
            volume_status: VolumeStatus::Normal,
            obv: 0.0,
            volume_trend: VolumeTrend::Stable,
            price_volume_divergence: Divergence::None,
            change_1h: changes.change_1h,
            change_4h: changes.change_4h,
            change_24h: changes.change_24h,
            change_7d: changes.change_7d,
            price_position: PricePosition::Middle,
            data_source: DataSource::Minimal,
        }
    }
}

/// Computes [`IndicatorSet`]s with the standard periods.
///
/// Trend: SMA 7/14, EMA 9/21/50, MACD 12/26 with a 0.8 damped signal.
/// Momentum: RSI 14, Stochastic RSI 14, ROC 10. Volatility: ATR 14 and
/// Bollinger 20/2σ. Volume: MA 5/20, OBV, 10-bar trend and divergence.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma_7: SMA,
    sma_14: SMA,
    ema_9: EMA,
    ema_21: EMA,
    ema_50: EMA,
    macd: MACD,
    rsi: RSI,
    stoch_rsi: StochRSI,
    roc: ROC,
    atr: ATR,
    bollinger: BollingerBands,
    volume_ma_5: SMA,
    volume_ma_20: SMA,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            sma_7: SMA::new(7),
            sma_14: SMA::new(14),
            ema_9: EMA::new(9),
            ema_21: EMA::new(21),
            ema_50: EMA::new(50),
            macd: MACD::default(),
            rsi: RSI::new(14),
            stoch_rsi: StochRSI::new(14),
            roc: ROC::new(10),
            atr: ATR::new(14),
            bollinger: BollingerBands::default(),
            volume_ma_5: SMA::new(5),
            volume_ma_20: SMA::new(20),
        }
    }

    /// Points needed for every indicator to be past its warmup.
    pub fn full_warmup(&self) -> usize {
        self.ema_50.warmup_periods()
    }

    /// Compute the full set over `series`.
    ///
    /// Any non-empty series works; indicators short on history report their
    /// neutral defaults. `changes` comes from dedicated interval fetches.
    pub fn compute(
        &self,
        series: &PriceSeries,
        changes: PriceChanges,
    ) -> Result<IndicatorSet, IndicatorError> {
        if series.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let price = series.last_close();
        let closes = series.closes();
        let volumes = series.volumes();

        let ema_9 = self.ema_9.value(series);
        let ema_21 = self.ema_21.value(series);
        let ema_50 = self.ema_50.value(series);
        let macd = self.macd.compute_all(series);

        let atr = self.atr.value(series);
        let bands = self.bollinger.compute_all(series);

        let current_volume = volumes.last().copied().unwrap_or(0.0);
        let volume_ma_20 = self.volume_ma_20.of(volumes);
        let ratio = volume_ratio(current_volume, volume_ma_20);

        Ok(IndicatorSet {
            current_price: price,
            sma_7: self.sma_7.value(series),
            sma_14: self.sma_14.value(series),
            ema_9,
            ema_21,
            ema_50,
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            trend_direction: TrendDirection::classify(ema_9, ema_21, ema_50),
            trend_strength: trend_strength(ema_9, ema_21, ema_50),
            rsi_14: self.rsi.value(series),
            stoch_rsi: self.stoch_rsi.value(series),
            roc_10: self.roc.value(series),
            atr_14: atr,
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            bb_width: bands.width_pct(),
            volatility_level: VolatilityLevel::classify(atr, price),
            volume_24h: volume_24h(volumes, series.bars_per_day()),
            volume_ma_5: self.volume_ma_5.of(volumes),
            volume_ma_20,
            volume_ratio: ratio,
            volume_status: VolumeStatus::classify(ratio),
            obv: obv(closes, volumes),
            volume_trend: volume_trend(volumes, VOLUME_WINDOW),
            price_volume_divergence: price_volume_divergence(closes, volumes, VOLUME_WINDOW),
            change_1h: changes.change_1h,
            change_4h: changes.change_4h,
            change_24h: changes.change_24h,
            change_7d: changes.change_7d,
            price_position: PricePosition::classify(price, bands.upper, bands.lower),
            data_source: series.source(),
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
