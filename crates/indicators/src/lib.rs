//! Coinfeed Indicators
//!
//! Technical indicator engine over candle and historical price series.
//! Everything here is synchronous and works on `f64` columns; converting
//! from canonical decimal models happens at the caller.
//!
//! # Features
//! - Indicator traits with latest-value computation
//! - Multi-output indicators (MACD, Bollinger Bands)
//! - Categorical readings (trend, volatility, volume, price position)
//! - A full [`IndicatorSet`] with graceful degradation on short histories
//!
//! # Available Indicators
//! - SMA / EMA: Simple and Exponential Moving Average
//! - MACD: with a damped signal line
//! - RSI / Stochastic RSI / ROC: momentum
//! - ATR / Bollinger Bands: volatility
//! - Volume MA, ratio, OBV, trend and price-volume divergence

pub mod change;
pub mod engine;
pub mod error;
pub mod impl_;
pub mod series;
pub mod signals;
pub mod traits;

// Re-export main types
pub use change::{change_over, percent_change, PriceChanges};
pub use engine::{IndicatorEngine, IndicatorSet};
pub use error::IndicatorError;
pub use series::{Bar, DataSource, PriceSeries};
pub use signals::{
    trend_strength, Divergence, PricePosition, TrendDirection, VolatilityLevel, VolumeStatus,
    VolumeTrend,
};
pub use traits::{Indicator, MultiOutputIndicator};

// Re-export indicator implementations
pub use impl_::{
    atr::ATR,
    bollinger::{BollingerBands, BollingerResult},
    ema::EMA,
    macd::{MacdResult, MACD},
    roc::ROC,
    rsi::RSI,
    sma::SMA,
    stoch_rsi::StochRSI,
    volume::{obv, price_volume_divergence, volume_24h, volume_ratio, volume_trend},
};
