//! Conversion from canonical decimal models to indicator series.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use coinfeed_indicators::{Bar, IndicatorError, PriceSeries};
use coinfeed_market_data::{Candle, HistoricalPrice, Interval};

use super::market_constants::MINUTES_PER_DAY;

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub fn bars_per_day(interval: Interval) -> usize {
    (MINUTES_PER_DAY / interval.minutes().max(1)).max(1) as usize
}

pub fn candle_series(candles: &[Candle], interval: Interval) -> PriceSeries {
    let bars: Vec<Bar> = candles
        .iter()
        .map(|c| Bar {
            high: to_f64(c.high),
            low: to_f64(c.low),
            close: to_f64(c.close),
            volume: to_f64(c.volume),
        })
        .collect();
    PriceSeries::from_bars(&bars, bars_per_day(interval))
}

/// Series from historical points spanning `days` days.
///
/// Volume is only used when every point carries one.
pub fn history_series(
    points: &[HistoricalPrice],
    days: u32,
) -> Result<PriceSeries, IndicatorError> {
    let closes: Vec<f64> = points.iter().map(|p| to_f64(p.price)).collect();
    let volumes: Vec<f64> = points
        .iter()
        .map(|p| p.volume.map(to_f64))
        .collect::<Option<Vec<f64>>>()
        .unwrap_or_default();
    let per_day = (points.len() / days.max(1) as usize).max(1);
    PriceSeries::from_closes(closes, volumes, per_day)
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| to_f64(c.close)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinfeed_indicators::DataSource;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bars_per_day() {
        assert_eq!(bars_per_day(Interval::Minute3), 480);
        assert_eq!(bars_per_day(Interval::Hour4), 6);
        assert_eq!(bars_per_day(Interval::Week1), 1);
    }

    #[test]
    fn test_candle_series() {
        let candles = vec![
            Candle::new(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5), dec!(10)),
            Candle::new(60_000, dec!(1.5), dec!(3), dec!(1), dec!(2.5), dec!(20)),
        ];
        let series = candle_series(&candles, Interval::Hour1);
        assert_eq!(series.closes(), &[1.5, 2.5]);
        assert_eq!(series.highs(), &[2.0, 3.0]);
        assert_eq!(series.volumes(), &[10.0, 20.0]);
        assert_eq!(series.bars_per_day(), 24);
        assert_eq!(series.source(), DataSource::Candles);
    }

    #[test]
    fn test_history_series_drops_partial_volume() {
        let points = vec![
            HistoricalPrice {
                timestamp: 0,
                price: dec!(100),
                volume: Some(dec!(5)),
            },
            HistoricalPrice {
                timestamp: 1,
                price: dec!(101),
                volume: None,
            },
        ];
        let series = history_series(&points, 1).unwrap();
        assert_eq!(series.volumes(), &[0.0, 0.0]);
        assert_eq!(series.bars_per_day(), 2);
        assert_eq!(series.source(), DataSource::Historical);
    }
}
