//! Scenario tests for the indicator engine.

use coinfeed_indicators::{
    volume_ratio, Bar, DataSource, Divergence, IndicatorEngine, PriceChanges, PriceSeries,
    VolumeStatus, VolumeTrend, RSI,
};

fn daily_bars(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(volumes)
        .map(|(&close, &volume)| Bar {
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume,
        })
        .collect()
}

#[test]
fn rsi_of_fourteen_alternating_daily_closes() {
    let closes = [
        100.0, 101.0, 99.0, 102.0, 98.0, 103.0, 97.0, 104.0, 96.0, 105.0, 95.0, 106.0, 94.0, 107.0,
    ];
    let rsi = RSI::new(14).of(&closes);
    assert!((0.0..=100.0).contains(&rsi));
    assert!((rsi - 700.0 / 13.0).abs() < 1e-9);

    assert_eq!(RSI::new(14).of(&closes[..5]), 50.0);
}

#[test]
fn volume_spike_reads_high() {
    let ratio = volume_ratio(300.0, 100.0);
    assert!((ratio - 3.0).abs() < 1e-12);
    assert_eq!(VolumeStatus::classify(ratio), VolumeStatus::High);
}

#[test]
fn volume_spike_in_a_series() {
    // 19 bars of 100 then 2000: MA20 = 195, ratio ~10.3
    let closes = vec![100.0; 20];
    let mut volumes = vec![100.0; 19];
    volumes.push(2_000.0);
    let series = PriceSeries::from_bars(&daily_bars(&closes, &volumes), 1);
    let set = IndicatorEngine::new()
        .compute(&series, PriceChanges::default())
        .unwrap();

    assert!((set.volume_ma_20 - 195.0).abs() < 1e-9);
    assert_eq!(set.volume_status, VolumeStatus::High);
    assert_eq!(set.volume_trend, VolumeTrend::Increasing);
    assert_eq!(set.volume_24h, 2_000.0);
}

#[test]
fn historical_series_degrades_gracefully() {
    let closes: Vec<f64> = (0..16).map(|i| 3_000.0 - i as f64 * 10.0).collect();
    let volumes = vec![1.0e9; 16];
    let series = PriceSeries::from_closes(closes, volumes, 1).unwrap();
    let set = IndicatorEngine::new()
        .compute(&series, PriceChanges::default())
        .unwrap();

    assert_eq!(set.data_source, DataSource::Historical);
    // EMA50 falls back to the last close with so few points
    assert_eq!(set.ema_50, 2_850.0);
    // Under 20 points: ±2% bands around the last close
    assert!((set.bb_upper - 2_907.0).abs() < 1e-6);
    assert!(set.rsi_14 < 1e-9);
}

#[test]
fn history_without_volume_reports_no_divergence() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let series = PriceSeries::from_closes(closes, vec![], 1).unwrap();
    let set = IndicatorEngine::new()
        .compute(&series, PriceChanges::default())
        .unwrap();

    assert_eq!(set.data_source, DataSource::Historical);
    assert_eq!(set.volume_trend, VolumeTrend::Stable);
    assert_eq!(set.price_volume_divergence, Divergence::None);
}
