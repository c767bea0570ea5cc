use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use coinfeed_core::market::market_constants::SIMULATED_SOURCE;
use coinfeed_core::{
    CoreConfig, CoreError, MarketDataService, MarketDataServiceTrait, SimulatedQuote,
};
use coinfeed_indicators::DataSource;
use coinfeed_market_data::{
    Asset, Candle, HistoricalPrice, Interval, MarketDataError, MarketDataProvider, MarketSummary,
    PricePoint, ProviderCapabilities, ProviderRegistry,
};

/// Provider answering every operation from canned sizes, with a switch to
/// simulate an outage.
struct MockProvider {
    candles: usize,
    history: usize,
    failing: AtomicBool,
    price_calls: AtomicUsize,
}

impl MockProvider {
    fn new(candles: usize, history: usize) -> Arc<Self> {
        Arc::new(Self {
            candles,
            history,
            failing: AtomicBool::new(false),
            price_calls: AtomicUsize::new(0),
        })
    }

    fn down() -> Arc<Self> {
        let mock = Self::new(0, 0);
        mock.set_failing(true);
        mock
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), MarketDataError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MarketDataError::RetriesExhausted {
                provider: "MOCK".to_string(),
                attempts: 3,
                last_error: "HTTP 503".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            prices: true,
            candles: true,
            summary: true,
            history: true,
            intervals: &Interval::ALL,
            min_interval: Duration::ZERO,
        }
    }

    fn symbol(&self, asset: Asset) -> Option<&'static str> {
        Some(asset.symbol())
    }

    async fn current_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PricePoint>, MarketDataError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(assets
            .iter()
            .map(|&a| (a, PricePoint::new(a, dec!(100), dec!(1), "MOCK")))
            .collect())
    }

    async fn candles(
        &self,
        _asset: Asset,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.check()?;
        let step = interval.minutes() as i64 * 60_000;
        Ok((0..self.candles.min(limit))
            .map(|i| {
                let close = Decimal::from(100 + i as i64);
                Candle::new(
                    i as i64 * step,
                    close,
                    close + dec!(1),
                    close - dec!(1),
                    close,
                    dec!(1000),
                )
            })
            .collect())
    }

    async fn market_summary(&self, asset: Asset) -> Result<MarketSummary, MarketDataError> {
        self.check()?;
        Ok(MarketSummary::new(asset, dec!(100), "MOCK"))
    }

    async fn price_history(
        &self,
        _asset: Asset,
        _days: u32,
    ) -> Result<Vec<HistoricalPrice>, MarketDataError> {
        self.check()?;
        Ok((0..self.history)
            .map(|i| HistoricalPrice {
                timestamp: i as i64 * 86_400_000,
                price: Decimal::from(200 + i as i64),
                volume: Some(dec!(5000)),
            })
            .collect())
    }
}

fn service(mock: Arc<MockProvider>) -> MarketDataService {
    let provider: Arc<dyn MarketDataProvider> = mock;
    let registry = Arc::new(ProviderRegistry::new(vec![provider]));
    MarketDataService::new(registry, CoreConfig::default())
}

#[tokio::test]
async fn test_prices_fall_back_to_simulated_baseline() {
    let mock = MockProvider::down();
    let service = service(mock.clone());

    let prices = service.get_current_prices(&Asset::ALL).await;
    assert_eq!(prices.len(), Asset::ALL.len());
    assert!(prices.values().all(|p| p.source == SIMULATED_SOURCE));
    assert_eq!(prices[&Asset::Btc].price, dec!(97000));

    // Simulated prices are not cached, so the providers are asked again.
    service.get_current_prices(&Asset::ALL).await;
    assert_eq!(mock.price_calls(), 2);
    assert!(service.cache_status().is_empty());
}

#[tokio::test]
async fn test_fresh_prices_are_served_from_cache() {
    let mock = MockProvider::new(0, 0);
    let service = service(mock.clone());

    let first = service.get_current_prices(&[Asset::Btc, Asset::Eth]).await;
    let second = service.get_current_prices(&[Asset::Eth, Asset::Btc]).await;

    assert_eq!(first, second);
    assert_eq!(mock.price_calls(), 1);
    assert!(service.cache_status().contains_key("prices:BTC,ETH"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_prices_outlive_an_outage() {
    let mock = MockProvider::new(0, 0);
    let service = service(mock.clone());

    service.get_current_prices(&[Asset::Sol]).await;
    mock.set_failing(true);

    tokio::time::advance(Duration::from_secs(60)).await;
    let stale = service.get_current_prices(&[Asset::Sol]).await;
    assert_eq!(stale[&Asset::Sol].source, "MOCK");
    assert_eq!(mock.price_calls(), 2);

    tokio::time::advance(Duration::from_secs(300)).await;
    let simulated = service.get_current_prices(&[Asset::Sol]).await;
    assert_eq!(simulated[&Asset::Sol].source, SIMULATED_SOURCE);
    assert_eq!(simulated[&Asset::Sol].price, dec!(220));
}

#[tokio::test]
async fn test_empty_request_returns_empty_map() {
    let service = service(MockProvider::new(0, 0));
    assert!(service.get_current_prices(&[]).await.is_empty());
}

#[tokio::test]
async fn test_unknown_symbol_is_reported() {
    let service = service(MockProvider::new(0, 0));

    let err = service
        .get_current_prices_by_symbol(&["BTC".to_string(), "PEPE".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::MarketData(MarketDataError::UnsupportedAsset(_))
    ));

    let prices = service
        .get_current_prices_by_symbol(&["eth".to_string()])
        .await
        .unwrap();
    assert!(prices.contains_key(&Asset::Eth));
}

#[tokio::test]
async fn test_candles_are_empty_on_total_failure() {
    let service = service(MockProvider::down());
    assert!(service
        .get_candles(Asset::Btc, Interval::Minute3, 100)
        .await
        .is_empty());
    assert!(service.get_market_summary(Asset::Btc).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stale_candles_outlive_an_outage() {
    let mock = MockProvider::new(30, 0);
    let service = service(mock.clone());

    let live = service.get_candles(Asset::Eth, Interval::Hour1, 30).await;
    assert_eq!(live.len(), 30);
    mock.set_failing(true);

    tokio::time::advance(Duration::from_secs(120)).await;
    assert_eq!(service.get_candles(Asset::Eth, Interval::Hour1, 30).await, live);

    tokio::time::advance(Duration::from_secs(240)).await;
    assert!(service
        .get_candles(Asset::Eth, Interval::Hour1, 30)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_indicators_from_candles() {
    let service = service(MockProvider::new(200, 0));

    let set = service.get_indicators(Asset::Btc, Interval::Minute3).await;
    assert_eq!(set.data_source, DataSource::Candles);
    assert_eq!(set.current_price, 299.0);
    assert!(set.change_1h > 0.0);
    assert!(set.change_7d > 0.0);
    assert!(service.cache_status().contains_key("indicators:BTC:3m"));
}

#[tokio::test]
async fn test_indicators_fall_back_to_history() {
    let service = service(MockProvider::new(10, 60));

    let set = service.get_indicators(Asset::Eth, Interval::Minute3).await;
    assert_eq!(set.data_source, DataSource::Historical);
    assert_eq!(set.current_price, 259.0);
    assert_eq!(set.volume_ma_20, 5000.0);
    assert!(service.cache_status().contains_key("historical:ETH:60"));
}

#[tokio::test]
async fn test_indicators_degrade_to_minimal() {
    let service = service(MockProvider::new(5, 5));

    let set = service.get_indicators(Asset::Btc, Interval::Minute3).await;
    assert_eq!(set.data_source, DataSource::Minimal);
    // The provider still answers prices.
    assert_eq!(set.current_price, 100.0);
    assert_eq!(set.rsi_14, 50.0);
    assert!(!service.cache_status().contains_key("indicators:BTC:3m"));
}

#[tokio::test]
async fn test_minimal_indicators_use_simulated_price_when_all_down() {
    let service = service(MockProvider::down());

    let set = service.get_indicators(Asset::Doge, Interval::Minute3).await;
    assert_eq!(set.data_source, DataSource::Minimal);
    assert!((set.current_price - 0.4).abs() < 1e-12);
    assert_eq!(set.change_24h, 0.0);
}

#[tokio::test]
async fn test_simulated_overrides() {
    let service = service(MockProvider::down());
    service.update_simulated_prices(HashMap::from([(
        Asset::Btc,
        SimulatedQuote::new(dec!(50000), dec!(-4.2)),
    )]));

    let prices = service.get_current_prices(&[Asset::Btc, Asset::Eth]).await;
    assert_eq!(prices[&Asset::Btc].price, dec!(50000));
    assert_eq!(prices[&Asset::Btc].change_24h, dec!(-4.2));
    assert_eq!(prices[&Asset::Eth].price, dec!(3600));
}

#[tokio::test]
async fn test_clear_cache() {
    let service = service(MockProvider::new(60, 0));
    service.get_current_prices(&[Asset::Xrp]).await;
    service.get_candles(Asset::Xrp, Interval::Hour4, 60).await;

    let status = service.cache_status();
    assert_eq!(status.len(), 2);
    assert!(status.values().all(|s| s.fresh && s.stale_usable));

    service.clear_cache();
    assert!(service.cache_status().is_empty());
}

#[tokio::test]
async fn test_snapshot_covers_requested_assets() {
    let service = service(MockProvider::new(200, 0));

    let snapshot = service.get_snapshot(&[Asset::Btc, Asset::Sol]).await;
    assert_eq!(snapshot.assets.len(), 2);
    let sol = &snapshot.assets[&Asset::Sol];
    assert_eq!(sol.price.as_ref().map(|p| p.price), Some(dec!(100)));
    assert!(sol.summary.is_some());
    assert_eq!(sol.indicators.data_source, DataSource::Candles);
}
