//! Service configuration read from `COINFEED_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use log::warn;

use coinfeed_market_data::cache::{DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL};
use coinfeed_market_data::http::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use coinfeed_market_data::{Asset, Interval};

use crate::errors::{CoreError, Result};

pub const ENV_FRESH_SECS: &str = "COINFEED_CACHE_FRESH_SECS";
pub const ENV_STALE_SECS: &str = "COINFEED_CACHE_STALE_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "COINFEED_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_MS: &str = "COINFEED_RETRY_BASE_MS";
pub const ENV_INDICATOR_INTERVAL: &str = "COINFEED_INDICATOR_INTERVAL";
pub const ENV_CANDLE_LIMIT: &str = "COINFEED_CANDLE_LIMIT";
pub const ENV_MIN_CANDLES: &str = "COINFEED_MIN_CANDLES";
pub const ENV_HISTORY_DAYS: &str = "COINFEED_HISTORY_DAYS";
pub const ENV_ASSETS: &str = "COINFEED_ASSETS";

/// Tunables for [`MarketDataService`](crate::market::MarketDataService).
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    /// Age below which a cache entry is served unconditionally
    pub fresh_ttl: Duration,
    /// Age below which a cache entry may still be served as a fallback
    pub stale_ttl: Duration,
    /// Attempts per HTTP request
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_retry_delay: Duration,
    /// Candle interval indicators are computed on
    pub indicator_interval: Interval,
    /// Candles fetched for indicator computation
    pub candle_limit: usize,
    /// Fewer candles than this switches indicators to historical prices
    pub min_candles: usize,
    /// Lookback of the historical fallback series
    pub history_days: u32,
    /// Assets covered by snapshots
    pub assets: Vec<Asset>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            fresh_ttl: DEFAULT_FRESH_TTL,
            stale_ttl: DEFAULT_STALE_TTL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_retry_delay: DEFAULT_BASE_DELAY,
            indicator_interval: Interval::Minute3,
            candle_limit: 200,
            min_candles: 50,
            history_days: 60,
            assets: Asset::ALL.to_vec(),
        }
    }
}

impl CoreConfig {
    /// Load from the process environment, after reading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their default with a warning. An
    /// unknown asset symbol or a stale window shorter than the fresh one is an
    /// error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fresh_ttl = Duration::from_secs(parse_or(
            &lookup,
            ENV_FRESH_SECS,
            defaults.fresh_ttl.as_secs(),
        ));
        let stale_ttl = Duration::from_secs(parse_or(
            &lookup,
            ENV_STALE_SECS,
            defaults.stale_ttl.as_secs(),
        ));
        if stale_ttl < fresh_ttl {
            return Err(CoreError::InvalidConfigValue(format!(
                "{} ({}s) is shorter than {} ({}s)",
                ENV_STALE_SECS,
                stale_ttl.as_secs(),
                ENV_FRESH_SECS,
                fresh_ttl.as_secs()
            )));
        }

        let assets = match lookup(ENV_ASSETS) {
            Some(value) if !value.trim().is_empty() => Asset::parse_list(&value)?,
            _ => defaults.assets,
        };

        Ok(Self {
            fresh_ttl,
            stale_ttl,
            max_attempts: parse_or(&lookup, ENV_MAX_ATTEMPTS, defaults.max_attempts).max(1),
            base_retry_delay: Duration::from_millis(parse_or(
                &lookup,
                ENV_RETRY_BASE_MS,
                defaults.base_retry_delay.as_millis() as u64,
            )),
            indicator_interval: parse_or(&lookup, ENV_INDICATOR_INTERVAL, defaults.indicator_interval),
            candle_limit: parse_or(&lookup, ENV_CANDLE_LIMIT, defaults.candle_limit),
            min_candles: parse_or(&lookup, ENV_MIN_CANDLES, defaults.min_candles),
            history_days: parse_or(&lookup, ENV_HISTORY_DAYS, defaults.history_days),
            assets,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {}={:?}, using default {:?}", key, raw, default);
                default
            }
        },
        None => default,
    }
}
