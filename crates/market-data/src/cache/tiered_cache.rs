//! Two-window in-memory cache.
//!
//! An entry younger than the fresh window is served unconditionally. Between
//! the fresh and the stale window it is only served to callers that ask for
//! stale data. Past the stale window it is ignored but kept until the next
//! write or a full clear.

use std::collections::BTreeMap;
use std::time::Duration;

use dashmap::DashMap;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Default fresh window.
pub const DEFAULT_FRESH_TTL: Duration = Duration::from_secs(30);

/// Default stale-but-usable window.
pub const DEFAULT_STALE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
struct CacheEntry {
    payload: serde_json::Value,
    written_at: Instant,
}

/// A value read back from the cache.
#[derive(Clone, Debug, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub age: Duration,
    /// True when the value is past the fresh window
    pub stale: bool,
}

/// Age and usability of one cache entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntryStatus {
    /// Age in seconds, rounded to one decimal
    pub age_seconds: f64,
    pub fresh: bool,
    pub stale_usable: bool,
}

/// Concurrent key/value cache with a fresh and a stale window.
///
/// Payloads are stored as JSON values so one table can hold prices, candles,
/// summaries and indicator sets side by side.
pub struct TieredCache {
    entries: DashMap<String, CacheEntry>,
    fresh_ttl: Duration,
    stale_ttl: Duration,
}

impl TieredCache {
    pub fn new(fresh_ttl: Duration, stale_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            fresh_ttl,
            stale_ttl: stale_ttl.max(fresh_ttl),
        }
    }

    pub fn fresh_ttl(&self) -> Duration {
        self.fresh_ttl
    }

    pub fn stale_ttl(&self) -> Duration {
        self.stale_ttl
    }

    /// Read `key`.
    ///
    /// Returns `None` when the key is missing, too old for the request, or
    /// holds a payload that doesn't deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, allow_stale: bool) -> Option<Cached<T>> {
        let (payload, age) = {
            let entry = self.entries.get(key)?;
            (entry.payload.clone(), entry.written_at.elapsed())
        };

        let stale = if age < self.fresh_ttl {
            false
        } else if allow_stale && age < self.stale_ttl {
            warn!("Serving stale cache for '{}' (age {:.1}s)", key, age.as_secs_f64());
            true
        } else {
            return None;
        };

        match serde_json::from_value(payload) {
            Ok(value) => Some(Cached { value, age, stale }),
            Err(e) => {
                warn!("Cache entry '{}' has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(payload) => {
                debug!("Cache set '{}'", key);
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        payload,
                        written_at: Instant::now(),
                    },
                );
            }
            Err(e) => warn!("Failed to cache '{}': {}", key, e),
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!("Cache cleared ({} entries)", count);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Age and usability of every entry, keyed by cache key.
    pub fn status(&self) -> BTreeMap<String, CacheEntryStatus> {
        self.entries
            .iter()
            .map(|entry| {
                let age = entry.written_at.elapsed();
                let status = CacheEntryStatus {
                    age_seconds: (age.as_secs_f64() * 10.0).round() / 10.0,
                    fresh: age < self.fresh_ttl,
                    stale_usable: age < self.stale_ttl,
                };
                (entry.key().clone(), status)
            })
            .collect()
    }
}

impl Default for TieredCache {
    fn default() -> Self {
        Self::new(DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL)
    }
}
