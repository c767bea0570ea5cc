//! Minimum-interval rate limiter for market data providers.
//!
//! Each provider gets a minimum spacing between consecutive requests. Callers
//! reserve the next free slot under a lock and then sleep outside of it, so
//! concurrent calls to one provider are spaced out in arrival order while
//! calls to different providers never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use crate::provider::MarketDataProvider;

/// Spacing applied to providers without an explicit configuration.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Thread-safe per-provider request spacer.
pub struct RateLimiter {
    /// Time slot most recently handed out, per provider.
    slots: Mutex<HashMap<String, Instant>>,
    /// Per-provider minimum interval overrides.
    intervals: Mutex<HashMap<String, Duration>>,
}

impl RateLimiter {
    /// Create a new rate limiter with no provider overrides.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            intervals: Mutex::new(HashMap::new()),
        }
    }

    /// Apply the minimum interval each provider declares in its capabilities.
    pub fn configure_providers(&self, providers: &[Arc<dyn MarketDataProvider>]) {
        for provider in providers {
            self.configure(provider.id(), provider.capabilities().min_interval);
        }
    }

    /// Lock the slots mutex, recovering from poison if necessary.
    ///
    /// The worst case after recovery is one request spaced slightly wrong,
    /// which is better than panicking.
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.slots.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter slots mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_intervals(&self) -> MutexGuard<'_, HashMap<String, Duration>> {
        self.intervals.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter intervals mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Set the minimum interval between two requests to `provider`.
    pub fn configure(&self, provider: &str, min_interval: Duration) {
        self.lock_intervals()
            .insert(provider.to_string(), min_interval);
    }

    /// Minimum interval currently applied to `provider`.
    pub fn min_interval(&self, provider: &str) -> Duration {
        self.lock_intervals()
            .get(provider)
            .copied()
            .unwrap_or(DEFAULT_MIN_INTERVAL)
    }

    /// Reserve the next request slot for `provider` and return it.
    ///
    /// The slot is `max(now, previous slot + interval)`. Reserving happens
    /// under the lock so two concurrent callers never get the same slot.
    fn reserve(&self, provider: &str) -> Instant {
        let interval = self.min_interval(provider);
        let now = Instant::now();
        let mut slots = self.lock_slots();
        let slot = match slots.get(provider) {
            Some(last) => (*last + interval).max(now),
            None => now,
        };
        slots.insert(provider.to_string(), slot);
        slot
    }

    /// Wait until a request to `provider` is allowed.
    ///
    /// Returns immediately for the first call and for calls arriving after
    /// the interval has already elapsed.
    pub async fn wait(&self, provider: &str) {
        let slot = self.reserve(provider);
        let now = Instant::now();
        if slot > now {
            debug!(
                "Rate limiter: waiting {:?} for provider '{}'",
                slot - now,
                provider
            );
            tokio::time::sleep_until(slot).await;
        }
    }

    /// Forget the last slot of a provider.
    pub fn reset(&self, provider: &str) {
        self.lock_slots().remove(provider);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
