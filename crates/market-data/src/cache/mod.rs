//! In-memory result cache with fresh and stale windows.

pub mod keys;
mod tiered_cache;

pub use tiered_cache::{
    CacheEntryStatus, Cached, TieredCache, DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL,
};
