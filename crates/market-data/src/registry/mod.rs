//! Provider registry module.
//!
//! This module provides orchestration for market data providers, including:
//! - Provider priority ordering and capability filtering
//! - Fallback across providers with fetch diagnostics
//! - Minimum request spacing per provider

mod provider_registry;
mod rate_limiter;
mod skip_reason;

pub use provider_registry::ProviderRegistry;
pub use rate_limiter::{RateLimiter, DEFAULT_MIN_INTERVAL};
pub use skip_reason::{FetchDiagnostics, ProviderAttempt, SkipReason};
