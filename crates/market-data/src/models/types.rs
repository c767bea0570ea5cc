use std::borrow::Cow;

/// Provider identifier - mostly static constants ("OKX", "COINGECKO")
pub type ProviderId = Cow<'static, str>;

/// Epoch milliseconds, UTC
pub type TimestampMs = i64;
