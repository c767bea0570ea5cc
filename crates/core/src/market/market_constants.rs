/// Source tag of prices served from the simulated baseline.
pub const SIMULATED_SOURCE: &str = "SIMULATED";

/// Fewest historical points the indicator fallback accepts.
pub const MIN_HISTORY_POINTS: usize = 14;

/// Hourly candles fetched for the 1h change.
pub const CHANGE_1H_CANDLES: usize = 2;

/// Four-hour candles fetched for the 4h change.
pub const CHANGE_4H_CANDLES: usize = 2;

/// Daily candles fetched for the 24h and 7d changes.
pub const CHANGE_DAILY_CANDLES: usize = 8;

pub const MINUTES_PER_DAY: u64 = 1440;
