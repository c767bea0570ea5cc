//! Payload parsing helpers shared by the adapters.
//!
//! Providers disagree on whether numbers travel as JSON numbers or strings,
//! so every numeric field goes through [`decimal`] before it reaches a model.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::MarketDataError;

/// Deserialize a provider body, mapping failures to `MalformedResponse`.
pub(crate) fn json<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::malformed(provider, e.to_string()))
}

/// Parse a decimal from text, accepting scientific notation (`1.2e-5`).
pub(crate) fn decimal_str(provider: &str, text: &str) -> Result<Decimal, MarketDataError> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| MarketDataError::malformed(provider, format!("invalid number '{}'", text)))
}

/// Parse a decimal from a JSON string or number.
pub(crate) fn decimal(provider: &str, value: &Value) -> Result<Decimal, MarketDataError> {
    match value {
        Value::String(s) => decimal_str(provider, s),
        Value::Number(n) => decimal_str(provider, &n.to_string()),
        other => Err(MarketDataError::malformed(
            provider,
            format!("expected number, got {}", other),
        )),
    }
}

/// Like [`decimal`] but treats `null`, empty strings and garbage as absent.
pub(crate) fn decimal_opt(provider: &str, value: Option<&Value>) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => decimal(provider, v).ok(),
    }
}

/// Optional text field; absent, empty or unparsable text yields `None`.
pub(crate) fn decimal_text(provider: &str, text: Option<&str>) -> Option<Decimal> {
    text.filter(|t| !t.trim().is_empty())
        .and_then(|t| decimal_str(provider, t).ok())
}

/// Parse an integer timestamp from a JSON string or number.
pub(crate) fn timestamp(provider: &str, value: &Value) -> Result<i64, MarketDataError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| MarketDataError::malformed(provider, format!("invalid timestamp {}", value)))
}

/// Percent change from `from` to `to`, zero when `from` is not positive.
pub fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (to - from) / from * Decimal::ONE_HUNDRED
}

/// Field `index` of a candle row.
pub(crate) fn field<'a>(provider: &str, row: &'a [Value], index: usize) -> Result<&'a Value, MarketDataError> {
    row.get(index).ok_or_else(|| {
        MarketDataError::malformed(provider, format!("candle row has {} fields", row.len()))
    })
}
