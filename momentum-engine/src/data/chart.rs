use chrono::DateTime;
use common::{PriceSeries, QuoteError, QuoteSnapshot, Result};
use serde_json::Value;
use tracing::debug;

fn missing(path: &str) -> QuoteError {
    QuoteError::ExtractionFailed(format!("missing `{}`", path))
}

/// Decode a raw chart response
pub fn parse_chart(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Locate `chart.result[0]`, surfacing the API's own error object if present
pub fn chart_result(document: &Value) -> Result<&Value> {
    let chart = document.get("chart").ok_or_else(|| missing("chart"))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .or_else(|| error.get("code").and_then(Value::as_str))
            .unwrap_or("unknown error");
        return Err(QuoteError::ApiError(description.to_string()));
    }

    chart
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| QuoteError::ApiError("response carried no result".to_string()))
}

/// Extract valid closing prices from `indicators.quote[0].close`
///
/// Null and non-numeric entries are dropped; the remaining closes keep their
/// order. Fails when the path is absent, `quote` is empty, `close` is not an
/// array, or no entry is numeric.
pub fn extract_close_prices(result: &Value) -> Result<PriceSeries> {
    let quotes = result
        .get("indicators")
        .ok_or_else(|| missing("indicators"))?
        .get("quote")
        .ok_or_else(|| missing("indicators.quote"))?
        .as_array()
        .ok_or_else(|| {
            QuoteError::ExtractionFailed("`indicators.quote` is not an array".to_string())
        })?;

    let quote = quotes.first().ok_or_else(|| {
        QuoteError::ExtractionFailed("`indicators.quote` is empty".to_string())
    })?;

    let raw = quote
        .get("close")
        .ok_or_else(|| missing("indicators.quote[0].close"))?
        .as_array()
        .ok_or_else(|| {
            QuoteError::ExtractionFailed("`indicators.quote[0].close` is not an array".to_string())
        })?;

    let closes = PriceSeries::from_values(raw.iter().filter_map(Value::as_f64));
    if closes.is_empty() {
        return Err(QuoteError::ExtractionFailed(format!(
            "no numeric closes among {} entries",
            raw.len()
        )));
    }

    Ok(closes)
}

/// Read the latest quote fields from `meta`
///
/// `regularMarketPrice` is required; the previous close prefers
/// `chartPreviousClose` and falls back to `previousClose`.
pub fn extract_snapshot(result: &Value, symbol: &str) -> Result<QuoteSnapshot> {
    let meta = result.get("meta").ok_or_else(|| missing("meta"))?;
    let price = market_price(meta).ok_or_else(|| missing("meta.regularMarketPrice"))?;
    Ok(snapshot_from_meta(meta, symbol, price))
}

/// Like [`extract_snapshot`], but prices the snapshot at `last_close` when
/// `meta.regularMarketPrice` is absent
pub fn extract_snapshot_or_last_close(
    result: &Value,
    symbol: &str,
    last_close: f64,
) -> Result<QuoteSnapshot> {
    let meta = result.get("meta").ok_or_else(|| missing("meta"))?;
    let price = market_price(meta).unwrap_or_else(|| {
        debug!(symbol, last_close, "no market price in meta, using last close");
        last_close
    });
    Ok(snapshot_from_meta(meta, symbol, price))
}

fn market_price(meta: &Value) -> Option<f64> {
    meta.get("regularMarketPrice")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite())
}

fn snapshot_from_meta(meta: &Value, symbol: &str, price: f64) -> QuoteSnapshot {
    let previous_close = ["chartPreviousClose", "previousClose"]
        .iter()
        .find_map(|key| meta.get(*key).and_then(Value::as_f64))
        .filter(|p| p.is_finite());

    let symbol = meta
        .get("symbol")
        .and_then(Value::as_str)
        .unwrap_or(symbol);

    let mut snapshot = QuoteSnapshot::new(symbol, price, previous_close);
    snapshot.currency = meta
        .get("currency")
        .and_then(Value::as_str)
        .map(str::to_string);
    snapshot.market_time = meta
        .get("regularMarketTime")
        .and_then(Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    snapshot
}
