use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chronological closing prices, oldest first. Every element is finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    /// Build a series from raw values, dropping NaN and infinities
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self(values.into_iter().filter(|v| v.is_finite()).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

impl From<PriceSeries> for Vec<f64> {
    fn from(series: PriceSeries) -> Self {
        series.0
    }
}

/// MACD line vs. signal line transition between the last two observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossover {
    Bullish,
    Bearish,
    None,
}

/// Last two matured MACD/signal points with derived facts.
///
/// `valid == false` means the series was too short; every other field is then
/// zero/false and must not be displayed. `percent_valid == false` means the
/// reference price was zero and the percent fields are a neutral 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd_last: f64,
    pub macd_prev: f64,
    pub signal_last: f64,
    pub signal_prev: f64,
    pub macd_percent: f64,
    pub signal_percent: f64,
    pub percent_valid: bool,
    pub bullish_cross: bool,
    pub bearish_cross: bool,
    pub valid: bool,
}

impl MacdResult {
    pub fn crossover(&self) -> Crossover {
        if self.bullish_cross {
            Crossover::Bullish
        } else if self.bearish_cross {
            Crossover::Bearish
        } else {
            Crossover::None
        }
    }
}

/// Present MACD/signal values as a percentage of the reference price
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdPercent {
    pub macd_percent: f64,
    pub signal_percent: f64,
    /// False when the reference price was zero; the percentages are then 0.0
    pub percent_valid: bool,
    /// False when the series was too short
    pub valid: bool,
}

/// Latest quote fields read from a response's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_time: Option<DateTime<Utc>>,
}

impl QuoteSnapshot {
    pub fn new(symbol: impl Into<String>, price: f64, previous_close: Option<f64>) -> Self {
        let change = previous_close.map(|prev| price - prev);
        let change_pct = match (change, previous_close) {
            (Some(diff), Some(prev)) if prev != 0.0 => Some(diff / prev * 100.0),
            _ => None,
        };

        Self {
            symbol: symbol.into(),
            currency: None,
            price,
            previous_close,
            change,
            change_pct,
            market_time: None,
        }
    }
}

/// Outcome of one refresh for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    InsufficientHistory { required: usize, actual: usize },
    ApiError { message: String },
    ExtractionFailed { message: String },
}

/// One display row of the monitor table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRow {
    pub symbol: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<QuoteSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<MacdResult>,
}

impl QuoteRow {
    pub fn failed(symbol: impl Into<String>, status: RowStatus) -> Self {
        Self {
            symbol: symbol.into(),
            status,
            snapshot: None,
            momentum: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_series_drops_non_finite() {
        let series = PriceSeries::from_values(vec![1.0, f64::NAN, 2.0, f64::INFINITY, 3.0]);
        assert_eq!(series.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.last(), Some(&3.0));
    }

    #[test]
    fn test_snapshot_change() {
        let snap = QuoteSnapshot::new("AAPL", 110.0, Some(100.0));
        assert_eq!(snap.change, Some(10.0));
        assert_eq!(snap.change_pct, Some(10.0));
    }

    #[test]
    fn test_snapshot_zero_previous_close() {
        let snap = QuoteSnapshot::new("XYZ", 5.0, Some(0.0));
        assert_eq!(snap.change, Some(5.0));
        assert_eq!(snap.change_pct, None);

        let snap = QuoteSnapshot::new("XYZ", 5.0, None);
        assert_eq!(snap.change, None);
        assert_eq!(snap.change_pct, None);
    }

    #[test]
    fn test_crossover_from_flags() {
        let mut result = MacdResult {
            valid: true,
            ..Default::default()
        };
        assert_eq!(result.crossover(), Crossover::None);

        result.bullish_cross = true;
        assert_eq!(result.crossover(), Crossover::Bullish);

        result.bullish_cross = false;
        result.bearish_cross = true;
        assert_eq!(result.crossover(), Crossover::Bearish);
    }

    #[test]
    fn test_row_status_json() {
        let row = QuoteRow::failed(
            "BAD",
            RowStatus::ApiError {
                message: "No data found".to_string(),
            },
        );
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains(r#""kind":"api_error""#));
        assert!(!json.contains("snapshot"));
        assert!(!row.is_ok());
    }
}
