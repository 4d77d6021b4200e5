use std::collections::HashMap;

/// Prices accumulated across refresh cycles, one growable buffer per symbol.
///
/// Owned by the caller; every append for a symbol must come from a single
/// writer.
#[derive(Debug, Default, Clone)]
pub struct SessionHistory {
    series: HashMap<String, Vec<f64>>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one close for `symbol` and return the whole accumulated series.
    /// Non-finite prices are not recorded.
    pub fn record(&mut self, symbol: &str, close: f64) -> &[f64] {
        let buffer = self.series.entry(symbol.to_string()).or_default();
        if close.is_finite() {
            buffer.push(close);
        }
        buffer
    }

    pub fn series(&self, symbol: &str) -> &[f64] {
        self.series.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, symbol: &str) -> usize {
        self.series(symbol).len()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn clear(&mut self, symbol: &str) {
        self.series.remove(symbol);
    }
}
