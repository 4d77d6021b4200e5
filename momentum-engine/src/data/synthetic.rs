use chrono::{Duration, Utc};
use common::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use super::source::QuoteSource;

/// Probability that a generated close is reported as `null`
const NULL_CLOSE_PROBABILITY: f64 = 0.03;

/// Generate a daily random-walk close series; `None` marks a missing close
pub fn generate_closes(rng: &mut StdRng, days: usize, initial_price: f64) -> Vec<Option<f64>> {
    let mut closes = Vec::with_capacity(days);
    let mut price = initial_price;

    let daily_volatility = 0.02;
    let drift = 0.0002;

    for _ in 0..days {
        let random_return: f64 = rng.gen_range(-1.0..1.0);
        price *= 1.0 + drift + daily_volatility * random_return;

        let gap = rng.gen_bool(NULL_CLOSE_PROBABILITY);
        closes.push(if gap { None } else { Some(price) });
    }

    closes
}

/// Build a chart-shaped response around a close series
pub fn chart_document(symbol: &str, closes: &[Option<f64>]) -> Value {
    let now = Utc::now();
    let timestamps: Vec<i64> = (0..closes.len())
        .map(|i| (now - Duration::days((closes.len() - i) as i64)).timestamp())
        .collect();

    let valid: Vec<f64> = closes.iter().flatten().copied().collect();
    let price = valid.last().copied();
    let previous_close = valid.len().checked_sub(2).map(|i| valid[i]);

    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": symbol,
                    "currency": "USD",
                    "regularMarketPrice": price,
                    "chartPreviousClose": previous_close,
                    "regularMarketTime": now.timestamp()
                },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

/// Offline source producing deterministic random walks per symbol
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    days: usize,
    initial_price: f64,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(days: usize, initial_price: f64, seed: u64) -> Self {
        Self {
            days,
            initial_price,
            seed,
        }
    }

    /// Same walks, `extra` bars longer
    pub fn extended(&self, extra: usize) -> Self {
        Self {
            days: self.days + extra,
            ..self.clone()
        }
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let seed = symbol
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        StdRng::seed_from_u64(seed)
    }
}

impl QuoteSource for SyntheticSource {
    fn fetch(&self, symbol: &str) -> Result<Vec<u8>> {
        let mut rng = self.rng_for(symbol);
        let closes = generate_closes(&mut rng, self.days, self.initial_price);
        Ok(serde_json::to_vec(&chart_document(symbol, &closes))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chart::{chart_result, extract_close_prices, extract_snapshot, parse_chart};

    #[test]
    fn test_generate_closes() {
        let mut rng = StdRng::seed_from_u64(7);
        let closes = generate_closes(&mut rng, 200, 50.0);

        assert_eq!(closes.len(), 200);
        for close in closes.iter().flatten() {
            assert!(*close > 0.0);
        }
    }

    #[test]
    fn test_synthetic_document_round_trips_through_extraction() {
        let source = SyntheticSource::new(120, 100.0, 42);
        let document = parse_chart(&source.fetch("TEST").unwrap()).unwrap();
        let result = chart_result(&document).unwrap();

        let closes = extract_close_prices(result).unwrap();
        let snapshot = extract_snapshot(result, "TEST").unwrap();

        assert!(closes.len() <= 120);
        assert!(closes.len() > 90);
        assert_eq!(snapshot.symbol, "TEST");
        assert_eq!(Some(&snapshot.price), closes.last());
    }

    #[test]
    fn test_same_seed_same_walk() {
        let source = SyntheticSource::new(60, 100.0, 1);
        assert_eq!(
            generate_closes(&mut source.rng_for("AAPL"), 60, 100.0),
            generate_closes(&mut source.rng_for("AAPL"), 60, 100.0)
        );
        assert_ne!(
            generate_closes(&mut source.rng_for("AAPL"), 60, 100.0),
            generate_closes(&mut source.rng_for("MSFT"), 60, 100.0)
        );
    }

    #[test]
    fn test_extended_walk_shares_prefix() {
        let source = SyntheticSource::new(40, 100.0, 3);
        let longer = source.extended(1);

        let short = generate_closes(&mut source.rng_for("X"), source.days, 100.0);
        let long = generate_closes(&mut longer.rng_for("X"), longer.days, 100.0);

        assert_eq!(long.len(), 41);
        assert_eq!(&long[..40], &short[..]);
    }
}
