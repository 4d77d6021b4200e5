use common::{
    HistoryMode, MonitorConfig, PriceSeries, QuoteError, QuoteRow, QuoteSnapshot, Result,
    RowStatus,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::{
    chart_result, extract_close_prices, extract_snapshot, extract_snapshot_or_last_close,
    parse_chart, QuoteSource,
};
use crate::indicators::compute_macd_last_two_with_reference;
use crate::session::SessionHistory;

/// One instrument's decoded response
#[derive(Debug)]
struct LoadedQuote {
    snapshot: QuoteSnapshot,
    closes: PriceSeries,
}

/// Polls every configured symbol and assembles display rows
pub struct QuoteMonitor {
    config: MonitorConfig,
    session: SessionHistory,
}

impl QuoteMonitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: SessionHistory::new(),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionHistory {
        &self.session
    }

    /// Run one refresh cycle against `source`
    ///
    /// Fetching and extraction run in parallel; session buffers are appended
    /// sequentially afterwards so each symbol has a single writer.
    pub fn refresh(&mut self, source: &dyn QuoteSource) -> Vec<QuoteRow> {
        let mode = self.config.history_mode;
        let loaded: Vec<(String, Result<LoadedQuote>)> = self
            .config
            .symbols
            .par_iter()
            .map(|symbol| (symbol.clone(), load_quote(source, symbol, mode)))
            .collect();

        let mut rows = Vec::with_capacity(loaded.len());
        for (symbol, outcome) in loaded {
            let row = match outcome {
                Ok(quote) => {
                    let closes = match mode {
                        HistoryMode::Chart => quote.closes.as_slice(),
                        HistoryMode::Session => {
                            self.session.record(&symbol, quote.snapshot.price)
                        }
                    };
                    build_row(&self.config, symbol, quote.snapshot, closes)
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "quote refresh failed");
                    failed_row(symbol, e)
                }
            };
            rows.push(row);
        }

        info!(
            symbols = rows.len(),
            ok = rows.iter().filter(|r| r.is_ok()).count(),
            "refresh complete"
        );
        rows
    }
}

fn load_quote(source: &dyn QuoteSource, symbol: &str, mode: HistoryMode) -> Result<LoadedQuote> {
    let bytes = source.fetch(symbol)?;
    let document = parse_chart(&bytes)?;
    let result = chart_result(&document)?;

    let (snapshot, closes) = match mode {
        HistoryMode::Chart => {
            let closes = extract_close_prices(result)?;
            let snapshot = match closes.last() {
                Some(&last_close) => extract_snapshot_or_last_close(result, symbol, last_close)?,
                None => extract_snapshot(result, symbol)?,
            };
            (snapshot, closes)
        }
        HistoryMode::Session => (extract_snapshot(result, symbol)?, PriceSeries::default()),
    };

    debug!(symbol, price = snapshot.price, closes = closes.len(), "quote loaded");
    Ok(LoadedQuote { snapshot, closes })
}

/// Combine a snapshot with the momentum of `closes`
pub fn build_row(
    config: &MonitorConfig,
    symbol: String,
    snapshot: QuoteSnapshot,
    closes: &[f64],
) -> QuoteRow {
    let last_close = closes.last().copied().unwrap_or(0.0);
    let reference = if config.use_previous_close_reference {
        snapshot.previous_close.unwrap_or(last_close)
    } else {
        last_close
    };

    let momentum = compute_macd_last_two_with_reference(closes, &config.macd, reference);
    let status = if momentum.valid {
        RowStatus::Ok
    } else {
        debug!(symbol = %symbol, closes = closes.len(), "not enough history for MACD");
        RowStatus::InsufficientHistory {
            required: config.macd.min_len_last_two(),
            actual: closes.len(),
        }
    };

    QuoteRow {
        symbol,
        status,
        snapshot: Some(snapshot),
        momentum: momentum.valid.then_some(momentum),
    }
}

fn failed_row(symbol: String, error: QuoteError) -> QuoteRow {
    let status = match error {
        QuoteError::ExtractionFailed(message) => RowStatus::ExtractionFailed { message },
        QuoteError::ApiError(message) => RowStatus::ApiError { message },
        other => RowStatus::ApiError {
            message: other.to_string(),
        },
    };
    QuoteRow::failed(symbol, status)
}
