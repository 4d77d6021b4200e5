use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// MACD period settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParameters {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParameters {
    fn default() -> Self {
        Self {
            fast_period: DEFAULT_FAST_PERIOD,
            slow_period: DEFAULT_SLOW_PERIOD,
            signal_period: DEFAULT_SIGNAL_PERIOD,
        }
    }
}

impl MacdParameters {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Check the periods once, before any series is fed to the engine
    pub fn validate(&self) -> Result<()> {
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return Err(QuoteError::InvalidParameter(format!(
                "MACD periods must be positive (fast={}, slow={}, signal={})",
                self.fast_period, self.slow_period, self.signal_period
            )));
        }
        if self.fast_period >= self.slow_period {
            return Err(QuoteError::InvalidParameter(format!(
                "fast period {} must be shorter than slow period {}",
                self.fast_period, self.slow_period
            )));
        }
        Ok(())
    }

    /// Closes required before the last two MACD/signal points are matured
    pub fn min_len_last_two(&self) -> usize {
        self.slow_period + self.signal_period + 1
    }

    /// Closes required for the present MACD/signal percentages
    pub fn min_len_percent(&self) -> usize {
        self.slow_period + self.signal_period
    }
}

/// Which close series feeds the momentum engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Closes extracted from each response's quote history
    #[default]
    Chart,
    /// One price per poll, accumulated across refresh cycles
    Session,
}

/// Quote monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub symbols: Vec<String>,
    pub refresh_interval_secs: u64,
    pub history_mode: HistoryMode,
    /// Normalize MACD percentages against the response's previous close
    /// instead of the last close fed to the engine
    pub use_previous_close_reference: bool,
    pub macd: MacdParameters,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            symbols: ["^GSPC", "^DJI", "^IXIC", "AAPL", "MSFT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refresh_interval_secs: 60,
            history_mode: HistoryMode::Chart,
            use_previous_close_reference: false,
            macd: MacdParameters::default(),
        }
    }
}

impl MonitorConfig {
    /// Load settings from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            QuoteError::DataLoadError(format!("{}: {}", path.display(), e))
        })?;
        let config: MonitorConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(QuoteError::InvalidParameter(
                "at least one symbol is required".to_string(),
            ));
        }
        self.macd.validate()
    }

    pub fn with_symbols<S: AsRef<str>>(mut self, symbols: &[S]) -> Self {
        self.symbols = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_macd(mut self, macd: MacdParameters) -> Self {
        self.macd = macd;
        self
    }

    pub fn with_history_mode(mut self, mode: HistoryMode) -> Self {
        self.history_mode = mode;
        self
    }

    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    pub fn with_previous_close_reference(mut self) -> Self {
        self.use_previous_close_reference = true;
        self
    }
}
