pub mod data;
pub mod indicators;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod session;

pub use data::{extract_close_prices, FileSource, QuoteSource, SyntheticSource};
pub use indicators::{
    calculate_ema, compute_macd_last_two, compute_macd_last_two_with_reference,
    compute_macd_percent, EmaSeries,
};
pub use monitor::QuoteMonitor;
pub use report::{format_row, format_table};
pub use session::SessionHistory;

// Re-export common types
pub use common::{
    Crossover, HistoryMode, MacdParameters, MacdPercent, MacdResult, MonitorConfig, PriceSeries,
    QuoteError, QuoteRow, QuoteSnapshot, Result, RowStatus,
};
