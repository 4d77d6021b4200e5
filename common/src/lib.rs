pub mod config;
pub mod error;
pub mod types;

pub use config::{HistoryMode, MacdParameters, MonitorConfig};
pub use error::{QuoteError, Result};
pub use types::*;
