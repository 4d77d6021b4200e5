pub mod chart;
pub mod source;
pub mod synthetic;

pub use chart::{
    chart_result, extract_close_prices, extract_snapshot, extract_snapshot_or_last_close,
    parse_chart,
};
pub use source::{FileSource, QuoteSource};
pub use synthetic::{chart_document, generate_closes, SyntheticSource};
