pub mod ema;
pub mod macd;

pub use ema::{calculate_ema, EmaSeries};
pub use macd::{
    calculate_macd_line, compute_macd_last_two, compute_macd_last_two_with_reference,
    compute_macd_percent, detect_crossover,
};
