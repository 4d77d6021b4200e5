use common::{Crossover, MacdParameters, MacdPercent, MacdResult};
use tracing::trace;

use super::ema::calculate_ema;

/// MACD line (fast EMA minus slow EMA) from the first index where both EMAs
/// are defined
pub fn calculate_macd_line(closes: &[f64], params: &MacdParameters) -> Vec<f64> {
    if params.fast_period == 0 || params.slow_period == 0 {
        return vec![];
    }

    let fast = calculate_ema(closes, params.fast_period);
    let slow = calculate_ema(closes, params.slow_period);
    let start = params.fast_period.max(params.slow_period) - 1;

    (start..closes.len())
        .filter_map(|i| Some(fast.get(i)? - slow.get(i)?))
        .collect()
}

/// Classify the transition between two consecutive MACD/signal pairs.
///
/// A tie on the previous pair still counts as "from below/above"; a tie on the
/// last pair never counts as a cross.
pub fn detect_crossover(
    macd_prev: f64,
    signal_prev: f64,
    macd_last: f64,
    signal_last: f64,
) -> Crossover {
    if macd_prev <= signal_prev && macd_last > signal_last {
        Crossover::Bullish
    } else if macd_prev >= signal_prev && macd_last < signal_last {
        Crossover::Bearish
    } else {
        Crossover::None
    }
}

/// `value` as a percentage of `reference`, `None` when the reference is zero
fn percent_of(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() {
        return None;
    }
    Some(value / reference * 100.0)
}

/// Last two matured (MACD, signal) pairs, oldest first
fn last_two_points(closes: &[f64], params: &MacdParameters) -> Option<[(f64, f64); 2]> {
    if params.signal_period == 0 {
        return None;
    }

    let line = calculate_macd_line(closes, params);
    if line.len() < params.signal_period + 1 {
        trace!(
            macd_points = line.len(),
            signal_period = params.signal_period,
            "not enough MACD points for two signal values"
        );
        return None;
    }

    let signal = calculate_ema(&line, params.signal_period);
    let n = line.len();
    Some([
        (line[n - 2], signal.get(n - 2)?),
        (line[n - 1], signal.get(n - 1)?),
    ])
}

/// Calculate the last two MACD/signal points, normalized against the last close
pub fn compute_macd_last_two(closes: &[f64], params: &MacdParameters) -> MacdResult {
    let reference = closes.last().copied().unwrap_or(0.0);
    compute_macd_last_two_with_reference(closes, params, reference)
}

/// Calculate the last two MACD/signal points with crossover detection
///
/// # Arguments
/// * `closes` - Closing prices, oldest first
/// * `params` - Fast/slow/signal periods
/// * `reference` - Price the percentages are expressed against
///
/// # Returns
/// `MacdResult` with `valid == false` when fewer than
/// `slow + signal + 1` closes are available
pub fn compute_macd_last_two_with_reference(
    closes: &[f64],
    params: &MacdParameters,
    reference: f64,
) -> MacdResult {
    if closes.len() < params.min_len_last_two() {
        return MacdResult::default();
    }

    let Some([(macd_prev, signal_prev), (macd_last, signal_last)]) =
        last_two_points(closes, params)
    else {
        return MacdResult::default();
    };

    let crossover = detect_crossover(macd_prev, signal_prev, macd_last, signal_last);
    let percents = percent_of(macd_last, reference).zip(percent_of(signal_last, reference));
    let (macd_percent, signal_percent) = percents.unwrap_or((0.0, 0.0));

    MacdResult {
        macd_last,
        macd_prev,
        signal_last,
        signal_prev,
        macd_percent,
        signal_percent,
        percent_valid: percents.is_some(),
        bullish_cross: crossover == Crossover::Bullish,
        bearish_cross: crossover == Crossover::Bearish,
        valid: true,
    }
}

/// Present MACD and signal values as a percentage of the last close.
///
/// Needs one close fewer than [`compute_macd_last_two`] since only the
/// latest matured point is read.
pub fn compute_macd_percent(closes: &[f64], params: &MacdParameters) -> MacdPercent {
    if closes.len() < params.min_len_percent() || params.signal_period == 0 {
        return MacdPercent::default();
    }

    let line = calculate_macd_line(closes, params);
    let signal = calculate_ema(&line, params.signal_period);
    let (Some(&macd_last), Some(signal_last)) = (line.last(), signal.last()) else {
        return MacdPercent::default();
    };

    let reference = closes.last().copied().unwrap_or(0.0);
    let percents = percent_of(macd_last, reference).zip(percent_of(signal_last, reference));
    let (macd_percent, signal_percent) = percents.unwrap_or((0.0, 0.0));

    MacdPercent {
        macd_percent,
        signal_percent,
        percent_valid: percents.is_some(),
        valid: true,
    }
}
