/// EMA values aligned with their source series.
///
/// Indices before `period - 1` have no value, index `period - 1` holds the
/// SMA seed and later indices hold the recursive EMA.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaSeries {
    values: Vec<Option<f64>>,
}

impl EmaSeries {
    fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `idx`, `None` while the EMA is still warming up
    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied().flatten()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the seed value, if the series ever matured
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }

    /// Matured values only, in order
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

/// Calculate Exponential Moving Average seeded with the SMA of the first window
///
/// # Arguments
/// * `prices` - Slice of prices
/// * `period` - EMA period
///
/// # Returns
/// `EmaSeries` of the same length as `prices`; all-undefined when
/// `period == 0` or `period > prices.len()`
pub fn calculate_ema(prices: &[f64], period: usize) -> EmaSeries {
    let n = prices.len();
    if n < period || period == 0 {
        return EmaSeries::undefined(n);
    }

    let mut ema = vec![None; n];
    let multiplier = 2.0 / (period as f64 + 1.0);

    // Use SMA as initial seed
    let mut prev: f64 = prices[..period].iter().sum::<f64>() / period as f64;
    ema[period - 1] = Some(prev);

    for i in period..n {
        prev = (prices[i] - prev) * multiplier + prev;
        ema[i] = Some(prev);
    }

    EmaSeries { values: ema }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_seed_is_window_mean() {
        let prices = vec![3.5, 1.25, 9.0, 4.75, 2.0, 8.5, 6.0];
        let ema = calculate_ema(&prices, 4);

        assert_eq!(ema.len(), prices.len());
        assert_eq!(ema.get(0), None);
        assert_eq!(ema.get(2), None);
        let mean = (3.5 + 1.25 + 9.0 + 4.75) / 4.0;
        assert_relative_eq!(ema.get(3).unwrap(), mean, epsilon = 1e-9);
        assert_eq!(ema.first_defined(), Some(3));
    }

    #[test]
    fn test_ema_recurrence() {
        let prices = vec![10.0, 11.0, 9.5, 12.0, 13.5, 12.25, 15.0, 14.0];
        let period = 3;
        let ema = calculate_ema(&prices, period);
        let k = 2.0 / (period as f64 + 1.0);

        for i in period..prices.len() {
            let prev = ema.get(i - 1).unwrap();
            let expected = (prices[i] - prev) * k + prev;
            assert_relative_eq!(ema.get(i).unwrap(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ema_constant_input() {
        let prices = vec![42.5; 30];
        let ema = calculate_ema(&prices, 12);

        assert_eq!(ema.defined().count(), 19);
        for value in ema.defined() {
            assert_relative_eq!(value, 42.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ema_with_sma_seed() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let ema = calculate_ema(&prices, 3);

        assert_eq!(ema.get(2), Some(2.0)); // SMA of first 3 = (1+2+3)/3 = 2
        // Linear input keeps a constant lag of (period - 1) / 2
        assert_relative_eq!(ema.last().unwrap(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ema_period_equals_len() {
        let prices = vec![2.0, 4.0, 6.0];
        let ema = calculate_ema(&prices, 3);

        assert_eq!(ema.defined().collect::<Vec<_>>(), vec![4.0]);
        assert_eq!(ema.last(), Some(4.0));
    }

    #[test]
    fn test_ema_invalid_period() {
        let prices = vec![1.0, 2.0, 3.0];

        let too_long = calculate_ema(&prices, 5);
        assert_eq!(too_long.len(), 3);
        assert_eq!(too_long.defined().count(), 0);

        let zero = calculate_ema(&prices, 0);
        assert_eq!(zero.len(), 3);
        assert_eq!(zero.last(), None);
    }

    #[test]
    fn test_ema_empty() {
        let prices: Vec<f64> = vec![];
        let ema = calculate_ema(&prices, 3);
        assert!(ema.is_empty());
        assert_eq!(ema.first_defined(), None);
    }
}
