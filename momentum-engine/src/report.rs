use common::{Crossover, MacdResult, QuoteRow, QuoteSnapshot, RowStatus};

const NA: &str = "N/A";

fn fmt_opt(value: Option<f64>, signed: bool) -> String {
    match value {
        Some(v) if signed => format!("{:+.2}", v),
        Some(v) => format!("{:.2}", v),
        None => NA.to_string(),
    }
}

fn momentum_columns(momentum: Option<&MacdResult>) -> (String, String, &'static str) {
    match momentum {
        Some(m) if m.valid && m.percent_valid => (
            format!("{:+.3}", m.macd_percent),
            format!("{:+.3}", m.signal_percent),
            cross_marker(m),
        ),
        Some(m) if m.valid => (NA.to_string(), NA.to_string(), cross_marker(m)),
        _ => (NA.to_string(), NA.to_string(), ""),
    }
}

fn cross_marker(momentum: &MacdResult) -> &'static str {
    match momentum.crossover() {
        Crossover::Bullish => "BULL",
        Crossover::Bearish => "BEAR",
        Crossover::None => "",
    }
}

fn quote_columns(snapshot: &QuoteSnapshot) -> String {
    format!(
        "{:>12} {:>10} {:>8}",
        format!("{:.2}", snapshot.price),
        fmt_opt(snapshot.change, true),
        fmt_opt(snapshot.change_pct, true),
    )
}

/// Format one monitor row as a fixed-width line
pub fn format_row(row: &QuoteRow) -> String {
    let symbol = format!("{:<10}", row.symbol);

    let note = match &row.status {
        RowStatus::ApiError { message } => {
            return format!("{} bad symbol / API error: {}", symbol, message);
        }
        RowStatus::ExtractionFailed { message } => {
            return format!("{} no data: {}", symbol, message);
        }
        RowStatus::InsufficientHistory { required, actual } => {
            format!("insufficient history ({}/{})", actual, required)
        }
        RowStatus::Ok => String::new(),
    };

    let quote = match &row.snapshot {
        Some(snapshot) => quote_columns(snapshot),
        None => format!("{:>12} {:>10} {:>8}", NA, NA, NA),
    };
    let (macd, signal, cross) = momentum_columns(row.momentum.as_ref());

    let line = format!(
        "{} {} {:>8} {:>8} {:<5} {}",
        symbol, quote, macd, signal, cross, note
    );
    line.trim_end().to_string()
}

/// Format a header plus one line per row
pub fn format_table(rows: &[QuoteRow]) -> String {
    let header = format!(
        "{:<10} {:>12} {:>10} {:>8} {:>8} {:>8} {:<5}",
        "SYMBOL", "PRICE", "CHANGE", "CHG%", "MACD%", "SIGNAL%", "CROSS"
    );
    let mut lines = vec![header.trim_end().to_string(), "-".repeat(67)];
    lines.extend(rows.iter().map(format_row));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_row(momentum: MacdResult) -> QuoteRow {
        QuoteRow {
            symbol: "AAPL".to_string(),
            status: RowStatus::Ok,
            snapshot: Some(QuoteSnapshot::new("AAPL", 105.0, Some(100.0))),
            momentum: Some(momentum),
        }
    }

    fn valid_momentum() -> MacdResult {
        MacdResult {
            macd_last: 1.0,
            macd_prev: -1.0,
            signal_last: 0.0,
            signal_prev: 0.0,
            macd_percent: 0.952,
            signal_percent: 0.0,
            percent_valid: true,
            bullish_cross: true,
            bearish_cross: false,
            valid: true,
        }
    }

    #[test]
    fn test_ok_row() {
        let line = format_row(&ok_row(valid_momentum()));

        assert!(line.starts_with("AAPL"));
        assert!(line.contains("105.00"));
        assert!(line.contains("+5.00"));
        assert!(line.contains("+0.952"));
        assert!(line.contains("BULL"));
        assert!(!line.contains(NA));
    }

    #[test]
    fn test_insufficient_history_row() {
        let row = QuoteRow {
            status: RowStatus::InsufficientHistory {
                required: 36,
                actual: 20,
            },
            momentum: None,
            ..ok_row(valid_momentum())
        };
        let line = format_row(&row);

        assert!(line.contains("105.00"));
        assert!(line.contains(NA));
        assert!(line.contains("insufficient history (20/36)"));
        assert!(!line.contains("BULL"));
    }

    #[test]
    fn test_zero_reference_hides_percentages() {
        let momentum = MacdResult {
            percent_valid: false,
            macd_percent: 0.0,
            signal_percent: 0.0,
            bullish_cross: false,
            bearish_cross: true,
            ..valid_momentum()
        };
        let line = format_row(&ok_row(momentum));

        assert!(line.contains(NA));
        assert!(line.contains("BEAR"));
    }

    #[test]
    fn test_error_rows() {
        let api = QuoteRow::failed(
            "ZZZZ",
            RowStatus::ApiError {
                message: "No data found".to_string(),
            },
        );
        let extraction = QuoteRow::failed(
            "NULLS",
            RowStatus::ExtractionFailed {
                message: "no numeric closes among 2 entries".to_string(),
            },
        );

        assert_eq!(
            format_row(&api),
            "ZZZZ       bad symbol / API error: No data found"
        );
        assert!(format_row(&extraction).contains("no data: no numeric closes"));
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let table = format_table(&[ok_row(valid_momentum())]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SYMBOL"));
        assert!(lines[2].starts_with("AAPL"));
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let table = format_table(&[]);

        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().all(|line| line == line.trim_end()));
        assert!(table.ends_with(&format!("{}\n", "-".repeat(67))));
    }
}
