use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use momentum_engine::logging::init_logging;
use momentum_engine::{
    format_table, FileSource, HistoryMode, MacdParameters, MonitorConfig, QuoteMonitor,
    QuoteRow, QuoteSource, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "quote-monitor")]
#[command(version = "0.1.0")]
#[command(about = "Polling quote table with MACD momentum columns", long_about = None)]
struct Args {
    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Symbols to track (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Directory of saved chart responses (<SYMBOL>.json). If not provided, uses synthetic data.
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Days of synthetic history per symbol
    #[arg(long, default_value = "120")]
    synthetic_days: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "100.0")]
    initial_price: f64,

    /// Seed for synthetic data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// MACD fast period
    #[arg(long)]
    fast: Option<usize>,

    /// MACD slow period
    #[arg(long)]
    slow: Option<usize>,

    /// MACD signal period
    #[arg(long)]
    signal: Option<usize>,

    /// Accumulate one price per poll instead of using the response history
    #[arg(long)]
    session: bool,

    /// Normalize MACD percentages against the previous close
    #[arg(long)]
    previous_close_reference: bool,

    /// Number of refresh cycles to run
    #[arg(short = 'n', long, default_value = "1")]
    cycles: usize,

    /// Seconds between refresh cycles (defaults to the config value)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(args: &Args) -> Result<MonitorConfig> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };

    if !args.symbols.is_empty() {
        config = config.with_symbols(&args.symbols[..]);
    }
    let macd = MacdParameters::new(
        args.fast.unwrap_or(config.macd.fast_period),
        args.slow.unwrap_or(config.macd.slow_period),
        args.signal.unwrap_or(config.macd.signal_period),
    );
    config = config.with_macd(macd);
    if args.session {
        config = config.with_history_mode(HistoryMode::Session);
    }
    if args.previous_close_reference {
        config = config.with_previous_close_reference();
    }
    if let Some(secs) = args.interval {
        config = config.with_refresh_interval(secs);
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { "info" });

    let config = build_config(&args)?;
    let interval = Duration::from_secs(config.refresh_interval_secs);
    info!(
        symbols = ?config.symbols,
        mode = ?config.history_mode,
        fast = config.macd.fast_period,
        slow = config.macd.slow_period,
        signal = config.macd.signal_period,
        "starting quote monitor"
    );

    let synthetic = SyntheticSource::new(args.synthetic_days, args.initial_price, args.seed);
    let files = args.data_dir.as_ref().map(|dir| FileSource::new(dir.clone()));
    let mut monitor = QuoteMonitor::new(config)?;

    for cycle in 0..args.cycles {
        if cycle > 0 {
            thread::sleep(interval);
        }

        // Synthetic walks grow by one bar per cycle
        let extended;
        let source: &dyn QuoteSource = match &files {
            Some(files) => files,
            None => {
                extended = synthetic.extended(cycle);
                &extended
            }
        };

        let rows = monitor.refresh(source);
        print_rows(&rows, &args)?;
    }

    Ok(())
}

fn print_rows(rows: &[QuoteRow], args: &Args) -> Result<()> {
    match args.output.as_str() {
        "json" => {
            let json = if args.pretty {
                serde_json::to_string_pretty(rows)?
            } else {
                serde_json::to_string(rows)?
            };
            println!("{}", json);
        }
        "text" => {
            print!("{}", format_table(rows));
        }
        _ => {
            tracing::warn!("Unknown output format: {}. Using text.", args.output);
            print!("{}", format_table(rows));
        }
    }
    Ok(())
}
