//! Demo application comparing the counting strategies on the same data.
//!
//! Run with:
//! ```bash
//! cargo run --release --example compare --features demo -- --help
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use ripartitori::counters::{Strategy, Workers};
use ripartitori::error::Result;
use ripartitori::observers::json::JsonObserver;
use ripartitori::observers::table::{TableObserver, TableStyle};
use ripartitori::predicates::DivisibleBy;
use ripartitori::report::{compare, Comparison};
use tracing::{error, info};

/// Output format for the reports.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty table
    Table,
    /// JSON format
    Json,
}

/// Strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyChoice {
    All,
    Sequential,
    Locked,
    Partitioned,
}

impl StrategyChoice {
    fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyChoice::All => Strategy::ALL.to_vec(),
            StrategyChoice::Sequential => vec![Strategy::Sequential],
            StrategyChoice::Locked => vec![Strategy::Locked],
            StrategyChoice::Partitioned => vec![Strategy::Partitioned],
        }
    }
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Counts the multiples of a divisor in 0..len with each strategy and
/// reports how long each one took.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Length of the generated sequence 0..len
    #[arg(
        short = 'n',
        long,
        env = "RIPARTITORI_LEN",
        default_value = "2000000",
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    len: i64,

    /// Number of workers for the parallel strategies (default: one per CPU)
    #[arg(short, long, env = "RIPARTITORI_WORKERS")]
    workers: Option<usize>,

    /// Count the multiples of this divisor
    #[arg(short, long, env = "RIPARTITORI_DIVISOR", default_value = "2000")]
    divisor: i64,

    /// Strategies to run
    #[arg(long, value_enum, default_value = "all")]
    strategy: StrategyChoice,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style (for table format)
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Comparison> {
    let workers = match args.workers {
        Some(n) => Workers::new(n)?,
        None => Workers::available(),
    };
    let predicate = DivisibleBy::new(args.divisor)?;
    let data: Vec<i64> = (0..args.len).collect();

    info!(len = data.len(), %workers, divisor = args.divisor, "comparing strategies");

    let comparison = compare(&data, workers, predicate, &args.strategy.strategies())?;

    let output = match args.format {
        OutputFormat::Table => TableObserver::new()
            .with_style(args.style.into())
            .with_title(format!(
                "0..{}, divisible by {}, {} workers",
                args.len, args.divisor, workers
            ))
            .render(comparison.reports()),
        OutputFormat::Json => JsonObserver::new()
            .pretty(args.pretty)
            .wrap_in_snapshot(true)
            .to_json(comparison.reports())?,
    };
    println!("{}", output);

    Ok(comparison)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(comparison) if comparison.agree() => ExitCode::SUCCESS,
        Ok(_) => {
            error!("strategies disagree on the number of matches");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "count failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_len_rejected() {
        assert!(Args::try_parse_from(["compare", "--len=-5"]).is_err());
    }

    #[test]
    fn test_len_accepted() {
        let args = Args::try_parse_from(["compare", "--len", "1000", "-w", "3"]).unwrap();
        assert_eq!(args.len, 1_000);
        assert_eq!(args.workers, Some(3));
    }
}
