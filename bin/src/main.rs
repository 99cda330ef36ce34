//! Valora CLI binary.
//!
//! Provides the command-line interface for the Valora fair value estimator.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, process};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use valora::{ClassificationVariant, EntryExitStyle, eval::MAX_LOOKBACK_YEARS};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "valora=info,valora_fmp=warn";

#[derive(Parser)]
#[command(name = "valora")]
#[command(about = "EV/EBITDA fair value estimator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log per-ticker progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a batch of tickers and rank them by undervaluation
    Analyze {
        /// Ticker symbols
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// CSV file with a Symbol column
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the report to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Band policy (a has an Over Valued band, b does not)
        #[arg(long, default_value = "a")]
        variant: ClassificationVariant,

        /// Entry/exit representation (price or flag)
        #[arg(long, default_value = "price")]
        entry_exit: EntryExitStyle,

        /// One-year EBITDA growth assumption
        #[arg(short, long, default_value = "0.10")]
        growth: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Reconstruct past fair values for one ticker
    Backtest {
        /// Ticker symbol
        symbol: String,

        /// Number of past years to reconstruct
        #[arg(
            short,
            long,
            default_value = "3",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_LOOKBACK_YEARS))
        )]
        years: u32,

        /// Annual growth rate used to discount backward
        #[arg(short, long, default_value = "0.10")]
        rate: f64,

        /// Use this fair value instead of computing one from fundamentals
        #[arg(long)]
        fair_value: Option<f64>,

        /// Write the rows to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Describe the report columns and valuation bands
    Bands,
}

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned table
    Text,
    /// Pretty-printed JSON
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            symbols,
            input,
            output,
            variant,
            entry_exit,
            growth,
            format,
        } => {
            let options = cmd::analyze::AnalyzeOptions {
                symbols,
                input,
                output,
                variant,
                entry_exit,
                growth,
                format,
            };
            cmd::analyze::run_analyze(options).await?;
        }
        Commands::Backtest {
            symbol,
            years,
            rate,
            fair_value,
            output,
            format,
        } => {
            let options = cmd::backtest::BacktestOptions {
                symbol,
                years,
                rate,
                fair_value,
                output,
                format,
            };
            cmd::backtest::run_backtest(options).await?;
        }
        Commands::Bands => cmd::bands::show_bands(),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("valora=debug,valora_fmp=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "valora", "analyze", "--symbols", "AAPL,INFY.NS", "--variant", "b",
            "--entry-exit", "flag", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                symbols,
                variant,
                entry_exit,
                growth,
                format,
                ..
            } => {
                assert_eq!(symbols, ["AAPL", "INFY.NS"]);
                assert_eq!(variant, ClassificationVariant::B);
                assert_eq!(entry_exit, EntryExitStyle::Flag);
                assert!((growth - 0.10).abs() < f64::EPSILON);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_backtest_defaults() {
        let cli = Cli::try_parse_from(["valora", "backtest", "AAPL", "--fair-value", "150"]).unwrap();
        match cli.command {
            Commands::Backtest {
                symbol,
                years,
                fair_value,
                format,
                ..
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(years, 3);
                assert_eq!(fair_value, Some(150.0));
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected backtest"),
        }
    }

    #[test]
    fn test_rejects_zero_years_and_bad_variant() {
        assert!(Cli::try_parse_from(["valora", "backtest", "AAPL", "--years", "0"]).is_err());
        assert!(Cli::try_parse_from(["valora", "backtest", "AAPL", "--years", "101"]).is_err());
        assert!(Cli::try_parse_from(["valora", "backtest", "AAPL", "--years", "300000"]).is_err());
        assert!(Cli::try_parse_from(["valora", "backtest", "AAPL", "--years", "100"]).is_ok());
        assert!(Cli::try_parse_from(["valora", "analyze", "--variant", "c"]).is_err());
    }
}
