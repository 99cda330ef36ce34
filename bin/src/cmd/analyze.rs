//! Analyze command implementation.

use crate::OutputFormat;
use crate::cmd::{banner, fmt_optional, truncate};
use anyhow::{Result, bail};
use chrono::Local;
use std::path::PathBuf;
use tracing::info;
use valora::{
    Analyzer, AnalyzerConfig, ClassificationVariant, EntryExitStyle, Symbol, ValuationReport,
    fmp::FmpClient,
    report::{read_symbols, split_symbols},
};

/// Options for the `analyze` command.
#[derive(Debug)]
pub(crate) struct AnalyzeOptions {
    pub(crate) symbols: Vec<String>,
    pub(crate) input: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) variant: ClassificationVariant,
    pub(crate) entry_exit: EntryExitStyle,
    pub(crate) growth: f64,
    pub(crate) format: OutputFormat,
}

/// Value every requested ticker and print the ranked report.
pub(crate) async fn run_analyze(options: AnalyzeOptions) -> Result<()> {
    let symbols = collect_symbols(&options.symbols, options.input.as_ref())?;
    if symbols.is_empty() {
        bail!("no symbols given; pass --symbols or --input");
    }
    if !options.growth.is_finite() || options.growth <= -1.0 {
        bail!("growth rate must be greater than -1, got {}", options.growth);
    }

    let mut config = AnalyzerConfig::from_env()?;
    config.valuation.variant = options.variant;
    config.valuation.entry_exit = options.entry_exit;
    config.valuation.growth_rate = options.growth;

    let client = FmpClient::from_env_with_timeout(config.request_timeout())?;
    let analyzer = Analyzer::new(client, config);

    info!(tickers = symbols.len(), "processing batch");
    let report = analyzer.analyze(&symbols, Local::now().date_naive()).await;

    match options.format {
        OutputFormat::Text => print_report(&report, symbols.len()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(path) = options.output {
        report.save_csv(&path)?;
        info!(path = %path.display(), "report saved");
        if options.format == OutputFormat::Text {
            println!("Report saved to {}", path.display());
        }
    }

    Ok(())
}

/// Symbols from `--symbols` followed by those from `--input`, duplicates
/// removed with the first occurrence kept.
fn collect_symbols(listed: &[String], input: Option<&PathBuf>) -> Result<Vec<Symbol>> {
    let mut symbols: Vec<Symbol> = listed.iter().flat_map(|s| split_symbols(s)).collect();
    if let Some(path) = input {
        symbols.extend(read_symbols(path)?);
    }

    let mut seen = std::collections::HashSet::new();
    symbols.retain(|s| seen.insert(s.clone()));
    Ok(symbols)
}

fn print_report(report: &ValuationReport, requested: usize) {
    banner("Fair Value Results");

    println!("As of:    {}", report.as_of);
    println!("Valued:   {} of {} tickers", report.len(), requested);
    println!();

    if report.is_empty() {
        println!("No valid data was retrieved.");
    } else {
        println!(
            "{:<12} {:<24} {:>10} {:>10} {:>9}  {:<14} {:<6} {:<6} {:>10} {:>10} {:<9}",
            "Symbol", "Name", "Fair", "Price", "Under %", "Band", "Market", "Cap", "Entry",
            "Exit", "Signal"
        );
        println!("{}", "-".repeat(130));

        for r in report.sorted_by_undervaluation() {
            println!(
                "{:<12} {:<24} {:>10.2} {:>10.2} {:>9.2}  {:<14} {:<6} {:<6} {:>10} {:>10} {:<9}",
                r.symbol,
                truncate(&r.name, 24),
                r.fair_value,
                r.current_price,
                r.undervalued_pct,
                r.band.label(),
                r.market.label(),
                r.cap_size.label(),
                r.entry.to_string(),
                r.exit.to_string(),
                r.signal.label(),
            );
        }

        println!();
        println!("3Y range:");
        for r in report.sorted_by_undervaluation() {
            println!(
                "  {:<12} high {:>10}  low {:>10}",
                r.symbol,
                fmt_optional(r.high_3y),
                fmt_optional(r.low_3y)
            );
        }
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for skipped in &report.skipped {
            println!("  {:<12} {}", skipped.symbol, skipped.reason);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_symbols_dedup() {
        let listed = vec!["AAPL,MSFT".to_string(), "aapl".to_string(), "MSFT".to_string()];
        let symbols = collect_symbols(&listed, None).unwrap();
        assert_eq!(symbols, ["AAPL", "MSFT", "aapl"]);
    }

    #[test]
    fn test_collect_symbols_missing_file() {
        let path = PathBuf::from("/nonexistent/valora/input.csv");
        assert!(collect_symbols(&[], Some(&path)).is_err());
    }
}
