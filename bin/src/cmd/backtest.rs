//! Backtest command implementation.

use crate::OutputFormat;
use crate::cmd::banner;
use anyhow::{Result, bail};
use chrono::Local;
use serde::Serialize;
use std::{fs::File, path::PathBuf};
use tracing::info;
use valora::{
    Analyzer, AnalyzerConfig, BacktestRow,
    eval::BacktestSummary,
    fmp::FmpClient,
    report::write_backtest_csv,
};

/// Options for the `backtest` command.
#[derive(Debug)]
pub(crate) struct BacktestOptions {
    pub(crate) symbol: String,
    pub(crate) years: u32,
    pub(crate) rate: f64,
    pub(crate) fair_value: Option<f64>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: OutputFormat,
}

#[derive(Serialize)]
struct BacktestOutput<'a> {
    symbol: &'a str,
    rows: &'a [BacktestRow],
    summary: BacktestSummary,
}

/// Reconstruct past fair values for one ticker and print them.
pub(crate) async fn run_backtest(options: BacktestOptions) -> Result<()> {
    if let Some(fv) = options.fair_value
        && !fv.is_finite()
    {
        bail!("fair value must be a finite number");
    }

    let mut config = AnalyzerConfig::from_env()?;
    config.backtest.lookback_years = options.years;
    config.backtest.reverse_growth_rate = options.rate;
    config.backtest.validate()?;

    let client = FmpClient::from_env_with_timeout(config.request_timeout())?;
    let analyzer = Analyzer::new(client, config);

    let rows = analyzer
        .backtest_symbol(&options.symbol, options.fair_value, Local::now().date_naive())
        .await;
    let summary = BacktestSummary::from_rows(&rows);

    match options.format {
        OutputFormat::Text => print_rows(&options.symbol, &rows, &summary),
        OutputFormat::Json => {
            let output = BacktestOutput {
                symbol: &options.symbol,
                rows: &rows,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if let Some(path) = options.output {
        write_backtest_csv(&rows, File::create(&path)?)?;
        info!(path = %path.display(), rows = rows.len(), "backtest saved");
    }

    Ok(())
}

fn print_rows(symbol: &str, rows: &[BacktestRow], summary: &BacktestSummary) {
    banner("Fair Value Backtest");

    println!("Symbol:   {symbol}");
    println!();

    if rows.is_empty() {
        println!("No backtest data available.");
        println!();
        return;
    }

    println!(
        "{:<6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Year", "Simulated", "Avg Price", "High", "Low", "Dev %", "Converged"
    );
    println!("{}", "-".repeat(82));
    for row in rows {
        println!(
            "{:<6} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>10}",
            row.year,
            row.simulated_fair_value,
            row.avg_price,
            row.high_price,
            row.low_price,
            row.deviation_pct,
            if row.converged { "Yes" } else { "No" },
        );
    }

    println!();
    println!(
        "Converged in {} of {} years",
        summary.converged_years, summary.years
    );
    if let Some(dev) = summary.mean_deviation_pct {
        println!("Mean deviation: {dev:.2}%");
    }
    println!();
}
