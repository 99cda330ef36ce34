//! Batch reports and their tabular export.
//!
//! Results are kept as typed records while the batch runs. They are turned
//! into a Polars [`DataFrame`] only at the edge, for CSV export. Missing
//! values are written as `N/A`.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Cursor, io::Write, path::Path};
use valora_eval::BacktestRow;
use valora_traits::{Date, Result, Symbol, ValoraError};
use valora_value::{EntryExit, ValuationResult};

/// Placeholder written for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column holding ticker symbols in batch input files.
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Header of the valuation report, in column order.
pub const REPORT_COLUMNS: [&str; 14] = [
    "Symbol",
    "Name",
    "Fair Value (EV)",
    "Current Price",
    "Undervalued (%)",
    "Valuation Band",
    "Market",
    "Cap Size",
    "Industry",
    "3Y High",
    "3Y Low",
    "Entry Price",
    "Exit Price",
    "Signal",
];

/// Header of a backtest export, in column order.
pub const BACKTEST_COLUMNS: [&str; 7] = [
    "Year",
    "Simulated Fair Value",
    "Avg Market Price",
    "Price High",
    "Price Low",
    "Deviation (%)",
    "Converged",
];

/// A ticker that produced no valuation, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Rendered error.
    pub reason: String,
}

/// The outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// Date the batch was valued on.
    pub as_of: Date,
    /// Valued tickers in input order.
    pub results: Vec<ValuationResult>,
    /// Tickers that were dropped.
    pub skipped: Vec<SkippedTicker>,
}

impl ValuationReport {
    /// An empty report for `as_of`.
    #[must_use]
    pub const fn new(as_of: Date) -> Self {
        Self {
            as_of,
            results: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of valued tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no ticker was valued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results ordered by descending undervaluation. Ties keep input order.
    #[must_use]
    pub fn sorted_by_undervaluation(&self) -> Vec<&ValuationResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| b.undervalued_pct.total_cmp(&a.undervalued_pct));
        sorted
    }

    /// Presentation table, sorted by descending undervaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if Polars cannot assemble the frame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = self.sorted_by_undervaluation();

        let text = |f: fn(&ValuationResult) -> String| -> Vec<String> {
            rows.iter().map(|r| f(r)).collect()
        };
        let number = |f: fn(&ValuationResult) -> f64| -> Vec<f64> {
            rows.iter().map(|r| f(r)).collect()
        };
        let optional = |f: fn(&ValuationResult) -> Option<f64>| -> Vec<Option<f64>> {
            rows.iter().map(|r| f(r)).collect()
        };
        let entries: Vec<EntryExit> = rows.iter().map(|r| r.entry).collect();
        let exits: Vec<EntryExit> = rows.iter().map(|r| r.exit).collect();

        let columns = vec![
            Series::new(REPORT_COLUMNS[0].into(), text(|r| r.symbol.clone())),
            Series::new(REPORT_COLUMNS[1].into(), text(|r| r.name.clone())),
            Series::new(REPORT_COLUMNS[2].into(), number(|r| r.fair_value)),
            Series::new(REPORT_COLUMNS[3].into(), number(|r| r.current_price)),
            Series::new(REPORT_COLUMNS[4].into(), number(|r| r.undervalued_pct)),
            Series::new(REPORT_COLUMNS[5].into(), text(|r| r.band.to_string())),
            Series::new(REPORT_COLUMNS[6].into(), text(|r| r.market.to_string())),
            Series::new(REPORT_COLUMNS[7].into(), text(|r| r.cap_size.to_string())),
            Series::new(REPORT_COLUMNS[8].into(), text(|r| r.industry.clone())),
            Series::new(REPORT_COLUMNS[9].into(), optional(|r| r.high_3y)),
            Series::new(REPORT_COLUMNS[10].into(), optional(|r| r.low_3y)),
            entry_exit_series(REPORT_COLUMNS[11], &entries),
            entry_exit_series(REPORT_COLUMNS[12], &exits),
            Series::new(REPORT_COLUMNS[13].into(), text(|r| r.signal.to_string())),
        ];

        Ok(DataFrame::new(columns.into_iter().map(Column::from).collect())?)
    }

    /// Write the presentation table as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be built or written.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        write_frame(&mut self.to_dataframe()?, writer)
    }

    /// Write the presentation table to a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

/// Entry/exit levels are numeric in price style and `Yes`/`No` in flag style.
fn entry_exit_series(name: &str, values: &[EntryExit]) -> Series {
    if values.iter().any(|v| v.flag().is_some()) {
        let labels: Vec<Option<String>> = values
            .iter()
            .map(|v| v.flag().map(|_| v.to_string()))
            .collect();
        Series::new(name.into(), labels)
    } else {
        let levels: Vec<Option<f64>> = values.iter().map(EntryExit::price).collect();
        Series::new(name.into(), levels)
    }
}

/// Backtest rows as a table.
///
/// # Errors
///
/// Returns an error if Polars cannot assemble the frame.
pub fn backtest_dataframe(rows: &[BacktestRow]) -> Result<DataFrame> {
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let simulated: Vec<f64> = rows.iter().map(|r| r.simulated_fair_value).collect();
    let avg: Vec<f64> = rows.iter().map(|r| r.avg_price).collect();
    let high: Vec<f64> = rows.iter().map(|r| r.high_price).collect();
    let low: Vec<f64> = rows.iter().map(|r| r.low_price).collect();
    let deviation: Vec<f64> = rows.iter().map(|r| r.deviation_pct).collect();
    let converged: Vec<&str> = rows
        .iter()
        .map(|r| if r.converged { "Yes" } else { "No" })
        .collect();

    let columns = vec![
        Series::new(BACKTEST_COLUMNS[0].into(), years),
        Series::new(BACKTEST_COLUMNS[1].into(), simulated),
        Series::new(BACKTEST_COLUMNS[2].into(), avg),
        Series::new(BACKTEST_COLUMNS[3].into(), high),
        Series::new(BACKTEST_COLUMNS[4].into(), low),
        Series::new(BACKTEST_COLUMNS[5].into(), deviation),
        Series::new(BACKTEST_COLUMNS[6].into(), converged),
    ];

    Ok(DataFrame::new(columns.into_iter().map(Column::from).collect())?)
}

/// Write backtest rows as CSV.
///
/// # Errors
///
/// Returns an error if the frame cannot be built or written.
pub fn write_backtest_csv<W: Write>(rows: &[BacktestRow], writer: W) -> Result<()> {
    write_frame(&mut backtest_dataframe(rows)?, writer)
}

fn write_frame<W: Write>(df: &mut DataFrame, mut writer: W) -> Result<()> {
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_float_precision(Some(2))
        .with_null_value(NOT_AVAILABLE.to_string())
        .finish(df)?;
    writer.flush()?;
    Ok(())
}

/// Read ticker symbols from the `Symbol` column of a CSV file.
///
/// # Errors
///
/// Returns [`ValoraError::MissingColumn`] if the file has no `Symbol`
/// column, or an I/O or parse error.
pub fn read_symbols(path: impl AsRef<Path>) -> Result<Vec<Symbol>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(File::open(path)?)
        .finish()?;
    symbols_from_frame(&df)
}

/// Read ticker symbols from in-memory CSV text.
///
/// # Errors
///
/// See [`read_symbols`].
pub fn parse_symbols(csv: &str) -> Result<Vec<Symbol>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes().to_vec()))
        .finish()?;
    symbols_from_frame(&df)
}

fn symbols_from_frame(df: &DataFrame) -> Result<Vec<Symbol>> {
    let column = df
        .column(SYMBOL_COLUMN)
        .map_err(|_| ValoraError::MissingColumn(SYMBOL_COLUMN.to_string()))?;
    let symbols = column.as_materialized_series().cast(&DataType::String)?;

    Ok(symbols
        .str()?
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

/// Split a comma-separated symbol list, dropping blanks.
#[must_use]
pub fn split_symbols(list: &str) -> Vec<Symbol> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use valora_traits::{CompanyInfo, PriceBar, PriceHistory};
    use valora_value::{EntryExitStyle, ValuationConfig, classify};

    fn as_of() -> Date {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn company() -> CompanyInfo {
        CompanyInfo {
            name: "Apple Inc.".to_string(),
            industry: "Consumer Electronics".to_string(),
            market_cap: 3_000_000_000_000.0,
        }
    }

    fn result(symbol: &str, fair: f64, current: f64, history: &PriceHistory) -> ValuationResult {
        classify(symbol, fair, current, &company(), history, &ValuationConfig::default()).unwrap()
    }

    fn csv_text(report: &ValuationReport) -> String {
        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_sorted_by_undervaluation() {
        let empty = PriceHistory::default();
        let mut report = ValuationReport::new(as_of());
        report.results = vec![
            result("A", 105.0, 100.0, &empty),
            result("B", 135.0, 100.0, &empty),
            result("C", 90.0, 100.0, &empty),
            result("D", 135.0, 100.0, &empty),
        ];

        let order: Vec<_> = report
            .sorted_by_undervaluation()
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(order, ["B", "D", "A", "C"]);
        // The stored order is untouched.
        assert_eq!(report.results[0].symbol, "A");
    }

    #[test]
    fn test_report_header_and_missing_values() {
        let mut report = ValuationReport::new(as_of());
        report
            .results
            .push(result("AAPL", 135.0, 100.0, &PriceHistory::default()));

        let text = csv_text(&report);
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), REPORT_COLUMNS.join(","));

        let row = lines.next().unwrap();
        assert!(row.starts_with("AAPL,Apple Inc.,135.00,100.00,35.00,Deep Discount,USA,Mega,"));
        assert!(row.ends_with("N/A,N/A,N/A,N/A,Buy"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_report_entry_exit_columns() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let history = PriceHistory::new(vec![PriceBar::new(d, 200.0, 90.0, 150.0)]);

        let mut report = ValuationReport::new(as_of());
        report.results.push(result("AAPL", 120.0, 100.0, &history));
        let df = report.to_dataframe().unwrap();
        assert_eq!(df.shape(), (1, REPORT_COLUMNS.len()));
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, REPORT_COLUMNS);

        let level = |name: &str| {
            df.column(name)
                .unwrap()
                .as_materialized_series()
                .f64()
                .unwrap()
                .get(0)
        };
        let (entry, exit) = (level("Entry Price"), level("Exit Price"));
        assert_eq!(entry, Some(94.5));
        assert_eq!(exit, Some(190.0));

        let config = ValuationConfig {
            entry_exit: EntryExitStyle::Flag,
            ..ValuationConfig::default()
        };
        report.results[0] =
            classify("AAPL", 120.0, 100.0, &company(), &history, &config).unwrap();
        let text = csv_text(&report);
        let row = text.lines().nth(1).unwrap();
        // current 100 <= 94.5 is false; current 100 >= 190 is false.
        assert!(row.ends_with("No,No,Buy"));
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let text = csv_text(&ValuationReport::new(as_of()));
        assert_eq!(text.lines().count(), 1);
        assert!(ValuationReport::new(as_of()).is_empty());
    }

    #[test]
    fn test_backtest_csv() {
        let rows = vec![
            BacktestRow {
                year: 2023,
                simulated_fair_value: 82.64,
                avg_price: 80.0,
                high_price: 95.0,
                low_price: 70.0,
                deviation_pct: 3.3,
                converged: true,
            },
            BacktestRow {
                year: 2024,
                simulated_fair_value: 90.91,
                avg_price: 120.0,
                high_price: 130.0,
                low_price: 110.0,
                deviation_pct: -24.24,
                converged: false,
            },
        ];

        let mut buf = Vec::new();
        write_backtest_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], BACKTEST_COLUMNS.join(","));
        assert_eq!(lines[1], "2023,82.64,80.00,95.00,70.00,3.30,Yes");
        assert_eq!(lines[2], "2024,90.91,120.00,130.00,110.00,-24.24,No");
    }

    #[test]
    fn test_parse_symbols() {
        let symbols = parse_symbols("Symbol,Note\nAAPL,x\n INFY.NS ,y\n,z\nMSFT,w\n").unwrap();
        assert_eq!(symbols, ["AAPL", "INFY.NS", "MSFT"]);
    }

    #[test]
    fn test_parse_symbols_missing_column() {
        let err = parse_symbols("Ticker\nAAPL\n").unwrap_err();
        assert!(matches!(err, ValoraError::MissingColumn(ref c) if c == "Symbol"));
    }

    #[test]
    fn test_split_symbols() {
        assert_eq!(split_symbols("AAPL, MSFT,,INFY.NS "), ["AAPL", "MSFT", "INFY.NS"]);
        assert!(split_symbols(" , ").is_empty());
    }
}
