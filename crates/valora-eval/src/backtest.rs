//! Reverse-CAGR fair value backtest.
//!
//! For every past calendar year in the lookback window the current fair
//! value is discounted back to that year and compared with the year's
//! average, high and low prices.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use valora_traits::{
    PriceHistory, Result, ValoraError,
    stats::{mean, percent_gap, round2},
    types::years_before,
};

/// Longest lookback the backtester accepts, in years.
pub const MAX_LOOKBACK_YEARS: u32 = 100;

/// Backtesting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Number of past calendar years to reconstruct (default: 3)
    pub lookback_years: u32,
    /// Annual growth rate used to discount the fair value backward (default: 0.10)
    pub reverse_growth_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            lookback_years: 3,
            reverse_growth_rate: 0.10,
        }
    }
}

impl BacktestConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidData`] if `lookback_years` exceeds
    /// [`MAX_LOOKBACK_YEARS`] or the growth rate is not finite and above -1.
    pub fn validate(&self) -> Result<()> {
        if self.lookback_years > MAX_LOOKBACK_YEARS {
            return Err(ValoraError::InvalidData(format!(
                "lookback of {} years exceeds the maximum of {MAX_LOOKBACK_YEARS}",
                self.lookback_years
            )));
        }
        if !self.reverse_growth_rate.is_finite() || self.reverse_growth_rate <= -1.0 {
            return Err(ValoraError::InvalidData(format!(
                "reverse growth rate must be greater than -1, got {}",
                self.reverse_growth_rate
            )));
        }
        Ok(())
    }
}

/// Reconstruction for one historical year. Prices are rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestRow {
    /// Calendar year.
    pub year: i32,
    /// Fair value discounted back to this year.
    pub simulated_fair_value: f64,
    /// Mean closing price over the year.
    pub avg_price: f64,
    /// Highest high over the year.
    pub high_price: f64,
    /// Lowest low over the year.
    pub low_price: f64,
    /// `(simulated - avg) / avg * 100`.
    pub deviation_pct: f64,
    /// Whether the simulated value fell inside `[low, high]`.
    pub converged: bool,
}

/// Aggregate view over a set of backtest rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Number of years reconstructed.
    pub years: usize,
    /// Number of years whose trading range contained the simulated value.
    pub converged_years: usize,
    /// Mean deviation percentage, `None` without rows.
    pub mean_deviation_pct: Option<f64>,
}

impl BacktestSummary {
    /// Summarize backtest rows.
    #[must_use]
    pub fn from_rows(rows: &[BacktestRow]) -> Self {
        let deviations: Vec<f64> = rows.iter().map(|r| r.deviation_pct).collect();
        Self {
            years: rows.len(),
            converged_years: rows.iter().filter(|r| r.converged).count(),
            mean_deviation_pct: mean(&deviations).map(round2),
        }
    }

    /// Fraction of years that converged, `None` without rows.
    #[must_use]
    pub fn convergence_rate(&self) -> Option<f64> {
        (self.years > 0).then(|| self.converged_years as f64 / self.years as f64)
    }
}

/// Backtesting engine.
#[derive(Debug, Default)]
pub struct Backtest {
    /// Configuration
    config: BacktestConfig,
}

impl Backtest {
    /// Create a new backtest with configuration.
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Date range of price history to request: `lookback_years` back from
    /// `as_of` to `as_of` itself. A February 29 start falls back to the 28th.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn window(&self, as_of: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        self.config.validate()?;
        Ok((years_before(as_of, self.config.lookback_years)?, as_of))
    }

    /// Calendar years reconstructed for `as_of`, oldest first. The current
    /// year is never included.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn years(&self, as_of: NaiveDate) -> Result<std::ops::Range<i32>> {
        self.config.validate()?;
        let current = as_of.year();
        let first = i32::try_from(self.config.lookback_years)
            .ok()
            .and_then(|n| current.checked_sub(n))
            .ok_or_else(|| {
                ValoraError::InvalidDate(format!(
                    "{} years before {as_of} is out of range",
                    self.config.lookback_years
                ))
            })?;
        Ok(first..current)
    }

    /// Run the backtest.
    ///
    /// # Arguments
    ///
    /// * `history` - Daily bars covering the lookback window
    /// * `current_fair_value` - Today's fair value estimate
    /// * `as_of` - Date whose year counts as the current year
    ///
    /// # Returns
    ///
    /// One row per year in [`Backtest::years`] that has at least one bar,
    /// ascending by year. An empty history yields no rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidData`] if the configuration is invalid,
    /// the fair value is not finite or any bar in the window has a non-finite
    /// price, and [`ValoraError::Arithmetic`] if a year's average close is
    /// zero. No partial result is produced.
    pub fn run(
        &self,
        history: &PriceHistory,
        current_fair_value: f64,
        as_of: NaiveDate,
    ) -> Result<Vec<BacktestRow>> {
        let years = self.years(as_of)?;
        if history.is_empty() {
            return Ok(Vec::new());
        }
        if !current_fair_value.is_finite() {
            return Err(ValoraError::InvalidData(format!(
                "current fair value is not finite: {current_fair_value}"
            )));
        }

        let current_year = as_of.year();
        let growth = 1.0 + self.config.reverse_growth_rate;
        let mut rows = Vec::with_capacity(self.config.lookback_years as usize);

        for year in years {
            let bars: Vec<_> = history.in_year(year).collect();
            if bars.is_empty() {
                continue;
            }
            if let Some(bad) = bars.iter().find(|b| !b.is_finite()) {
                return Err(ValoraError::InvalidData(format!(
                    "malformed price bar on {}",
                    bad.date
                )));
            }

            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let avg_price = mean(&closes).unwrap_or_default();
            let high_price = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let low_price = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

            let reverse_years = current_year - year;
            let simulated = current_fair_value / growth.powi(reverse_years);
            let deviation_pct = percent_gap(simulated, avg_price).ok_or_else(|| {
                ValoraError::Arithmetic(format!("average price for {year} is zero"))
            })?;
            let converged = low_price <= simulated && simulated <= high_price;

            rows.push(BacktestRow {
                year,
                simulated_fair_value: round2(simulated),
                avg_price: round2(avg_price),
                high_price: round2(high_price),
                low_price: round2(low_price),
                deviation_pct: round2(deviation_pct),
                converged,
            });
        }

        Ok(rows)
    }
}

/// Run a backtest with the given configuration.
///
/// # Errors
///
/// See [`Backtest::run`].
pub fn backtest_fair_value(
    history: &PriceHistory,
    current_fair_value: f64,
    config: &BacktestConfig,
    as_of: NaiveDate,
) -> Result<Vec<BacktestRow>> {
    Backtest::new(*config).run(history, current_fair_value, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valora_traits::PriceBar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn as_of() -> NaiveDate {
        d(2026, 10, 19)
    }

    fn bar(date: NaiveDate, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar::new(date, high, low, close)
    }

    #[test]
    fn test_backtest_config_default() {
        let config = BacktestConfig::default();
        assert_eq!(config.lookback_years, 3);
        assert_relative_eq!(config.reverse_growth_rate, 0.10);
    }

    #[test]
    fn test_one_year_back() {
        let history = PriceHistory::new(vec![
            bar(d(2025, 3, 3), 95.0, 85.0, 90.0),
            bar(d(2025, 7, 1), 100.0, 88.0, 92.0),
        ]);
        let rows = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of())
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = rows[0];
        assert_eq!(row.year, 2025);
        assert_eq!(row.simulated_fair_value, 90.91);
        assert_eq!(row.avg_price, 91.0);
        assert_eq!(row.high_price, 100.0);
        assert_eq!(row.low_price, 85.0);
        assert_eq!(row.deviation_pct, -0.1);
        assert!(row.converged);
    }

    #[test]
    fn test_current_year_excluded() {
        let history = PriceHistory::new(vec![
            bar(d(2026, 1, 5), 200.0, 50.0, 100.0),
            bar(d(2026, 10, 1), 200.0, 50.0, 100.0),
        ]);
        let rows = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_one_row_per_year_with_gaps_ascending() {
        let history = PriceHistory::new(vec![
            bar(d(2025, 6, 2), 120.0, 80.0, 100.0),
            bar(d(2023, 11, 1), 120.0, 80.0, 100.0),
            bar(d(2023, 12, 1), 120.0, 80.0, 100.0),
            bar(d(2022, 5, 1), 120.0, 80.0, 100.0),
        ]);
        let rows = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of())
            .unwrap();
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        // 2022 is outside the 3-year range, 2024 has no bars
        assert_eq!(years, vec![2023, 2025]);
        assert_eq!(rows[0].simulated_fair_value, 75.13);
    }

    #[test]
    fn test_converged_inclusive_boundaries() {
        // 1.25 is exact in binary, so the 2025 simulated value is exactly 100.0.
        let fv = 125.0;
        let config = BacktestConfig {
            reverse_growth_rate: 0.25,
            ..BacktestConfig::default()
        };
        let at_low = PriceHistory::new(vec![bar(d(2025, 1, 2), 120.0, 100.0, 110.0)]);
        let at_high = PriceHistory::new(vec![bar(d(2025, 1, 2), 100.0, 80.0, 90.0)]);
        let above = PriceHistory::new(vec![bar(d(2025, 1, 2), 99.99, 80.0, 90.0)]);
        let below = PriceHistory::new(vec![bar(d(2025, 1, 2), 120.0, 100.01, 110.0)]);

        let run = |h: &PriceHistory| backtest_fair_value(h, fv, &config, as_of()).unwrap()[0];

        assert!(run(&at_low).converged);
        assert!(run(&at_high).converged);
        assert!(!run(&above).converged);
        assert!(!run(&below).converged);
    }

    #[test]
    fn test_empty_history() {
        let rows = backtest_fair_value(
            &PriceHistory::default(),
            100.0,
            &BacktestConfig::default(),
            as_of(),
        )
        .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_history_fails_whole_ticker() {
        let history = PriceHistory::new(vec![
            bar(d(2024, 1, 2), 120.0, 80.0, 100.0),
            bar(d(2025, 1, 2), f64::NAN, 80.0, 100.0),
        ]);
        let result = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of());
        assert!(matches!(result, Err(ValoraError::InvalidData(_))));
    }

    #[test]
    fn test_zero_close_bar_keeps_year() {
        let history = PriceHistory::new(vec![
            bar(d(2025, 1, 2), 120.0, 0.0, 0.0),
            bar(d(2025, 1, 3), 120.0, 80.0, 100.0),
        ]);
        let rows = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_price, 50.0);
        assert_eq!(rows[0].low_price, 0.0);
        assert!(rows[0].converged);
    }

    #[test]
    fn test_zero_average_close_fails() {
        let history = PriceHistory::new(vec![bar(d(2025, 1, 2), 0.0, 0.0, 0.0)]);
        let result = backtest_fair_value(&history, 100.0, &BacktestConfig::default(), as_of());
        assert!(matches!(result, Err(ValoraError::Arithmetic(_))));
    }

    #[test]
    fn test_non_finite_fair_value() {
        let history = PriceHistory::new(vec![bar(d(2025, 1, 2), 120.0, 80.0, 100.0)]);
        let result =
            backtest_fair_value(&history, f64::INFINITY, &BacktestConfig::default(), as_of());
        assert!(result.is_err());
    }

    #[test]
    fn test_configurable_rate_and_lookback() {
        let history = PriceHistory::new(vec![
            bar(d(2021, 6, 1), 500.0, 1.0, 100.0),
            bar(d(2025, 6, 1), 500.0, 1.0, 100.0),
        ]);
        let config = BacktestConfig {
            lookback_years: 5,
            reverse_growth_rate: 0.0,
        };
        let rows = backtest_fair_value(&history, 100.0, &config, as_of()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.simulated_fair_value == 100.0));
        assert!(rows.iter().all(|r| r.deviation_pct == 0.0));
    }

    #[test]
    fn test_window_and_years() {
        let backtest = Backtest::default();
        assert_eq!(backtest.window(as_of()).unwrap(), (d(2023, 10, 19), as_of()));
        assert_eq!(backtest.years(as_of()).unwrap(), 2023..2026);

        let leap = d(2024, 2, 29);
        assert_eq!(backtest.window(leap).unwrap().0, d(2021, 2, 28));
    }

    #[test]
    fn test_lookback_out_of_range() {
        let history = PriceHistory::new(vec![bar(d(2025, 1, 2), 120.0, 80.0, 100.0)]);
        for lookback_years in [MAX_LOOKBACK_YEARS + 1, 300_000, 2_147_483_648, u32::MAX] {
            let config = BacktestConfig {
                lookback_years,
                ..BacktestConfig::default()
            };
            let backtest = Backtest::new(config);
            assert!(matches!(backtest.window(as_of()), Err(ValoraError::InvalidData(_))));
            assert!(matches!(backtest.years(as_of()), Err(ValoraError::InvalidData(_))));
            assert!(backtest.run(&history, 100.0, as_of()).is_err());
        }

        let longest = Backtest::new(BacktestConfig {
            lookback_years: MAX_LOOKBACK_YEARS,
            ..BacktestConfig::default()
        });
        assert_eq!(longest.years(as_of()).unwrap(), 1926..2026);
        assert_eq!(longest.window(as_of()).unwrap().0, d(1926, 10, 19));
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let config = BacktestConfig {
            reverse_growth_rate: -1.0,
            ..BacktestConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(BacktestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_idempotent() {
        let history = PriceHistory::new(vec![
            bar(d(2024, 3, 3), 95.0, 85.0, 90.0),
            bar(d(2025, 7, 1), 100.0, 88.0, 92.0),
        ]);
        let config = BacktestConfig::default();
        let a = backtest_fair_value(&history, 123.45, &config, as_of()).unwrap();
        let b = backtest_fair_value(&history, 123.45, &config, as_of()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary() {
        let rows = vec![
            BacktestRow {
                year: 2024,
                simulated_fair_value: 90.0,
                avg_price: 100.0,
                high_price: 110.0,
                low_price: 85.0,
                deviation_pct: -10.0,
                converged: true,
            },
            BacktestRow {
                year: 2025,
                simulated_fair_value: 99.0,
                avg_price: 90.0,
                high_price: 95.0,
                low_price: 80.0,
                deviation_pct: 10.0,
                converged: false,
            },
        ];
        let summary = BacktestSummary::from_rows(&rows);
        assert_eq!(summary.years, 2);
        assert_eq!(summary.converged_years, 1);
        assert_eq!(summary.mean_deviation_pct, Some(0.0));
        assert_relative_eq!(summary.convergence_rate().unwrap(), 0.5);

        let empty = BacktestSummary::from_rows(&[]);
        assert_eq!(empty.convergence_rate(), None);
        assert_eq!(empty.mean_deviation_pct, None);
    }
}
