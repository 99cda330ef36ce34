//! Common types used throughout the Valora workspace.
//!
//! This module defines the inputs to the valuation models: a fundamentals
//! snapshot whose fields may each be missing, the validated subset the
//! EV/EBITDA model needs, and a date-ordered daily price history.

use crate::{Result, ValoraError};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. `"AAPL"` or `"INFY.NS"`.
pub type Symbol = String;

/// The same calendar day `years` earlier. February 29 falls back to the 28th.
///
/// ```
/// use valora_traits::{Date, types::years_before};
///
/// let leap = Date::from_ymd_opt(2024, 2, 29).unwrap();
/// assert_eq!(years_before(leap, 3).unwrap(), Date::from_ymd_opt(2021, 2, 28).unwrap());
/// ```
///
/// # Errors
///
/// Returns [`ValoraError::InvalidDate`] if the target year is outside the
/// representable date range.
pub fn years_before(date: Date, years: u32) -> Result<Date> {
    i32::try_from(years)
        .ok()
        .and_then(|n| date.year().checked_sub(n))
        .and_then(|year| {
            date.with_year(year)
                .or_else(|| Date::from_ymd_opt(year, date.month(), 28))
        })
        .ok_or_else(|| {
            ValoraError::InvalidDate(format!("{years} years before {date} is out of range"))
        })
}

/// Current fundamentals for a single ticker as reported by a data source.
///
/// Every field is optional because providers routinely omit values for
/// thinly covered symbols. [`FundamentalsSnapshot::validate`] is the single
/// place that turns missing required fields into an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Enterprise value.
    pub enterprise_value: Option<f64>,
    /// Trailing EBITDA. May be zero or negative.
    pub ebitda: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Latest market price.
    pub current_price: Option<f64>,
    /// Short company name.
    pub short_name: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
}

/// The three inputs the EV/EBITDA fair value model requires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvEbitdaInputs {
    /// Enterprise value.
    pub enterprise_value: f64,
    /// Trailing EBITDA.
    pub ebitda: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
}

/// Descriptive company fields carried into the valuation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Company name, `"N/A"` when unknown.
    pub name: String,
    /// Industry, `"N/A"` when unknown.
    pub industry: String,
    /// Market capitalization, zero when unknown.
    pub market_cap: f64,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "N/A".to_string(),
            industry: "N/A".to_string(),
            market_cap: 0.0,
        }
    }
}

impl FundamentalsSnapshot {
    /// Create an empty snapshot for a symbol.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Extract the EV/EBITDA model inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::MissingField`] naming the first absent field,
    /// and [`ValoraError::InvalidData`] if a present field is not finite.
    pub fn validate(&self) -> Result<EvEbitdaInputs> {
        let enterprise_value = require(self.enterprise_value, "enterpriseValue")?;
        let ebitda = require(self.ebitda, "ebitda")?;
        let shares_outstanding = require(self.shares_outstanding, "sharesOutstanding")?;

        Ok(EvEbitdaInputs {
            enterprise_value,
            ebitda,
            shares_outstanding,
        })
    }

    /// The current price, or an error if the provider did not report one.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::MissingField`] if absent and
    /// [`ValoraError::InvalidData`] if not finite.
    pub fn require_price(&self) -> Result<f64> {
        require(self.current_price, "currentPrice")
    }

    /// Descriptive fields with the provider defaults applied.
    #[must_use]
    pub fn company(&self) -> CompanyInfo {
        let defaults = CompanyInfo::default();
        CompanyInfo {
            name: self.short_name.clone().unwrap_or(defaults.name),
            industry: self.industry.clone().unwrap_or(defaults.industry),
            market_cap: self.market_cap.unwrap_or(defaults.market_cap),
        }
    }
}

fn require(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        None => Err(ValoraError::MissingField(field.to_string())),
        Some(v) if !v.is_finite() => Err(ValoraError::InvalidData(format!(
            "{field} is not a finite number"
        ))),
        Some(v) => Ok(v),
    }
}

/// A single daily price bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: Date,
    /// Intraday high.
    pub high: f64,
    /// Intraday low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

impl PriceBar {
    /// Create a new price bar.
    #[must_use]
    pub const fn new(date: Date, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            high,
            low,
            close,
        }
    }

    /// Whether every price field is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Daily price history for one ticker, kept in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Create a history from bars in any order.
    #[must_use]
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    /// All bars in ascending date order.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the history has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Highest intraday high over the whole history.
    #[must_use]
    pub fn high(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.high).reduce(f64::max)
    }

    /// Lowest intraday low over the whole history.
    #[must_use]
    pub fn low(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.low).reduce(f64::min)
    }

    /// Bars dated within the given calendar year.
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &PriceBar> + '_ {
        self.bars.iter().filter(move |b| b.date.year() == year)
    }

    /// The sub-history with `start <= date <= end`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date <= end)
                .copied()
                .collect(),
        }
    }
}

impl From<Vec<PriceBar>> for PriceHistory {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}

impl FromIterator<PriceBar> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PriceBar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_years_before() {
        assert_eq!(years_before(date(2025, 6, 30), 3).unwrap(), date(2022, 6, 30));
        assert_eq!(years_before(date(2024, 2, 29), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(years_before(date(2025, 6, 30), 0).unwrap(), date(2025, 6, 30));
    }

    #[test]
    fn test_years_before_out_of_range() {
        for years in [300_000, 2_147_483_648, u32::MAX] {
            let err = years_before(date(2026, 10, 19), years).unwrap_err();
            assert!(matches!(err, ValoraError::InvalidDate(_)), "{years}: {err}");
        }
    }

    fn full_snapshot() -> FundamentalsSnapshot {
        FundamentalsSnapshot {
            symbol: "AAPL".to_string(),
            enterprise_value: Some(1_000.0),
            ebitda: Some(100.0),
            shares_outstanding: Some(10.0),
            current_price: Some(90.0),
            short_name: Some("Apple Inc.".to_string()),
            industry: Some("Consumer Electronics".to_string()),
            market_cap: Some(3.0e12),
        }
    }

    #[test]
    fn test_validate_complete() {
        let inputs = full_snapshot().validate().unwrap();
        assert_eq!(inputs.enterprise_value, 1_000.0);
        assert_eq!(inputs.ebitda, 100.0);
        assert_eq!(inputs.shares_outstanding, 10.0);
    }

    #[test]
    fn test_validate_names_missing_field() {
        let mut snap = full_snapshot();
        snap.ebitda = None;
        match snap.validate() {
            Err(ValoraError::MissingField(f)) => assert_eq!(f, "ebitda"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut snap = full_snapshot();
        snap.shares_outstanding = Some(f64::NAN);
        assert!(matches!(snap.validate(), Err(ValoraError::InvalidData(_))));
    }

    #[test]
    fn test_require_price() {
        let mut snap = full_snapshot();
        assert_eq!(snap.require_price().unwrap(), 90.0);
        snap.current_price = None;
        assert!(matches!(
            snap.require_price(),
            Err(ValoraError::MissingField(_))
        ));
    }

    #[test]
    fn test_company_defaults() {
        let info = FundamentalsSnapshot::new("XYZ").company();
        assert_eq!(info.name, "N/A");
        assert_eq!(info.industry, "N/A");
        assert_eq!(info.market_cap, 0.0);

        let info = full_snapshot().company();
        assert_eq!(info.name, "Apple Inc.");
    }

    #[test]
    fn test_history_sorted_and_extremes() {
        let history = PriceHistory::new(vec![
            PriceBar::new(date(2024, 3, 1), 12.0, 9.0, 10.0),
            PriceBar::new(date(2023, 1, 2), 15.0, 11.0, 14.0),
            PriceBar::new(date(2024, 1, 5), 11.0, 7.5, 8.0),
        ]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.bars()[0].date, date(2023, 1, 2));
        assert_eq!(history.high(), Some(15.0));
        assert_eq!(history.low(), Some(7.5));
        assert_eq!(history.in_year(2024).count(), 2);
        assert_eq!(history.in_year(2022).count(), 0);
    }

    #[test]
    fn test_empty_history() {
        let history = PriceHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.high(), None);
        assert_eq!(history.low(), None);
    }

    #[test]
    fn test_between_inclusive() {
        let history: PriceHistory = (1..=5)
            .map(|d| PriceBar::new(date(2024, 1, d), 1.0, 1.0, 1.0))
            .collect();
        let sub = history.between(date(2024, 1, 2), date(2024, 1, 4));
        assert_eq!(sub.len(), 3);
    }

    #[test]
    fn test_bar_is_finite() {
        assert!(PriceBar::new(date(2024, 1, 1), 1.0, 1.0, 1.0).is_finite());
        assert!(!PriceBar::new(date(2024, 1, 1), 1.0, f64::NAN, 1.0).is_finite());
    }
}
