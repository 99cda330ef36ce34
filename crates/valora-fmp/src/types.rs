//! Data types for FMP API responses.

use crate::{FmpError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valora_traits::{FundamentalsSnapshot, PriceBar, PriceHistory};

/// Income statement data from FMP, narrowed to the fields the EV/EBITDA
/// model reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Filing date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period (annual/quarterly).
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Net income.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// EBITDA.
    #[serde(default)]
    pub ebitda: Option<f64>,
}

/// Enterprise value breakdown from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseValue {
    /// Ticker symbol.
    pub symbol: String,
    /// Valuation date.
    pub date: String,
    /// Share price used in the calculation.
    #[serde(default)]
    pub stock_price: Option<f64>,
    /// Shares outstanding.
    #[serde(default)]
    pub number_of_shares: Option<f64>,
    /// Market capitalization.
    #[serde(default)]
    pub market_capitalization: Option<f64>,
    /// Enterprise value.
    #[serde(default)]
    pub enterprise_value: Option<f64>,
}

/// Company profile from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Full company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Industry classification.
    #[serde(default)]
    pub industry: Option<String>,
    /// Sector classification.
    #[serde(default)]
    pub sector: Option<String>,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Current price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Market capitalization.
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current price.
    pub price: f64,
    /// 52-week high.
    #[serde(default)]
    pub year_high: Option<f64>,
    /// 52-week low.
    #[serde(default)]
    pub year_low: Option<f64>,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Volume.
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Historical price data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Open price.
    #[serde(default)]
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Volume.
    #[serde(default)]
    pub volume: f64,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Convert into a price bar.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::Malformed`] if the date cannot be parsed.
    pub fn to_bar(&self) -> Result<PriceBar> {
        let date = self
            .parsed_date()
            .ok_or_else(|| FmpError::Malformed(format!("unparseable date '{}'", self.date)))?;
        Ok(PriceBar::new(date, self.high, self.low, self.close))
    }
}

/// Convert a list of FMP bars (newest first) into a [`PriceHistory`].
///
/// # Errors
///
/// Returns [`FmpError::Malformed`] if any bar carries an unparseable date.
pub fn to_history(prices: &[HistoricalPrice]) -> Result<PriceHistory> {
    prices
        .iter()
        .map(HistoricalPrice::to_bar)
        .collect::<Result<Vec<_>>>()
        .map(PriceHistory::new)
}

/// Raw endpoint responses gathered for one symbol.
#[derive(Debug, Clone, Default)]
pub struct FundamentalData {
    /// Ticker symbol.
    pub symbol: String,
    /// Current quote.
    pub quote: Option<Quote>,
    /// Company profile.
    pub profile: Option<CompanyProfile>,
    /// Most recent enterprise value record.
    pub enterprise_value: Option<EnterpriseValue>,
    /// Most recent annual income statement.
    pub income: Option<IncomeStatement>,
}

impl FundamentalData {
    /// Whether no endpoint returned anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quote.is_none()
            && self.profile.is_none()
            && self.enterprise_value.is_none()
            && self.income.is_none()
    }

    /// Flatten the endpoint responses into a snapshot.
    ///
    /// Price, name and market cap prefer the live quote and fall back to the
    /// profile, then the enterprise value record.
    #[must_use]
    pub fn to_snapshot(&self) -> FundamentalsSnapshot {
        let quote = self.quote.as_ref();
        let profile = self.profile.as_ref();
        let ev = self.enterprise_value.as_ref();

        FundamentalsSnapshot {
            symbol: self.symbol.clone(),
            enterprise_value: ev.and_then(|e| e.enterprise_value),
            ebitda: self.income.as_ref().and_then(|i| i.ebitda),
            shares_outstanding: ev.and_then(|e| e.number_of_shares),
            current_price: quote
                .map(|q| q.price)
                .or_else(|| profile.and_then(|p| p.price))
                .or_else(|| ev.and_then(|e| e.stock_price)),
            short_name: quote
                .and_then(|q| q.name.clone())
                .or_else(|| profile.and_then(|p| p.company_name.clone())),
            industry: profile.and_then(|p| p.industry.clone()),
            market_cap: quote
                .and_then(|q| q.market_cap)
                .or_else(|| profile.and_then(|p| p.market_cap))
                .or_else(|| ev.and_then(|e| e.market_capitalization)),
        }
    }
}
