//! Classification of a fair price against the market.

use crate::{CapSize, Market, ValuationBand, ValuationConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use valora_traits::{
    CompanyInfo, PriceHistory, Result, ValoraError,
    stats::{percent_gap, round2},
};

/// Entry level sits 5% above the 3-year low.
pub const ENTRY_MARKUP: f64 = 1.05;
/// Exit level sits 5% below the 3-year high.
pub const EXIT_MARKDOWN: f64 = 0.95;

/// How entry and exit points are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryExitStyle {
    /// Price levels: 3-year low + 5% and 3-year high - 5%.
    #[default]
    Price,
    /// Whether the current price is within 5% of the 3-year low / high.
    Flag,
}

impl std::str::FromStr for EntryExitStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "flag" => Ok(Self::Flag),
            other => Err(format!(
                "unknown entry/exit style '{other}' (expected price or flag)"
            )),
        }
    }
}

/// An entry or exit point in either representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryExit {
    /// Price level, rounded to 2 decimals.
    Price(f64),
    /// Proximity flag.
    Flag(bool),
    /// No price history to derive a level from.
    NotAvailable,
}

impl EntryExit {
    /// Numeric level if this is a price.
    #[must_use]
    pub const fn price(&self) -> Option<f64> {
        match self {
            Self::Price(p) => Some(*p),
            _ => None,
        }
    }

    /// Flag value if this is a flag.
    #[must_use]
    pub const fn flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for EntryExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price(p) => write!(f, "{p:.2}"),
            Self::Flag(true) => f.write_str("Yes"),
            Self::Flag(false) => f.write_str("No"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Buy/hold recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSignal {
    /// Fair price above current price.
    Buy,
    /// Fair price at or below current price.
    #[serde(rename = "Hold/Sell")]
    HoldSell,
}

impl TradeSignal {
    /// `Buy` iff `fair_price > current_price`.
    #[must_use]
    pub fn from_prices(fair_price: f64, current_price: f64) -> Self {
        if fair_price > current_price {
            Self::Buy
        } else {
            Self::HoldSell
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::HoldSell => "Hold/Sell",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Valuation outcome for one ticker. Monetary fields are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Projected fair price per share.
    pub fair_value: f64,
    /// Current market price.
    pub current_price: f64,
    /// `(fair - current) / current * 100`.
    pub undervalued_pct: f64,
    /// Valuation band.
    pub band: ValuationBand,
    /// Listing market.
    pub market: Market,
    /// Size bucket.
    pub cap_size: CapSize,
    /// Industry.
    pub industry: String,
    /// Highest high over the history window.
    pub high_3y: Option<f64>,
    /// Lowest low over the history window.
    pub low_3y: Option<f64>,
    /// Suggested entry.
    pub entry: EntryExit,
    /// Suggested exit.
    pub exit: EntryExit,
    /// Buy/hold signal.
    pub signal: TradeSignal,
}

/// Classify a fair price against the current price.
///
/// Band and signal are decided on unrounded values; rounding is applied only
/// to the fields of the returned record.
///
/// # Errors
///
/// - [`ValoraError::Arithmetic`] if `current_price` is zero
/// - [`ValoraError::InvalidData`] if either price is not finite
pub fn classify(
    symbol: &str,
    fair_price: f64,
    current_price: f64,
    company: &CompanyInfo,
    history: &PriceHistory,
    config: &ValuationConfig,
) -> Result<ValuationResult> {
    if !fair_price.is_finite() || !current_price.is_finite() {
        return Err(ValoraError::InvalidData(format!(
            "non-finite price for {symbol} (fair={fair_price}, current={current_price})"
        )));
    }
    let undervalued_pct = percent_gap(fair_price, current_price)
        .ok_or_else(|| ValoraError::Arithmetic(format!("current price of {symbol} is zero")))?;

    let band = config.variant.band(undervalued_pct, fair_price);
    let signal = TradeSignal::from_prices(fair_price, current_price);

    let high_3y = history.high();
    let low_3y = history.low();
    let (entry, exit) = entry_exit(config.entry_exit, current_price, low_3y, high_3y);

    Ok(ValuationResult {
        symbol: symbol.to_string(),
        name: company.name.clone(),
        fair_value: round2(fair_price),
        current_price: round2(current_price),
        undervalued_pct: round2(undervalued_pct),
        band,
        market: Market::from_symbol(symbol),
        cap_size: CapSize::from_market_cap(company.market_cap),
        industry: company.industry.clone(),
        high_3y: high_3y.map(round2),
        low_3y: low_3y.map(round2),
        entry,
        exit,
        signal,
    })
}

fn entry_exit(
    style: EntryExitStyle,
    current_price: f64,
    low: Option<f64>,
    high: Option<f64>,
) -> (EntryExit, EntryExit) {
    let level = |v: Option<f64>, factor: f64| v.map(|v| v * factor);
    let entry = level(low, ENTRY_MARKUP);
    let exit = level(high, EXIT_MARKDOWN);

    match style {
        EntryExitStyle::Price => (
            entry.map_or(EntryExit::NotAvailable, |e| EntryExit::Price(round2(e))),
            exit.map_or(EntryExit::NotAvailable, |x| EntryExit::Price(round2(x))),
        ),
        EntryExitStyle::Flag => (
            entry.map_or(EntryExit::NotAvailable, |e| {
                EntryExit::Flag(current_price <= e)
            }),
            exit.map_or(EntryExit::NotAvailable, |x| {
                EntryExit::Flag(current_price >= x)
            }),
        ),
    }
}
