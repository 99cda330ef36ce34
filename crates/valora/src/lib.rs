#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # valora
//!
//! EV/EBITDA fair value estimation for equities.
//!
//! valora is an umbrella crate that re-exports the valora sub-crates and adds
//! the batch pipeline on top of them: it walks a list of tickers, values each
//! one against its current price, and collects the results into a report that
//! can be exported as CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use valora::{Analyzer, AnalyzerConfig, fmp::FmpClient};
//!
//! # async fn example() -> valora::Result<()> {
//! let config = AnalyzerConfig::from_env()?;
//! let client = FmpClient::from_env_with_timeout(config.request_timeout())?;
//! let analyzer = Analyzer::new(client, config);
//!
//! let today = chrono::Local::now().date_naive();
//! let symbols = vec!["AAPL".to_string(), "INFY.NS".to_string()];
//! let report = analyzer.analyze(&symbols, today).await;
//!
//! for result in report.sorted_by_undervaluation() {
//!     println!("{} {} {:.2}%", result.symbol, result.band, result.undervalued_pct);
//! }
//! report.save_csv("valuation.csv")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Error type, input types and the [`MarketDataSource`] seam
//! - [`value`] - Fair value model and valuation bands
//! - [`eval`] - Reverse-CAGR backtesting
//! - [`fmp`] - Financial Modeling Prep data source
//!
//! ## Architecture
//!
//! 1. A **data source** returns a fundamentals snapshot and daily prices
//! 2. The **valuator** projects a fair price and classifies it
//! 3. The **backtester** discounts the fair price back through past years
//! 4. The **analyzer** runs the above per ticker and builds a report

/// Version information for the valora crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod analyzer;
pub mod cache;
pub mod config;
pub mod report;

pub use analyzer::Analyzer;
pub use cache::{CacheKey, ReportCache, cache_key};
pub use config::AnalyzerConfig;
pub use report::{SkippedTicker, ValuationReport};

// ============================================================================
// Core Types
// ============================================================================

/// Core types and the data-source trait.
///
/// - [`MarketDataSource`] - Provider of fundamentals and price history
/// - [`FundamentalsSnapshot`] - Raw fundamentals with optional fields
/// - [`PriceHistory`] - Date-ordered daily bars
pub mod traits {
    pub use valora_traits::*;
}

pub use valora_traits::{
    Date, FundamentalsSnapshot, MarketDataSource, PriceHistory, Result, Symbol, ValoraError,
};

// ============================================================================
// Valuation
// ============================================================================

/// Fair value model and classification.
///
/// The fair price keeps today's EV/EBITDA multiple and applies it to EBITDA
/// grown by one year:
///
/// ```text
/// fair = (ebitda * (1 + g)) * (ev / ebitda) / shares
/// ```
///
/// The gap to the current price is then bucketed into a [`ValuationBand`]
/// under one of two policies, see [`ClassificationVariant`].
///
/// # Example
///
/// ```
/// use valora::value::{ClassificationVariant, ValuationBand};
///
/// assert_eq!(ClassificationVariant::B.band(20.0, 120.0), ValuationBand::Undervalued);
/// assert_eq!(ClassificationVariant::A.band(3.0, 103.0), ValuationBand::OverValued);
/// ```
pub mod value {
    pub use valora_value::*;
}

pub use valora_value::{
    ClassificationVariant, EntryExitStyle, EvEbitdaValuator, ValuationBand, ValuationConfig,
    ValuationResult,
};

// ============================================================================
// Backtesting
// ============================================================================

/// Reverse-CAGR backtesting.
///
/// Each past year's fair value is reconstructed as
///
/// ```text
/// simulated = fair_today / (1 + r)^(current_year - year)
/// ```
///
/// and counted as converged when it lies within that year's low and high.
pub mod eval {
    pub use valora_eval::*;
}

pub use valora_eval::{BacktestConfig, BacktestRow};

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) API client.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
pub mod fmp {
    pub use valora_fmp::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use valora::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Analyzer, AnalyzerConfig, BacktestConfig, ClassificationVariant, EntryExitStyle,
        MarketDataSource, Result, ValoraError, ValuationBand, ValuationConfig, ValuationReport,
    };
}

// ============================================================================
// Tests
// ============================================================================
