//! Fundamentals valuation for Valora.
//!
//! This crate turns a ticker's current fundamentals into a fair price and a
//! banded recommendation:
//! - [`compute_fair_value`]: one year of projected EBITDA growth priced at the
//!   current EV/EBITDA multiple, per share
//! - [`classify`]: undervaluation percentage, valuation band, market, cap
//!   size, 3-year range, entry/exit levels and a buy/hold signal
//!
//! Two policy knobs select between the output shapes seen in practice:
//! [`ClassificationVariant`] (with or without an `Over Valued` band) and
//! [`EntryExitStyle`] (price levels or proximity flags).
//!
//! # Example
//!
//! ```ignore
//! use valora_value::{EvEbitdaValuator, ValuationConfig};
//!
//! let valuator = EvEbitdaValuator::new(ValuationConfig::default());
//! let fair = valuator.fair_value(&snapshot.validate()?)?;
//! let result = valuator.classify(&snapshot.symbol, fair, price, &snapshot.company(), &history)?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod band;
pub mod classify;
pub mod config;
pub mod fair_value;
pub mod market;

// Re-export key types
pub use band::{ClassificationVariant, ValuationBand};
pub use classify::{EntryExit, EntryExitStyle, TradeSignal, ValuationResult, classify};
pub use config::ValuationConfig;
pub use fair_value::{EvEbitdaValuator, compute_fair_value};
pub use market::{CapSize, Market};
