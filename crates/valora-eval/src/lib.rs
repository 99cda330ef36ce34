//! Historical backtesting for Valora fair value estimates.
//!
//! This crate reconstructs what the fair value estimate would have been in
//! each past calendar year by discounting today's estimate backward at a
//! fixed annual growth rate, and checks each reconstruction against that
//! year's observed trading range.
//!
//! # Example
//!
//! ```rust,ignore
//! use valora_eval::{Backtest, BacktestConfig};
//!
//! let backtest = Backtest::new(BacktestConfig::default());
//! let (start, end) = backtest.window(today)?;
//! let history = source.price_history("AAPL", start, end).await?;
//! let rows = backtest.run(&history, current_fair_value, today)?;
//! ```

pub mod backtest;

// Re-export main types
pub use backtest::{
    Backtest, BacktestConfig, BacktestRow, BacktestSummary, MAX_LOOKBACK_YEARS, backtest_fair_value,
};
