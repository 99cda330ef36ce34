#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the Valora fair value estimator.
//!
//! This crate provides the shared vocabulary of the workspace: the fundamentals
//! snapshot and price history consumed by the valuation models, the error
//! taxonomy every per-ticker contract returns, the rounding and percentage
//! helpers used for presentation, and the [`MarketDataSource`] seam behind
//! which concrete data providers live.

/// The version of the valora-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod source;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, ValoraError};
pub use source::MarketDataSource;
pub use types::{
    CompanyInfo, Date, EvEbitdaInputs, FundamentalsSnapshot, PriceBar, PriceHistory, Symbol,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
