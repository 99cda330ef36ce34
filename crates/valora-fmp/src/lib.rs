//! Financial Modeling Prep (FMP) API client for Valora.
//!
//! This crate fetches the fundamentals and daily prices the fair value
//! estimator needs from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API, and
//! exposes them through [`valora_traits::MarketDataSource`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use valora_fmp::FmpClient;
//! use valora_traits::MarketDataSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     // Enterprise value, EBITDA, share count and price in one snapshot
//!     let snapshot = client.fundamentals("AAPL").await?;
//!
//!     // Raw endpoint access
//!     let quote = client.quote("AAPL").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod types;

pub use client::{DEFAULT_TIMEOUT, FmpClient};
pub use error::FmpError;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
