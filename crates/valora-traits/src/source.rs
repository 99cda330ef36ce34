//! The market-data seam.
//!
//! Valuation models never talk to a provider directly. The batch pipeline
//! asks a [`MarketDataSource`] for a fundamentals snapshot and a price
//! history, and treats any error it returns as "data unavailable" for that
//! ticker.

use crate::{Date, FundamentalsSnapshot, PriceHistory, Result};
use async_trait::async_trait;

/// A provider of company fundamentals and daily price history.
///
/// Implementations should report missing individual fields as `None` in the
/// snapshot rather than failing the whole call; an `Err` means the provider
/// could not answer for this symbol at all.
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use valora_traits::{Date, FundamentalsSnapshot, MarketDataSource, PriceHistory, Result};
///
/// struct Offline;
///
/// #[async_trait]
/// impl MarketDataSource for Offline {
///     fn name(&self) -> &str {
///         "offline"
///     }
///
///     async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot> {
///         Ok(FundamentalsSnapshot::new(symbol))
///     }
///
///     async fn price_history(&self, _symbol: &str, _start: Date, _end: Date) -> Result<PriceHistory> {
///         Ok(PriceHistory::default())
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short provider name used in log output.
    fn name(&self) -> &str;

    /// Current fundamentals for `symbol`.
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot>;

    /// Daily bars for `symbol` with `start <= date <= end`.
    async fn price_history(&self, symbol: &str, start: Date, end: Date) -> Result<PriceHistory>;
}
