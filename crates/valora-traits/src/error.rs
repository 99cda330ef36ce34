//! Error types for the Valora workspace.
//!
//! Every per-ticker contract returns a [`Result`] carrying one of these
//! variants. The batch pipeline recovers all of them at the ticker boundary,
//! so none of them ever aborts a batch; they exist so the caller can tell a
//! missing field from a data-source failure when logging skipped tickers.

use thiserror::Error;

/// The main error type for Valora operations.
#[derive(Debug, Error)]
pub enum ValoraError {
    /// A required fundamental field was absent from the snapshot.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Division by zero or a non-finite intermediate result.
    #[error("Arithmetic fault: {0}")]
    Arithmetic(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from tabular input.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error fetching data from external sources.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// A data-source call did not complete within the configured timeout.
    #[error("Timed out fetching data for {0}")]
    Timeout(String),

    /// Error when a symbol is unknown to the data source.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error while reading input or writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValoraError {
    /// Whether this error originated at the data source rather than in the
    /// valuation arithmetic.
    #[must_use]
    pub const fn is_data_source(&self) -> bool {
        matches!(
            self,
            Self::DataFetch(_) | Self::Timeout(_) | Self::SymbolNotFound(_)
        )
    }
}

/// A specialized Result type for Valora operations.
pub type Result<T> = std::result::Result<T, ValoraError>;
