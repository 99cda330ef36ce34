//! Error types for FMP API client.

use thiserror::Error;
use valora_traits::ValoraError;

/// Errors that can occur when using the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// A response field could not be interpreted.
    #[error("Malformed field in response: {0}")]
    Malformed(String),
}

impl From<FmpError> for ValoraError {
    fn from(err: FmpError) -> Self {
        match err {
            FmpError::SymbolNotFound(s) | FmpError::NoData(s) => Self::SymbolNotFound(s),
            FmpError::Malformed(m) => Self::InvalidData(m),
            FmpError::Request(e) if e.is_timeout() => Self::Timeout("FMP request".to_string()),
            other => Self::DataFetch(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_valora_error() {
        let err: ValoraError = FmpError::SymbolNotFound("ZZZZ".to_string()).into();
        assert!(matches!(err, ValoraError::SymbolNotFound(s) if s == "ZZZZ"));

        let err: ValoraError = FmpError::RateLimitExceeded.into();
        assert!(matches!(err, ValoraError::DataFetch(_)));
        assert!(err.is_data_source());

        let err: ValoraError = FmpError::Malformed("date".to_string()).into();
        assert!(matches!(err, ValoraError::InvalidData(_)));
    }
}
