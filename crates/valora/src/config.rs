//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use valora_eval::BacktestConfig;
use valora_traits::{Result, ValoraError};
use valora_value::ValuationConfig;

/// Environment variable overriding the per-call timeout, in seconds.
pub const TIMEOUT_ENV: &str = "VALORA_TIMEOUT_SECS";

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Fair value and classification settings.
    pub valuation: ValuationConfig,
    /// Historical backtest settings.
    pub backtest: BacktestConfig,
    /// Seconds before a data-source call counts as unavailable.
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            valuation: ValuationConfig::default(),
            backtest: BacktestConfig::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults with the timeout taken from `VALORA_TIMEOUT_SECS` if set.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidData`] if the variable is set but is not
    /// a positive integer.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            config.request_timeout_secs = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// The per-call timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ValoraError::InvalidData(format!(
            "{TIMEOUT_ENV} must be a positive integer, got '{raw}'"
        ))),
    }
}
