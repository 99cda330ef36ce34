//! Last-report cache.

use crate::{AnalyzerConfig, ValuationReport};
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::debug;
use valora_traits::Date;

/// Key identifying a batch: the ordered symbol list, the valuation date and
/// every setting that affects the outcome.
pub type CacheKey = u64;

/// Hash a batch input.
///
/// Floating-point settings are hashed by bit pattern, so `0.1` and
/// `0.1000000001` give different keys.
#[must_use]
pub fn cache_key(symbols: &[String], config: &AnalyzerConfig, as_of: Date) -> CacheKey {
    let mut hasher = DefaultHasher::new();
    symbols.hash(&mut hasher);
    as_of.hash(&mut hasher);

    let valuation = &config.valuation;
    valuation.growth_rate.to_bits().hash(&mut hasher);
    (valuation.variant as u8).hash(&mut hasher);
    (valuation.entry_exit as u8).hash(&mut hasher);
    valuation.history_years.hash(&mut hasher);

    let backtest = &config.backtest;
    backtest.lookback_years.hash(&mut hasher);
    backtest.reverse_growth_rate.to_bits().hash(&mut hasher);

    hasher.finish()
}

/// Holds the most recent report.
///
/// Only one report is kept. Inserting under a new key replaces it.
#[derive(Debug, Default)]
pub struct ReportCache {
    entry: Option<(CacheKey, ValuationReport)>,
}

impl ReportCache {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// The cached report, if it was stored under `key`.
    #[must_use]
    pub fn get(&self, key: CacheKey) -> Option<&ValuationReport> {
        match &self.entry {
            Some((k, report)) if *k == key => Some(report),
            _ => None,
        }
    }

    /// Store `report` under `key`.
    pub fn insert(&mut self, key: CacheKey, report: ValuationReport) {
        debug!(key, tickers = report.len(), "caching report");
        self.entry = Some((key, report));
    }

    /// Drop the cached report.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a report is cached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
