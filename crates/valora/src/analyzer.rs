//! Batch valuation pipeline.
//!
//! Tickers are processed strictly one after another. Every call to the data
//! source runs under the configured timeout, and any failure for a ticker
//! (missing field, arithmetic fault, provider error or timeout) drops that
//! ticker from the report without affecting the rest of the batch.

use crate::{AnalyzerConfig, ReportCache, SkippedTicker, ValuationReport, cache::cache_key};
use std::future::Future;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use valora_eval::{Backtest, BacktestRow};
use valora_traits::{
    Date, MarketDataSource, PriceHistory, Result, Symbol, ValoraError, types::years_before,
};
use valora_value::{EvEbitdaValuator, ValuationResult};

/// Runs valuations and backtests against a [`MarketDataSource`].
#[derive(Debug)]
pub struct Analyzer<S> {
    source: S,
    config: AnalyzerConfig,
    valuator: EvEbitdaValuator,
    backtest: Backtest,
    cache: ReportCache,
}

impl<S: MarketDataSource> Analyzer<S> {
    /// Create an analyzer over `source`.
    pub fn new(source: S, config: AnalyzerConfig) -> Self {
        Self {
            source,
            valuator: EvEbitdaValuator::new(config.valuation),
            backtest: Backtest::new(config.backtest),
            config,
            cache: ReportCache::new(),
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The underlying data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Await a data-source call, turning an elapsed timeout into
    /// [`ValoraError::Timeout`].
    async fn fetch<T>(&self, symbol: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        timeout(self.config.request_timeout(), call)
            .await
            .map_err(|_| ValoraError::Timeout(symbol.to_string()))?
    }

    async fn history(&self, symbol: &str, start: Date, end: Date) -> Result<PriceHistory> {
        self.fetch(symbol, self.source.price_history(symbol, start, end))
            .await
    }

    /// Fetch fundamentals and compute today's fair price for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns the data-source error, or the valuator's error if a required
    /// field is missing or the arithmetic is degenerate.
    pub async fn fair_value(&self, symbol: &str) -> Result<f64> {
        let snapshot = self
            .fetch(symbol, self.source.fundamentals(symbol))
            .await?;
        self.valuator.fair_value(&snapshot.validate()?)
    }

    /// Value and classify a single ticker.
    ///
    /// # Errors
    ///
    /// Any error from the data source or the valuator. An empty price history
    /// is not an error; it leaves the high/low and entry/exit fields empty.
    pub async fn analyze_symbol(&self, symbol: &str, as_of: Date) -> Result<ValuationResult> {
        let snapshot = self
            .fetch(symbol, self.source.fundamentals(symbol))
            .await?;
        let inputs = snapshot.validate()?;
        let fair_price = self.valuator.fair_value(&inputs)?;
        let current_price = snapshot.require_price()?;

        let start = years_before(as_of, self.config.valuation.history_years)?;
        let history = self.history(symbol, start, as_of).await?;

        let result = self.valuator.classify(
            symbol,
            fair_price,
            current_price,
            &snapshot.company(),
            &history,
        )?;
        debug!(
            symbol,
            fair = result.fair_value,
            current = result.current_price,
            band = %result.band,
            "valued"
        );
        Ok(result)
    }

    /// Value every ticker in order.
    ///
    /// Failed tickers are logged and listed in [`ValuationReport::skipped`];
    /// the batch itself never fails.
    pub async fn analyze(&self, symbols: &[Symbol], as_of: Date) -> ValuationReport {
        let mut report = ValuationReport::new(as_of);

        for symbol in symbols {
            debug!(symbol = %symbol, "processing");
            match self.analyze_symbol(symbol, as_of).await {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "skipping ticker");
                    report.skipped.push(SkippedTicker {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            source = self.source.name(),
            valued = report.results.len(),
            skipped = report.skipped.len(),
            "batch complete"
        );
        report
    }

    /// Like [`Analyzer::analyze`], but reuses the last report when the
    /// symbols, configuration and `as_of` date are unchanged.
    pub async fn analyze_cached(&mut self, symbols: &[Symbol], as_of: Date) -> ValuationReport {
        let key = cache_key(symbols, &self.config, as_of);
        if let Some(report) = self.cache.get(key) {
            debug!(key, "report cache hit");
            return report.clone();
        }

        let report = self.analyze(symbols, as_of).await;
        self.cache.insert(key, report.clone());
        report
    }

    /// Drop any cached report.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    /// Backtest `symbol`, computing today's fair value from fundamentals
    /// unless one is supplied.
    ///
    /// # Errors
    ///
    /// Any error from the data source, the valuator or the backtester.
    pub async fn try_backtest_symbol(
        &self,
        symbol: &str,
        fair_value: Option<f64>,
        as_of: Date,
    ) -> Result<Vec<BacktestRow>> {
        let fair_value = match fair_value {
            Some(fv) => fv,
            None => self.fair_value(symbol).await?,
        };
        let (start, end) = self.backtest.window(as_of)?;
        let history = self.history(symbol, start, end).await?;
        self.backtest.run(&history, fair_value, as_of)
    }

    /// Backtest `symbol`. Any failure yields no rows.
    pub async fn backtest_symbol(
        &self,
        symbol: &str,
        fair_value: Option<f64>,
        as_of: Date,
    ) -> Vec<BacktestRow> {
        match self.try_backtest_symbol(symbol, fair_value, as_of).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(symbol, error = %e, "backtest failed");
                Vec::new()
            }
        }
    }
}
