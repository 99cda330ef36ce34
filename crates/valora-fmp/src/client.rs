//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    types::{
        CompanyProfile, EnterpriseValue, FundamentalData, HistoricalPrice, IncomeStatement,
        Quote, to_history,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use std::{env, time::Duration};
use tracing::{debug, warn};
use valora_traits::{Date, FundamentalsSnapshot, MarketDataSource, PriceHistory};

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key and the default timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new FMP client whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Like [`FmpClient::from_env`] with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env_with_timeout(timeout: Duration) -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::with_timeout(api_key, timeout))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        debug!(endpoint, "FMP request");
        // The URL carries the API key; keep it out of error messages.
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await.map_err(reqwest::Error::without_url)?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        serde_json::from_str(&text).map_err(|e| {
            FmpError::Json(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to parse: {e}. Response: {text}"),
            )))
        })
    }

    /// Fetch a list endpoint and keep its first record.
    async fn first<T: serde::de::DeserializeOwned>(&self, endpoint: &str, symbol: &str) -> Result<T> {
        let records: Vec<T> = self.get(endpoint).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_string()))
    }

    /// Get annual income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        let endpoint = format!(
            "income-statement?symbol={}&period=annual{}",
            symbol.to_uppercase(),
            limit_param
        );
        self.get(&endpoint).await
    }

    /// Get the most recent enterprise value record for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns no records.
    pub async fn enterprise_values(&self, symbol: &str) -> Result<EnterpriseValue> {
        let endpoint = format!("enterprise-values?symbol={}&limit=1", symbol.to_uppercase());
        self.first(&endpoint, symbol).await
    }

    /// Get the company profile for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        self.first(&endpoint, symbol).await
    }

    /// Get real-time quote for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let endpoint = format!("quote?symbol={}", symbol.to_uppercase());
        self.first(&endpoint, symbol).await
    }

    /// Get historical daily prices for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `from` - Start date (YYYY-MM-DD)
    /// * `to` - End date (YYYY-MM-DD)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut params = String::new();
        if let Some(f) = from {
            params.push_str(&format!("&from={f}"));
        }
        if let Some(t) = to {
            params.push_str(&format!("&to={t}"));
        }

        let endpoint = format!(
            "historical-price-eod/full?symbol={}{}",
            symbol.to_uppercase(),
            params
        );
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }

    /// Gather the endpoints that make up a fundamentals snapshot.
    ///
    /// Quote, profile, enterprise value and income statement are fetched in
    /// parallel. A failing endpoint leaves its part empty; only when every
    /// endpoint fails is the symbol reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::NoData`] if no endpoint returned data.
    pub async fn fundamental_data(&self, symbol: &str) -> Result<FundamentalData> {
        let (quote, profile, ev, income) = tokio::join!(
            self.quote(symbol),
            self.profile(symbol),
            self.enterprise_values(symbol),
            self.income_statement(symbol, Some(1)),
        );

        let data = FundamentalData {
            symbol: symbol.to_uppercase(),
            quote: keep(symbol, "quote", quote),
            profile: keep(symbol, "profile", profile),
            enterprise_value: keep(symbol, "enterprise-values", ev),
            income: keep(symbol, "income-statement", income).and_then(|v| v.into_iter().next()),
        };

        if data.is_empty() {
            return Err(FmpError::NoData(symbol.to_string()));
        }
        Ok(data)
    }
}

fn keep<T>(symbol: &str, endpoint: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(symbol, endpoint, error = %e, "FMP endpoint failed");
            None
        }
    }
}

#[async_trait]
impl MarketDataSource for FmpClient {
    fn name(&self) -> &str {
        "fmp"
    }

    async fn fundamentals(&self, symbol: &str) -> valora_traits::Result<FundamentalsSnapshot> {
        let data = self.fundamental_data(symbol).await?;
        Ok(data.to_snapshot())
    }

    async fn price_history(
        &self,
        symbol: &str,
        start: Date,
        end: Date,
    ) -> valora_traits::Result<PriceHistory> {
        let from = start.format("%Y-%m-%d").to_string();
        let to = end.format("%Y-%m-%d").to_string();
        let prices = self
            .historical_prices(symbol, Some(&from), Some(&to))
            .await?;
        Ok(to_history(&prices)?)
    }
}
