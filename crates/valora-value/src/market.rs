//! Market and company-size bucketing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol suffix that marks a National Stock Exchange of India listing.
pub const INDIA_SUFFIX: &str = ".NS";

/// Listing market inferred from the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Symbols carrying the `.NS` suffix.
    India,
    /// Everything else.
    #[serde(rename = "USA")]
    Usa,
}

impl Market {
    /// Infer the market from a ticker symbol. The suffix match is
    /// case-sensitive, so `reliance.ns` is not an Indian listing.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.ends_with(INDIA_SUFFIX) {
            Self::India
        } else {
            Self::Usa
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Usa => "USA",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Market-capitalization size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapSize {
    /// At least 200 billion.
    Mega,
    /// At least 10 billion.
    Large,
    /// At least 2 billion.
    Mid,
    /// Below 2 billion, or unknown.
    Small,
}

impl CapSize {
    /// Lower bound of the mega-cap bucket.
    pub const MEGA: f64 = 200_000_000_000.0;
    /// Lower bound of the large-cap bucket.
    pub const LARGE: f64 = 10_000_000_000.0;
    /// Lower bound of the mid-cap bucket.
    pub const MID: f64 = 2_000_000_000.0;

    /// Bucket a market capitalization. Lower bounds are inclusive.
    #[must_use]
    pub fn from_market_cap(market_cap: f64) -> Self {
        if market_cap >= Self::MEGA {
            Self::Mega
        } else if market_cap >= Self::LARGE {
            Self::Large
        } else if market_cap >= Self::MID {
            Self::Mid
        } else {
            Self::Small
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mega => "Mega",
            Self::Large => "Large",
            Self::Mid => "Mid",
            Self::Small => "Small",
        }
    }
}

impl fmt::Display for CapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
