//! Valuation bands and the two band policies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Undervaluation above which a security is a deep discount.
pub const DEEP_DISCOUNT_PCT: f64 = 30.0;
/// Undervaluation above which a security is high value.
pub const HIGH_VALUE_PCT: f64 = 20.0;
/// Undervaluation above which a security is undervalued.
pub const UNDERVALUED_PCT: f64 = 18.0;
/// Undervaluation below which variant A calls a security over valued.
pub const OVER_VALUED_PCT: f64 = 5.0;

/// Discrete valuation category, ordered from most to least attractive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValuationBand {
    /// More than 30% undervalued.
    #[serde(rename = "Deep Discount")]
    DeepDiscount,
    /// More than 20% undervalued.
    #[serde(rename = "High Value")]
    HighValue,
    /// More than 18% undervalued.
    #[serde(rename = "Undervalued")]
    Undervalued,
    /// Fair value near the current price.
    #[serde(rename = "Fair/Premium")]
    FairOrPremium,
    /// Negative fair value or less than 5% undervalued (variant A only).
    #[serde(rename = "Over Valued")]
    OverValued,
}

impl ValuationBand {
    /// Every band, most attractive first.
    pub const ALL: [Self; 5] = [
        Self::DeepDiscount,
        Self::HighValue,
        Self::Undervalued,
        Self::FairOrPremium,
        Self::OverValued,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DeepDiscount => "Deep Discount",
            Self::HighValue => "High Value",
            Self::Undervalued => "Undervalued",
            Self::FairOrPremium => "Fair/Premium",
            Self::OverValued => "Over Valued",
        }
    }

    /// Human-readable meaning of the band.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::DeepDiscount => ">30% undervalued",
            Self::HighValue => "20-30% undervalued",
            Self::Undervalued => "18-20% undervalued",
            Self::FairOrPremium => "Fair value near current price (5-18%)",
            Self::OverValued => "Fair value < 0 or undervalued < 5%",
        }
    }
}

impl fmt::Display for ValuationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which band policy to apply.
///
/// Both policies evaluate thresholds in the same priority order and differ
/// only in whether an `Over Valued` band exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationVariant {
    /// `Over Valued` when fair price is negative or undervaluation is below 5%.
    #[default]
    A,
    /// No `Over Valued` band; low or negative undervaluation is `Fair/Premium`.
    B,
}

impl ClassificationVariant {
    /// Assign a band. First match wins:
    ///
    /// | variant | condition                       | band          |
    /// |---------|---------------------------------|---------------|
    /// | A       | `fair < 0` or `underval < 5`    | Over Valued   |
    /// | A, B    | `underval > 30`                 | Deep Discount |
    /// | A, B    | `underval > 20`                 | High Value    |
    /// | A, B    | `underval > 18`                 | Undervalued   |
    /// | A, B    | otherwise                       | Fair/Premium  |
    #[must_use]
    pub fn band(&self, undervalued_pct: f64, fair_price: f64) -> ValuationBand {
        if *self == Self::A && (fair_price < 0.0 || undervalued_pct < OVER_VALUED_PCT) {
            ValuationBand::OverValued
        } else if undervalued_pct > DEEP_DISCOUNT_PCT {
            ValuationBand::DeepDiscount
        } else if undervalued_pct > HIGH_VALUE_PCT {
            ValuationBand::HighValue
        } else if undervalued_pct > UNDERVALUED_PCT {
            ValuationBand::Undervalued
        } else {
            ValuationBand::FairOrPremium
        }
    }
}

impl std::str::FromStr for ClassificationVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            other => Err(format!("unknown classification variant '{other}' (expected a or b)")),
        }
    }
}
