//! Valuation configuration.

use crate::{ClassificationVariant, EntryExitStyle};
use serde::{Deserialize, Serialize};

/// Configuration for the EV/EBITDA valuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// One-year EBITDA growth assumption (default: 0.10)
    pub growth_rate: f64,

    /// Band policy (default: variant A, with an `Over Valued` band)
    pub variant: ClassificationVariant,

    /// Entry/exit representation (default: price levels)
    pub entry_exit: EntryExitStyle,

    /// Years of price history used for the high/low range (default: 3)
    pub history_years: u32,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.10,
            variant: ClassificationVariant::A,
            entry_exit: EntryExitStyle::Price,
            history_years: 3,
        }
    }
}
