//! EV/EBITDA fair value model.

use crate::{ValuationConfig, ValuationResult, classify::classify};
use valora_traits::{CompanyInfo, EvEbitdaInputs, PriceHistory, Result, ValoraError};

/// Project a fair price per share from EV/EBITDA.
///
/// The current EV/EBITDA multiple is applied to one year of projected EBITDA
/// growth, and the projected enterprise value is spread over the share count:
///
/// ```text
/// multiple         = ev / ebitda
/// projected_ebitda = ebitda * (1 + growth_rate)
/// fair_price       = projected_ebitda * multiple / shares
/// ```
///
/// which reduces to `ev * (1 + growth_rate) / shares`.
///
/// # Errors
///
/// - [`ValoraError::MissingField`] if enterprise value is zero, which
///   providers report for unknown values
/// - [`ValoraError::Arithmetic`] if EBITDA or shares outstanding is zero, or
///   any intermediate is not finite
///
/// # Examples
///
/// ```
/// use valora_traits::EvEbitdaInputs;
/// use valora_value::compute_fair_value;
///
/// let inputs = EvEbitdaInputs { enterprise_value: 1_000.0, ebitda: 100.0, shares_outstanding: 10.0 };
/// let fair = compute_fair_value(&inputs, 0.10).unwrap();
/// assert!((fair - 110.0).abs() < 1e-9);
/// ```
pub fn compute_fair_value(inputs: &EvEbitdaInputs, growth_rate: f64) -> Result<f64> {
    let EvEbitdaInputs {
        enterprise_value,
        ebitda,
        shares_outstanding,
    } = *inputs;

    if enterprise_value == 0.0 {
        return Err(ValoraError::MissingField("enterpriseValue".to_string()));
    }
    if ebitda == 0.0 {
        return Err(ValoraError::Arithmetic("EBITDA is zero".to_string()));
    }
    if shares_outstanding == 0.0 {
        return Err(ValoraError::Arithmetic(
            "shares outstanding is zero".to_string(),
        ));
    }

    let ev_ebitda = enterprise_value / ebitda;
    let projected_ebitda = ebitda * (1.0 + growth_rate);
    let projected_ev = projected_ebitda * ev_ebitda;
    let fair_price = projected_ev / shares_outstanding;

    if !fair_price.is_finite() {
        return Err(ValoraError::Arithmetic(format!(
            "fair price is not finite (ev={enterprise_value}, ebitda={ebitda}, shares={shares_outstanding})"
        )));
    }
    Ok(fair_price)
}

/// EV/EBITDA valuator bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct EvEbitdaValuator {
    config: ValuationConfig,
}

impl EvEbitdaValuator {
    /// Create a new valuator with the given configuration.
    #[must_use]
    pub const fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Get the growth assumption.
    #[must_use]
    pub const fn growth_rate(&self) -> f64 {
        self.config.growth_rate
    }

    /// Fair price at the configured growth rate.
    ///
    /// # Errors
    ///
    /// See [`compute_fair_value`].
    pub fn fair_value(&self, inputs: &EvEbitdaInputs) -> Result<f64> {
        compute_fair_value(inputs, self.config.growth_rate)
    }

    /// Classify a fair price against the current price.
    ///
    /// # Errors
    ///
    /// See [`classify`].
    pub fn classify(
        &self,
        symbol: &str,
        fair_price: f64,
        current_price: f64,
        company: &CompanyInfo,
        history: &PriceHistory,
    ) -> Result<ValuationResult> {
        classify(
            symbol,
            fair_price,
            current_price,
            company,
            history,
            &self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn inputs(ev: f64, ebitda: f64, shares: f64) -> EvEbitdaInputs {
        EvEbitdaInputs {
            enterprise_value: ev,
            ebitda,
            shares_outstanding: shares,
        }
    }

    #[test]
    fn test_ratio_path_matches_closed_form() {
        let cases = [
            (2.5e12, 1.3e11, 1.55e10, 0.10),
            (6.1e12, 3.9e11, 4.15e9, 0.10),
            (8.0e9, -2.0e8, 3.0e8, 0.05),
            (1.0e6, 3.3e4, 7.0e3, 0.25),
            (-5.0e8, 1.0e8, 1.0e7, 0.10),
        ];
        for (ev, ebitda, shares, g) in cases {
            let fair = compute_fair_value(&inputs(ev, ebitda, shares), g).unwrap();
            let closed = ev * (1.0 + g) / shares;
            assert_relative_eq!(fair, closed, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_simple_fair_value() {
        let fair = compute_fair_value(&inputs(1_000.0, 100.0, 10.0), 0.10).unwrap();
        assert_abs_diff_eq!(fair, 110.0, epsilon = 1e-9);
    }

    #[test]
    fn test_every_missing_combination_is_missing_field() {
        use valora_traits::FundamentalsSnapshot;

        for mask in 0u8..7 {
            let snap = FundamentalsSnapshot {
                symbol: "AAPL".to_string(),
                enterprise_value: (mask & 1 != 0).then_some(1_000.0),
                ebitda: (mask & 2 != 0).then_some(100.0),
                shares_outstanding: (mask & 4 != 0).then_some(10.0),
                current_price: Some(100.0),
                ..FundamentalsSnapshot::default()
            };
            let result = snap
                .validate()
                .and_then(|i| compute_fair_value(&i, 0.10));
            assert!(
                matches!(result, Err(ValoraError::MissingField(_))),
                "mask {mask:03b} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_zero_ebitda_is_arithmetic_fault() {
        let result = compute_fair_value(&inputs(1_000.0, 0.0, 10.0), 0.10);
        assert!(matches!(result, Err(ValoraError::Arithmetic(_))));
    }

    #[test]
    fn test_zero_shares_is_arithmetic_fault() {
        let result = compute_fair_value(&inputs(1_000.0, 100.0, 0.0), 0.10);
        assert!(matches!(result, Err(ValoraError::Arithmetic(_))));
    }

    #[test]
    fn test_zero_enterprise_value_is_missing() {
        let result = compute_fair_value(&inputs(0.0, 100.0, 10.0), 0.10);
        assert!(matches!(result, Err(ValoraError::MissingField(_))));
    }

    #[test]
    fn test_overflow_is_arithmetic_fault() {
        let result = compute_fair_value(&inputs(f64::MAX, 1e-300, 1e-300), 0.10);
        assert!(matches!(result, Err(ValoraError::Arithmetic(_))));
    }

    #[test]
    fn test_idempotent() {
        let i = inputs(2.5e12, 1.3e11, 1.55e10);
        let a = compute_fair_value(&i, 0.10).unwrap();
        let b = compute_fair_value(&i, 0.10).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_valuator_uses_config_growth() {
        let valuator = EvEbitdaValuator::new(ValuationConfig {
            growth_rate: 0.20,
            ..ValuationConfig::default()
        });
        assert_relative_eq!(valuator.growth_rate(), 0.20);
        let fair = valuator.fair_value(&inputs(1_000.0, 100.0, 10.0)).unwrap();
        assert_abs_diff_eq!(fair, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_valuator() {
        let valuator = EvEbitdaValuator::default();
        assert_relative_eq!(valuator.growth_rate(), 0.10);
    }
}
