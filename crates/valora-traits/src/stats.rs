//! Numeric helpers shared by the valuation and backtest models.
//!
//! Classification always runs on unrounded values; [`round2`] is applied
//! only when a result record is assembled for presentation.

/// Round to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use valora_traits::stats::round2;
///
/// assert_eq!(round2(90.909_090_9), 90.91);
/// assert_eq!(round2(-1.005_1), -1.01);
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage by which `value` exceeds `base`: `(value - base) / base * 100`.
///
/// Returns `None` when `base` is zero or either operand is not finite.
///
/// # Examples
///
/// ```
/// use valora_traits::stats::percent_gap;
///
/// assert_eq!(percent_gap(135.0, 100.0), Some(35.0));
/// assert_eq!(percent_gap(1.0, 0.0), None);
/// ```
#[must_use]
pub fn percent_gap(value: f64, base: f64) -> Option<f64> {
    if base == 0.0 || !base.is_finite() || !value.is_finite() {
        return None;
    }
    Some((value - base) / base * 100.0)
}

/// Arithmetic mean, `None` for an empty input.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(94.5), 94.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_percent_gap_exact_values() {
        assert_eq!(percent_gap(120.0, 100.0), Some(20.0));
        assert_eq!(percent_gap(118.0, 100.0), Some(18.0));
        assert_eq!(percent_gap(105.0, 100.0), Some(5.0));
        assert_eq!(percent_gap(130.0, 100.0), Some(30.0));
    }

    #[test]
    fn test_percent_gap_negative() {
        assert_relative_eq!(percent_gap(80.0, 100.0).unwrap(), -20.0);
    }

    #[test]
    fn test_percent_gap_invalid_base() {
        assert_eq!(percent_gap(10.0, 0.0), None);
        assert_eq!(percent_gap(10.0, f64::NAN), None);
        assert_eq!(percent_gap(f64::INFINITY, 1.0), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
    }
}
