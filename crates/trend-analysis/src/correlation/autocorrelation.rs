//! Autocorrelation profile.
//!
//! Position `lag` holds the Pearson correlation between the series and a copy
//! of itself shifted by `lag` positions. Position 0 is left missing, so the
//! profile starts at lag 1 and keeps the input's length.

use trend_core::{
    error::Result, num::Real, series::Series, stats::lag_correlation, table::columns,
    traits::Derivation,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the autocorrelation profile. It takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutocorrelationConfig;

/// Lag autocorrelation for every lag `1..len`.
///
/// Each lag compares `x[lag..]` with `x[..len - lag]` using only the pairs
/// where both values are present. A lag with fewer than two usable pairs, or
/// where either side is constant, is missing rather than an error. The last
/// lag overlaps in a single pair and is therefore always missing.
///
/// Values are clamped to `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct Autocorrelation;

impl Autocorrelation {
    /// Compute the profile. Never fails.
    #[must_use]
    pub fn compute<T: Real>(&self, data: &[T]) -> Series<T> {
        let len = data.len();
        if len < 2 {
            return Series::missing(len);
        }

        (0..len).map(|lag| lag_correlation(data, lag)).collect()
    }
}

impl<T: Real> Derivation<T> for Autocorrelation {
    type Config = AutocorrelationConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn column_name(&self) -> &'static str {
        columns::AUTOCORRELATION
    }

    fn derive(&self, data: &[T]) -> Result<Series<T>> {
        Ok(self.compute(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_autocorrelation_linear_series() {
        let result = Autocorrelation::default().compute(&[1.0f64, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        for lag in 1..4 {
            assert_relative_eq!(result[lag], 1.0, epsilon = 1e-12);
        }
        assert!(result[4].is_nan());
    }

    #[test]
    fn test_autocorrelation_alternating_series() {
        let result = Autocorrelation::default().compute(&[1.0f64, -1.0, 1.0, -1.0, 1.0, -1.0]);
        assert_relative_eq!(result[1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(result[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_autocorrelation_short_inputs() {
        assert!(Autocorrelation::default().compute::<f64>(&[]).is_empty());

        let single = Autocorrelation::default().compute(&[7.0f64]);
        assert_eq!(single.len(), 1);
        assert!(single.is_all_missing());

        let pair = Autocorrelation::default().compute(&[7.0f64, 8.0]);
        assert_eq!(pair.len(), 2);
        assert!(pair.is_all_missing());
    }

    #[test]
    fn test_autocorrelation_constant_series_is_undefined() {
        let result = Autocorrelation::default().compute(&[3.0f64; 6]);
        assert_eq!(result.len(), 6);
        assert!(result.is_all_missing());
    }

    #[test]
    fn test_autocorrelation_constant_inexact_series_is_undefined() {
        for value in [0.1f64, 0.7, 3.3] {
            let result = Autocorrelation::default().compute(&[value; 6]);
            assert_eq!(result.len(), 6);
            assert!(result.is_all_missing(), "constant {value} gave {result:?}");
        }
    }

    #[test]
    fn test_autocorrelation_large_magnitude_linear_series() {
        let result = Autocorrelation::default().compute(&[1e160f64, 2e160, 3e160, 4e160, 5e160]);
        assert!(result[0].is_nan());
        for lag in 1..4 {
            assert_relative_eq!(result[lag], 1.0, epsilon = 1e-12);
        }
        assert!(result[4].is_nan());
    }

    #[test]
    fn test_autocorrelation_within_bounds() {
        let data = [3.1f64, -0.4, 2.2, 8.9, -5.0, 0.3, 1.1, 4.4, -2.7];
        let result = Autocorrelation::default().compute(&data);
        for value in result.values().flatten() {
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_autocorrelation_ignores_missing_pairs() {
        let with_gap = Autocorrelation::default().compute(&[1.0f64, 2.0, f64::NAN, 4.0, 5.0, 6.0]);
        assert_eq!(with_gap.len(), 6);
        assert_relative_eq!(with_gap[1], 1.0, epsilon = 1e-12);
    }
}
