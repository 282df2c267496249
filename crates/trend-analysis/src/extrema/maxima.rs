//! Strict local maxima.

use trend_core::{
    error::Result,
    num::Real,
    series::Series,
    stats::{local_extrema, Extremum},
    table::columns,
    traits::Derivation,
};

use super::ExtremaConfig;

/// Keeps `x(i)` where `x(i - 1) < x(i) > x(i + 1)`.
///
/// Plateaus do not qualify, and neither does a position next to a missing
/// value.
#[derive(Debug, Clone, Default)]
pub struct Maxima;

impl Maxima {
    /// Compute the peaks. Never fails.
    #[must_use]
    pub fn compute<T: Real>(&self, data: &[T]) -> Series<T> {
        local_extrema(data, Extremum::Maximum)
    }
}

impl<T: Real> Derivation<T> for Maxima {
    type Config = ExtremaConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn column_name(&self) -> &'static str {
        columns::MAXIMA
    }

    fn derive(&self, data: &[T]) -> Result<Series<T>> {
        Ok(self.compute(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maxima_single_peak() {
        let result = Maxima::default().compute(&[1.0f64, 3.0, 2.0]);
        assert!(result[0].is_nan());
        assert_eq!(result[1], 3.0);
        assert!(result[2].is_nan());
    }

    #[test]
    fn test_maxima_several_peaks() {
        let data = [0.0f64, 5.0, 1.0, 4.0, 4.0, 1.0, 6.0, 2.0];
        let result = Maxima::default().compute(&data);

        assert_eq!(result.len(), data.len());
        let peaks: Vec<_> = result
            .values()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        assert_eq!(peaks, vec![(1, 5.0), (6, 6.0)]);
    }

    #[test]
    fn test_maxima_monotonic_is_empty() {
        let rising: Vec<f64> = (0..10).map(f64::from).collect();
        assert!(Maxima::default().compute(&rising).is_all_missing());
    }

    #[test]
    fn test_maxima_next_to_missing() {
        let result = Maxima::default().compute(&[1.0f64, 5.0, f64::NAN, 9.0, 2.0]);
        assert!(result[1].is_nan());
        assert_eq!(result[3], 9.0);
    }
}
