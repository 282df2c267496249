//! Window, lag and neighbourhood statistics.
//!
//! These are the building blocks behind the analyzer's derivations. Every
//! sequence-valued function returns a [`Series`] of the input's length, with
//! [`Real::MISSING`] wherever the statistic is undefined.

use crate::num::Real;
use crate::series::Series;

/// Trailing arithmetic mean over `window` positions.
///
/// Position `i` holds the mean of `data[i + 1 - window..=i]`. The first
/// `window - 1` positions, and any window that contains a missing value, are
/// missing. A zero window, or one longer than the data, yields all-missing
/// output.
///
/// # Example
///
/// ```rust
/// use trend_core::stats::rolling_mean;
///
/// let result = rolling_mean(&[1.0f64, 2.0, 3.0, 4.0, 5.0], 3);
/// assert!(result[0].is_nan());
/// assert!(result[1].is_nan());
/// assert_eq!(&result.as_slice()[2..], &[2.0, 3.0, 4.0]);
/// ```
#[must_use]
pub fn rolling_mean<T: Real>(data: &[T], window: usize) -> Series<T> {
    if window == 0 {
        return Series::missing(data.len());
    }

    let divisor = T::from_count(window);
    let mut result = Series::with_capacity(data.len());
    let mut sum = T::ZERO;
    let mut missing = 0usize;

    for (i, &value) in data.iter().enumerate() {
        if value.is_missing() {
            missing += 1;
        } else {
            sum = sum + value;
        }

        if i >= window {
            let leaving = data[i - window];
            if leaving.is_missing() {
                missing -= 1;
            } else {
                sum = sum - leaving;
            }
        }

        if i + 1 >= window && missing == 0 {
            result.push(sum / divisor);
        } else {
            result.push(T::MISSING);
        }
    }

    result
}

/// Differences `y[i] = x[i] - x[i - periods]`; the first `periods` positions are missing.
#[must_use]
pub fn diff<T: Real>(data: &[T], periods: usize) -> Series<T> {
    (0..data.len())
        .map(|i| {
            if i < periods {
                T::MISSING
            } else {
                data[i] - data[i - periods]
            }
        })
        .collect()
}

/// Pearson correlation of two equally long slices.
///
/// Only positions where both values are present contribute. Returns the
/// missing marker when fewer than two pairs remain or when either side holds
/// a single repeated value.
///
/// Deviations are scaled by their largest magnitude before the products are
/// summed, so finite inputs near the top of the float range do not overflow.
#[must_use]
pub fn pearson<T: Real>(a: &[T], b: &[T]) -> T {
    let pairs = || {
        a.iter()
            .zip(b)
            .filter(|(x, y)| !x.is_missing() && !y.is_missing())
            .map(|(&x, &y)| (x, y))
    };

    let Some((first_a, first_b)) = pairs().next() else {
        return T::MISSING;
    };
    // A constant side has zero variance even when its rounded mean is an ulp off.
    if pairs().all(|(x, _)| x == first_a) || pairs().all(|(_, y)| y == first_b) {
        return T::MISSING;
    }

    let (count, sum_a, sum_b) = pairs().fold((0usize, T::ZERO, T::ZERO), |(n, sa, sb), (x, y)| {
        (n + 1, sa + x, sb + y)
    });
    let n = T::from_count(count);
    let mean_a = sum_a / n;
    let mean_b = sum_b / n;

    let (scale_a, scale_b) = pairs().fold((T::ZERO, T::ZERO), |(sa, sb), (x, y)| {
        (sa.max((x - mean_a).abs()), sb.max((y - mean_b).abs()))
    });
    if scale_a == T::ZERO || scale_b == T::ZERO {
        return T::MISSING;
    }

    let (sxx, syy, sxy) = pairs().fold((T::ZERO, T::ZERO, T::ZERO), |(sxx, syy, sxy), (x, y)| {
        let dx = (x - mean_a) / scale_a;
        let dy = (y - mean_b) / scale_b;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });

    let r = sxy / (sxx * syy).sqrt();
    if r.is_finite() {
        r.clamp_value(-T::ONE, T::ONE)
    } else {
        T::MISSING
    }
}

/// Correlation between the series and itself shifted by `lag` positions.
///
/// Compares `data[lag..]` with `data[..len - lag]`. A zero lag, or one that
/// leaves no overlap, is missing.
#[must_use]
pub fn lag_correlation<T: Real>(data: &[T], lag: usize) -> T {
    if lag == 0 || lag >= data.len() {
        return T::MISSING;
    }
    pearson(&data[lag..], &data[..data.len() - lag])
}

/// Which side of a strict local extremum to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Extremum {
    /// `prev < x > next`.
    Maximum,
    /// `prev > x < next`.
    Minimum,
}

impl Extremum {
    /// Strict test of `current` against both neighbours. Any missing operand fails.
    #[must_use]
    pub fn holds<T: Real>(self, prev: T, current: T, next: T) -> bool {
        match self {
            Self::Maximum => prev < current && current > next,
            Self::Minimum => prev > current && current < next,
        }
    }
}

/// Keep values that are strict local extrema of the requested kind.
///
/// The first and last positions have only one neighbour and are always
/// missing, as is every interior position that fails the strict test
/// (plateaus and ties included).
#[must_use]
pub fn local_extrema<T: Real>(data: &[T], kind: Extremum) -> Series<T> {
    let len = data.len();
    (0..len)
        .map(|i| {
            if i == 0 || i + 1 >= len {
                return T::MISSING;
            }
            let current = data[i];
            if kind.holds(data[i - 1], current, data[i + 1]) {
                current
            } else {
                T::MISSING
            }
        })
        .collect()
}

/// Mean of the present values, missing when there are none.
#[must_use]
pub fn mean<T: Real>(data: &[T]) -> T {
    let (count, sum) = data
        .iter()
        .filter(|x| !x.is_missing())
        .fold((0usize, T::ZERO), |(n, s), &x| (n + 1, s + x));
    if count == 0 {
        T::MISSING
    } else {
        sum / T::from_count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rolling_mean_basic() {
        let result = rolling_mean(&[1.0f64, 2.0, 3.0, 4.0, 5.0], 3);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_eq!(result[2], 2.0);
        assert_eq!(result[3], 3.0);
        assert_eq!(result[4], 4.0);
    }

    #[test]
    fn test_rolling_mean_window_larger_than_length() {
        let result = rolling_mean(&[1.0f64, 2.0], 5);
        assert_eq!(result.len(), 2);
        assert!(result.is_all_missing());
    }

    #[test]
    fn test_rolling_mean_zero_window_keeps_length() {
        let result = rolling_mean(&[1.0f64, 2.0, 3.0], 0);
        assert_eq!(result.len(), 3);
        assert!(result.is_all_missing());
    }

    #[test]
    fn test_rolling_mean_missing_only_poisons_its_windows() {
        let data = [1.0f64, f64::NAN, 3.0, 4.0, 5.0, 6.0];
        let result = rolling_mean(&data, 2);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_eq!(result[3], 3.5);
        assert_eq!(result[4], 4.5);
        assert_eq!(result[5], 5.5);
    }

    #[test]
    fn test_diff() {
        let result = diff(&[1.0f64, 3.0, 6.0, 10.0], 1);
        assert!(result[0].is_nan());
        assert_eq!(&result.as_slice()[1..], &[2.0, 3.0, 4.0]);

        let empty = diff::<f64>(&[], 1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        assert_eq!(pearson(&[1.0f64, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_eq!(pearson(&[1.0f64, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert!(pearson(&[1.0f64], &[2.0]).is_nan());
        assert!(pearson(&[5.0f64, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0f64, f64::NAN, 3.0], &[1.0, 2.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_pearson_constant_inexact_values_are_undefined() {
        for value in [0.1f64, 0.7, 3.3] {
            assert!(pearson(&[value; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]).is_nan());
            assert!(pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[value; 5]).is_nan());
        }
    }

    #[test]
    fn test_pearson_large_magnitudes() {
        let r = pearson(&[2e160f64, 3e160, 4e160, 5e160], &[1e160, 2e160, 3e160, 4e160]);
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);

        let r = pearson(&[1e300f64, -1e300, 1e300], &[-1e300, 1e300, -1e300]);
        assert_relative_eq!(r, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing_pairs() {
        let r = pearson(&[1.0f64, 2.0, f64::NAN, 4.0], &[10.0, 20.0, 30.0, 40.0]);
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lag_correlation_bounds() {
        let data = [1.0f64, 2.0, 3.0, 4.0, 5.0];
        assert!(lag_correlation(&data, 0).is_nan());
        assert_eq!(lag_correlation(&data, 1), 1.0);
        assert_eq!(lag_correlation(&data, 3), 1.0);
        assert!(lag_correlation(&data, 4).is_nan());
        assert!(lag_correlation(&data, 5).is_nan());
    }

    #[test]
    fn test_local_extrema() {
        let data = [1.0f64, 3.0, 2.0, 2.0, 5.0, 0.0, 4.0];

        let maxima = local_extrema(&data, Extremum::Maximum);
        assert_eq!(maxima.len(), 7);
        assert_eq!(maxima[1], 3.0);
        assert_eq!(maxima[4], 5.0);
        assert_eq!(maxima.present_count(), 2);

        let minima = local_extrema(&data, Extremum::Minimum);
        assert_eq!(minima[5], 0.0);
        assert_eq!(minima.present_count(), 1);
    }

    #[test]
    fn test_local_extrema_plateau_is_not_extremum() {
        let data = [1.0f64, 4.0, 4.0, 1.0];
        assert!(local_extrema(&data, Extremum::Maximum).is_all_missing());
    }

    #[test]
    fn test_local_extrema_short_inputs_keep_length() {
        assert_eq!(local_extrema::<f64>(&[], Extremum::Maximum).len(), 0);
        assert_eq!(local_extrema(&[1.0f64], Extremum::Maximum).len(), 1);
        assert_eq!(local_extrema(&[1.0f64, 2.0], Extremum::Minimum).len(), 2);
    }

    #[test]
    fn test_mean_ignores_missing() {
        assert_eq!(mean(&[1.0f64, f64::NAN, 5.0]), 3.0);
        assert!(mean::<f64>(&[]).is_nan());
    }
}
