//! Numeric type abstractions for series analysis.
//!
//! This module defines the [`Real`] trait which abstracts over `f32` and `f64`.
//! NaN doubles as the missing marker: every derived sequence fills positions
//! it cannot compute with [`Real::MISSING`] instead of dropping them.

use num_traits::{Float, FromPrimitive, ToPrimitive};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

/// Serialization bounds required of [`Real`] when the `serde` feature is enabled.
#[cfg(feature = "serde")]
pub trait SerdeBound: Serialize + DeserializeOwned {}

/// Serialization bounds required of [`Real`]; empty without the `serde` feature.
#[cfg(not(feature = "serde"))]
pub trait SerdeBound {}

#[cfg(feature = "serde")]
impl<T> SerdeBound for T where T: Serialize + DeserializeOwned {}

#[cfg(not(feature = "serde"))]
impl<T> SerdeBound for T {}

/// Floating-point element type of a [`Series`](crate::Series).
///
/// # Example
///
/// ```rust
/// use trend_core::Real;
///
/// fn mean_of_pair<T: Real>(a: T, b: T) -> T {
///     if a.is_missing() || b.is_missing() {
///         return T::MISSING;
///     }
///     (a + b) / T::from_count(2)
/// }
///
/// assert_eq!(mean_of_pair(1.0f64, 3.0), 2.0);
/// assert!(mean_of_pair(1.0f64, f64::NAN).is_nan());
/// ```
pub trait Real:
    Float + FromPrimitive + ToPrimitive + Copy + Send + Sync + Default + SerdeBound + 'static
{
    /// The missing marker (NaN).
    const MISSING: Self;
    /// Zero value.
    const ZERO: Self;
    /// One value.
    const ONE: Self;

    /// Convert from `f64`, rounding when the target is narrower.
    #[must_use]
    fn from_f64_lossy(value: f64) -> Self;

    /// Convert a count of positions, as used for means and window sizes.
    #[must_use]
    fn from_count(count: usize) -> Self;

    /// Returns `true` if this value is the missing marker.
    #[must_use]
    fn is_missing(self) -> bool {
        self.is_nan()
    }

    /// Clamp value to the range [min, max]. NaN stays NaN.
    #[must_use]
    fn clamp_value(self, min: Self, max: Self) -> Self {
        if self.is_nan() {
            return self;
        }
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

impl Real for f32 {
    const MISSING: Self = f32::NAN;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn from_count(count: usize) -> Self {
        count as f32
    }
}

impl Real for f64 {
    const MISSING: Self = f64::NAN;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn from_count(count: usize) -> Self {
        count as f64
    }
}
