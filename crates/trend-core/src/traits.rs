//! Core trait definitions for derivations.
//!
//! A derivation turns the analyzed series into one derived sequence of the
//! same length. Each one is a small struct holding its configuration, so a
//! derivation can be built once and applied to many series.

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::num::Real;
use crate::series::Series;

/// Configuration trait bounds for derivation configurations.
#[cfg(feature = "serde")]
pub trait DerivationConfig: Clone + Default + Serialize + DeserializeOwned + Send + Sync {}

/// Configuration trait bounds for derivation configurations.
#[cfg(not(feature = "serde"))]
pub trait DerivationConfig: Clone + Default + Send + Sync {}

#[cfg(feature = "serde")]
impl<T> DerivationConfig for T where T: Clone + Default + Serialize + DeserializeOwned + Send + Sync {}

#[cfg(not(feature = "serde"))]
impl<T> DerivationConfig for T where T: Clone + Default + Send + Sync {}

/// A length-preserving computation over a series.
///
/// Implementations must return a [`Series`] exactly as long as the input.
/// Positions where the statistic needs more data than is available, or is
/// mathematically undefined, hold [`Real::MISSING`]; neither case is an error.
///
/// # Example Implementation
///
/// ```rust
/// use trend_core::{Derivation, Real, Result, Series};
///
/// struct Negate;
///
/// impl<T: Real> Derivation<T> for Negate {
///     type Config = ();
///
///     fn new(_config: Self::Config) -> Self {
///         Self
///     }
///     fn column_name(&self) -> &'static str {
///         "Negated"
///     }
///     fn derive(&self, data: &[T]) -> Result<Series<T>> {
///         Ok(data.iter().map(|&x| -x).collect())
///     }
/// }
///
/// let out = <Negate as Derivation<f64>>::derive(&Negate, &[1.0, -2.0]).unwrap();
/// assert_eq!(out.as_slice(), &[-1.0, 2.0]);
/// ```
pub trait Derivation<T: Real>: Send + Sync {
    /// Configuration type for this derivation.
    type Config: DerivationConfig;

    /// Create a new derivation with the given configuration.
    fn new(config: Self::Config) -> Self;

    /// Column this derivation fills in the full result table.
    fn column_name(&self) -> &'static str;

    /// Compute the derived sequence.
    ///
    /// # Errors
    ///
    /// Returns an error only when the configuration itself is invalid.
    fn derive(&self, data: &[T]) -> Result<Series<T>>;
}
