//! First difference.

use trend_core::{
    error::Result, num::Real, series::Series, stats::diff, table::columns, traits::Derivation,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the differential. It takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DifferentialConfig;

/// Change from the previous position: `d(i) = x(i) - x(i - 1)`.
///
/// Position 0 has no predecessor and is missing. A missing value on either
/// side of a step makes that step missing.
#[derive(Debug, Clone, Default)]
pub struct Differential;

impl Differential {
    /// Compute the differences. Never fails.
    #[must_use]
    pub fn compute<T: Real>(&self, data: &[T]) -> Series<T> {
        diff(data, 1)
    }
}

impl<T: Real> Derivation<T> for Differential {
    type Config = DifferentialConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn column_name(&self) -> &'static str {
        columns::DIFFERENTIAL
    }

    fn derive(&self, data: &[T]) -> Result<Series<T>> {
        Ok(self.compute(data))
    }
}
