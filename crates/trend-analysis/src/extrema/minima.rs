//! Strict local minima.

use trend_core::{
    error::Result,
    num::Real,
    series::Series,
    stats::{local_extrema, Extremum},
    table::columns,
    traits::Derivation,
};

use super::ExtremaConfig;

/// Keeps `x(i)` where `x(i - 1) > x(i) < x(i + 1)`.
#[derive(Debug, Clone, Default)]
pub struct Minima;

impl Minima {
    /// Compute the troughs. Never fails.
    #[must_use]
    pub fn compute<T: Real>(&self, data: &[T]) -> Series<T> {
        local_extrema(data, Extremum::Minimum)
    }
}

impl<T: Real> Derivation<T> for Minima {
    type Config = ExtremaConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn column_name(&self) -> &'static str {
        columns::MINIMA
    }

    fn derive(&self, data: &[T]) -> Result<Series<T>> {
        Ok(self.compute(data))
    }
}
