//! Trailing simple moving average.
//!
//! Position `i` holds the mean of the `window_size` values ending at `i`.
//! Positions before the first full window, and windows containing a missing
//! value, are missing.

use core::iter::FusedIterator;

use trend_core::{
    error::{AnalysisError, ArgKey, Result},
    num::Real,
    series::Series,
    stats::rolling_mean,
    table::columns,
    traits::Derivation,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Window used when the caller does not choose one.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Configuration for the moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovingAverageConfig {
    /// Number of trailing positions averaged.
    pub window_size: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl MovingAverageConfig {
    /// Create a configuration with the given window.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Check that the window is usable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a zero window.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(AnalysisError::InvalidArgument {
                key: ArgKey::name("window_size"),
                value: self.window_size.to_string(),
                expected: "positive integer",
            });
        }
        Ok(())
    }
}

/// Simple moving average over a trailing window.
///
/// # Formula
///
/// MA(i) = (x(i - w + 1) + ... + x(i)) / w
///
/// A window longer than the series is not an error; it produces an all-missing
/// sequence of the input's length.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    config: MovingAverageConfig,
}

impl MovingAverage {
    /// Window size in use.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    /// Compute the averages and wrap them in a replay iterator.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a zero window.
    pub fn iter<T: Real>(&self, data: &[T]) -> Result<MovingAverageIter<T>> {
        let averages = <Self as Derivation<T>>::derive(self, data)?;
        Ok(MovingAverageIter::new(averages))
    }
}

impl<T: Real> Derivation<T> for MovingAverage {
    type Config = MovingAverageConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn column_name(&self) -> &'static str {
        columns::MOVING_AVERAGE
    }

    fn derive(&self, data: &[T]) -> Result<Series<T>> {
        self.config.validate()?;
        Ok(rolling_mean(data, self.config.window_size))
    }
}

/// Finite, in-order replay of batch-computed moving averages.
///
/// The averages are computed once when the iterator is created; stepping only
/// hands out the next stored value. Each call to
/// [`SeriesAnalyzer::moving_average_iter`](crate::SeriesAnalyzer::moving_average_iter)
/// starts a fresh replay from position 0.
#[derive(Debug, Clone)]
pub struct MovingAverageIter<T: Real> {
    values: std::vec::IntoIter<T>,
}

impl<T: Real> MovingAverageIter<T> {
    fn new(averages: Series<T>) -> Self {
        Self {
            values: averages.into_iter(),
        }
    }

    /// The values not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> &[T] {
        self.values.as_slice()
    }
}

impl<T: Real> Iterator for MovingAverageIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T: Real> ExactSizeIterator for MovingAverageIter<T> {}

impl<T: Real> FusedIterator for MovingAverageIter<T> {}
