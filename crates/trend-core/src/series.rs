//! Ordered series container.
//!
//! [`Series`] is both the input of an analysis session and the shape of every
//! derived sequence: contiguous, index-addressable, NaN for missing positions.

use core::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::num::Real;

/// A contiguous sequence of floating-point observations.
///
/// # Example
///
/// ```rust
/// use trend_core::Series;
///
/// let series: Series<f64> = Series::from_vec(vec![4.0, f64::NAN, 6.0]);
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.missing_count(), 1);
/// assert_eq!(series.last(), Some(&6.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent, bound = "T: Real"))]
pub struct Series<T: Real> {
    data: Vec<T>,
}

impl<T: Real> Default for Series<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> Series<T> {
    /// Create a new empty series.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a new series with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a series from an existing vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a series of `len` missing values.
    #[must_use]
    pub fn missing(len: usize) -> Self {
        Self {
            data: vec![T::MISSING; len],
        }
    }

    /// Returns the number of positions in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the series has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a value.
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    /// Get the value at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Get the first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// Get the last value, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.last()
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the series and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Count of missing positions.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|x| x.is_missing()).count()
    }

    /// Count of present (non-missing) positions.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Returns `true` if every position is missing (vacuously true when empty).
    #[must_use]
    pub fn is_all_missing(&self) -> bool {
        self.data.iter().all(|x| x.is_missing())
    }

    /// Values as `Option`s, `None` at missing positions.
    pub fn values(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.data
            .iter()
            .map(|&x| if x.is_missing() { None } else { Some(x) })
    }

    /// Element-wise equality that treats two missing markers as equal.
    ///
    /// Derived `PartialEq` follows IEEE 754, under which NaN never equals itself.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| a == b || (a.is_missing() && b.is_missing()))
    }

    /// Apply a function to each element.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        self.data.iter().map(|&x| f(x)).collect()
    }
}

impl<T: Real> Index<usize> for Series<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Real> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Real> IntoIterator for Series<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T: Real> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: Real> From<Vec<T>> for Series<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Real> From<&[T]> for Series<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl<T: Real, const N: usize> From<[T; N]> for Series<T> {
    fn from(data: [T; N]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}
