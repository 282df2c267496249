//! Aligned result table.
//!
//! A [`ResultTable`] maps column names to equally long [`Series`] and keeps
//! columns in insertion order (backed by `IndexMap`), so printed, serialized
//! and compared tables always list columns the same way.

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::num::Real;
use crate::series::Series;

/// Column names used by the full analysis table.
pub mod columns {
    /// Reserved column holding the input series.
    pub const ORIGINAL_DATA: &str = "Original Data";
    /// Trailing moving average.
    pub const MOVING_AVERAGE: &str = "Moving Average";
    /// First difference.
    pub const DIFFERENTIAL: &str = "Differential";
    /// Strict local maxima.
    pub const MAXIMA: &str = "Maxima";
    /// Strict local minima.
    pub const MINIMA: &str = "Minima";
    /// Autocorrelation by lag.
    pub const AUTOCORRELATION: &str = "Autocorrelation";

    /// All columns of the full table, in table order.
    pub const ALL: [&str; 6] = [
        ORIGINAL_DATA,
        MOVING_AVERAGE,
        DIFFERENTIAL,
        MAXIMA,
        MINIMA,
        AUTOCORRELATION,
    ];
}

/// Named, equally long columns in deterministic order.
///
/// # Example
///
/// ```rust
/// use trend_core::{ResultTable, Series};
///
/// let mut table: ResultTable<f64> = ResultTable::new();
/// table.insert("x", Series::from_vec(vec![1.0, 2.0, 3.0])).unwrap();
/// table.insert("y", Series::from_vec(vec![f64::NAN, 1.0, 1.0])).unwrap();
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.column_names(), vec!["x", "y"]);
/// assert!(table.insert("z", Series::from_vec(vec![1.0])).is_err());
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent, bound = "T: Real"))]
pub struct ResultTable<T: Real> {
    columns: IndexMap<String, Series<T>>,
}

impl<T: Real> Default for ResultTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> ResultTable<T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
        }
    }

    /// Create an empty table with room for `capacity` columns.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: IndexMap::with_capacity(capacity),
        }
    }

    /// Build a table from `(name, series)` pairs, in order.
    ///
    /// # Errors
    ///
    /// Returns an error on a length mismatch or a repeated name.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series<T>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, series) in columns {
            table.insert(name, series)?;
        }
        Ok(table)
    }

    /// Number of rows (0 for a table without columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Series::len)
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Series<T>> {
        self.columns.get(name)
    }

    /// Get a column by name, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&Series<T>> {
        self.columns
            .get(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the length differs from the
    /// existing columns.
    pub fn insert(&mut self, name: impl Into<String>, series: Series<T>) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(AnalysisError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && series.len() != self.len() {
            return Err(AnalysisError::LengthMismatch {
                expected: self.len(),
                actual: series.len(),
            });
        }

        self.columns.insert(name, series);
        Ok(())
    }

    /// The values of every column at `index`, in column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<T>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.values().map(|s| s[index]).collect())
    }

    /// Iterate rows as vectors of column values.
    pub fn rows(&self) -> impl Iterator<Item = Vec<T>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// A new table with only `names`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] for an unknown name.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut selected = Self::with_capacity(names.len());
        for &name in names {
            let series = self.column(name)?;
            selected.insert(name, series.clone())?;
        }
        Ok(selected)
    }

    /// Iterate `(name, series)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series<T>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Column-wise equality that treats two missing markers as equal.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1.same_as(v2))
    }
}
