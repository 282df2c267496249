//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use trend_core::prelude::*;
//!
//! let series: Series<f64> = Series::from_vec(vec![1.0, 2.0, 3.0]);
//! let table: ResultTable<f64> = ResultTable::from_columns([(ORIGINAL_DATA, series)]).unwrap();
//! assert_eq!(table.len(), 3);
//! ```

// Core types
pub use crate::num::Real;
pub use crate::series::Series;
pub use crate::table::columns::{
    AUTOCORRELATION, DIFFERENTIAL, MAXIMA, MINIMA, MOVING_AVERAGE, ORIGINAL_DATA,
};
pub use crate::table::ResultTable;

// Errors
pub use crate::error::{AnalysisError, ArgKey, Result};

// Validation
pub use crate::guard::{guarded, positive_integer, validate, CallArgs, NumericArgs, ParamSpec, ParamValue};

// Traits
pub use crate::traits::{Derivation, DerivationConfig};

// Statistics helpers
pub use crate::stats::{diff, lag_correlation, local_extrema, mean, pearson, rolling_mean, Extremum};
