//! # trend-core
//!
//! Core types for the trendkit series analysis workspace.
//!
//! - [`Real`] - Trait for numeric types (f32/f64), NaN as the missing marker
//! - [`Series`] - Ordered observation container
//! - [`ResultTable`] - Named, equally long columns with deterministic ordering
//! - [`guard`] - Argument validation run before every guarded operation
//! - [`Derivation`] - Length-preserving computation trait
//! - [`stats`] - Rolling, lag and neighbourhood statistics
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```rust
//! use trend_core::prelude::*;
//!
//! let data: Series<f64> = Series::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
//! let smoothed = rolling_mean(data.as_slice(), 3);
//! assert_eq!(smoothed[4], 4.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod guard;
pub mod num;
pub mod prelude;
pub mod series;
pub mod stats;
pub mod table;
pub mod traits;

pub use error::{AnalysisError, ArgKey, Result};
pub use guard::{guarded, CallArgs, NumericArgs, ParamSpec, ParamValue};
pub use num::Real;
pub use series::Series;
pub use table::ResultTable;
pub use traits::{Derivation, DerivationConfig};
