//! # trend-analysis
//!
//! Derivations over a single series and the analyzer that assembles them.
//!
//! This crate provides the derivations, organized by what they measure:
//!
//! - **Smoothing**: Moving Average (with a replay iterator)
//! - **Change**: Differential
//! - **Correlation**: Autocorrelation
//! - **Extrema**: Maxima, Minima
//!
//! [`SeriesAnalyzer`] runs them over one stored series, either through typed
//! methods or by name through [`Operation`], and assembles the full result
//! table.
//!
//! # Example
//!
//! ```
//! use trend_analysis::prelude::*;
//!
//! let analyzer = SeriesAnalyzer::new(vec![3.0f64, 1.0, 4.0, 1.0, 5.0]);
//!
//! let peaks = analyzer.maxima();
//! assert_eq!(peaks[2], 4.0);
//!
//! let table = analyzer.results().unwrap();
//! assert_eq!(table.column_names()[0], ORIGINAL_DATA);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod change;
pub mod config;
pub mod correlation;
pub mod extrema;
pub mod operation;
pub mod smoothing;

pub mod prelude;

pub use analyzer::SeriesAnalyzer;
pub use config::AnalysisConfig;
pub use operation::Operation;
pub use smoothing::MovingAverageIter;
