//! Prelude for trend-analysis.
//!
//! Re-exports the analyzer, every derivation and the core types they use.

pub use crate::analyzer::SeriesAnalyzer;
pub use crate::config::AnalysisConfig;
pub use crate::operation::Operation;

// Derivations
pub use crate::change::{Differential, DifferentialConfig};
pub use crate::correlation::{Autocorrelation, AutocorrelationConfig};
pub use crate::extrema::{ExtremaConfig, Maxima, Minima};
pub use crate::smoothing::{MovingAverage, MovingAverageConfig, MovingAverageIter, DEFAULT_WINDOW_SIZE};

pub use trend_core::prelude::*;
