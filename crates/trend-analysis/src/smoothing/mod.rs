//! Smoothing derivations.
//!
//! - Moving Average (trailing, equal weights) and its replay iterator

mod moving_average;

pub use moving_average::{MovingAverage, MovingAverageConfig, MovingAverageIter, DEFAULT_WINDOW_SIZE};
