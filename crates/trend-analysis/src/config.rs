//! Configuration for assembling the full result table.

use trend_core::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::smoothing::{MovingAverageConfig, DEFAULT_WINDOW_SIZE};

/// Parameters used by [`SeriesAnalyzer::results_with`](crate::SeriesAnalyzer::results_with).
///
/// # Example
///
/// ```rust
/// use trend_analysis::{AnalysisConfig, SeriesAnalyzer};
///
/// let analyzer = SeriesAnalyzer::new(vec![1.0f64, 2.0, 3.0, 4.0]);
/// let table = analyzer
///     .results_with(&AnalysisConfig::default().with_window_size(2))
///     .unwrap();
/// assert_eq!(table.get("Moving Average").unwrap()[1], 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Moving average window.
    pub window_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl AnalysisConfig {
    /// Set the moving average window.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Moving average settings derived from this configuration.
    #[must_use]
    pub fn moving_average(&self) -> MovingAverageConfig {
        MovingAverageConfig::new(self.window_size)
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error for a zero window.
    pub fn validate(&self) -> Result<()> {
        self.moving_average().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = AnalysisConfig::default();
        assert_eq!(config.window_size, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_invalid() {
        let config = AnalysisConfig::default().with_window_size(0);
        assert!(config.validate().unwrap_err().is_argument_error());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_with_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());

        let config: AnalysisConfig = serde_json::from_str(r#"{"window_size": 7}"#).unwrap();
        assert_eq!(config.window_size, 7);
    }
}
