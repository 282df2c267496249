//! Named analysis operations.
//!
//! [`Operation`] is the dynamic entry point used by the CLI and the
//! monitoring service: it maps a name to a derivation and declares the
//! parameters that [`SeriesAnalyzer::invoke`](crate::SeriesAnalyzer::invoke)
//! binds from call arguments.

use core::fmt;
use core::str::FromStr;

use trend_core::{error::AnalysisError, guard::ParamSpec, table::columns};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::smoothing::DEFAULT_WINDOW_SIZE;

const MOVING_AVERAGE_PARAMS: [ParamSpec; 1] =
    [ParamSpec::new("window_size", DEFAULT_WINDOW_SIZE as f64)];

/// One derivation the analyzer can run by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operation {
    /// Trailing moving average, parameter `window_size`.
    MovingAverage,
    /// First difference.
    Differential,
    /// Autocorrelation by lag.
    Autocorrelation,
    /// Strict local maxima.
    Maxima,
    /// Strict local minima.
    Minima,
}

impl Operation {
    /// Every operation, in result table order.
    pub const ALL: [Operation; 5] = [
        Operation::MovingAverage,
        Operation::Differential,
        Operation::Maxima,
        Operation::Minima,
        Operation::Autocorrelation,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MovingAverage => "moving_average",
            Self::Differential => "differential",
            Self::Autocorrelation => "autocorrelation",
            Self::Maxima => "maxima",
            Self::Minima => "minima",
        }
    }

    /// Result table column filled by this operation.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::MovingAverage => columns::MOVING_AVERAGE,
            Self::Differential => columns::DIFFERENTIAL,
            Self::Autocorrelation => columns::AUTOCORRELATION,
            Self::Maxima => columns::MAXIMA,
            Self::Minima => columns::MINIMA,
        }
    }

    /// Declared parameters, in positional order.
    #[must_use]
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::MovingAverage => &MOVING_AVERAGE_PARAMS,
            _ => &[],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = AnalysisError;

    /// Accepts snake_case or kebab-case names, case-insensitively, plus the
    /// `find_` prefixed extrema names and `diff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "moving_average" | "ma" => Ok(Self::MovingAverage),
            "differential" | "diff" => Ok(Self::Differential),
            "autocorrelation" | "acf" => Ok(Self::Autocorrelation),
            "maxima" | "find_maxima" => Ok(Self::Maxima),
            "minima" | "find_minima" => Ok(Self::Minima),
            _ => Err(AnalysisError::UnknownOperation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("moving_average".parse::<Operation>(), Ok(Operation::MovingAverage));
        assert_eq!("Moving-Average".parse::<Operation>(), Ok(Operation::MovingAverage));
        assert_eq!("find-maxima".parse::<Operation>(), Ok(Operation::Maxima));
        assert_eq!(" minima ".parse::<Operation>(), Ok(Operation::Minima));
        assert_eq!("diff".parse::<Operation>(), Ok(Operation::Differential));
        assert_eq!(
            "median".parse::<Operation>(),
            Err(AnalysisError::UnknownOperation("median".to_string()))
        );
    }

    #[test]
    fn test_name_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
            assert_eq!(op.to_string(), op.name());
        }
    }

    #[test]
    fn test_params() {
        let params = Operation::MovingAverage.params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "window_size");
        assert_eq!(params[0].default, 3.0);

        assert!(Operation::Differential.params().is_empty());
        assert!(Operation::Autocorrelation.params().is_empty());
    }

    #[test]
    fn test_columns_match_table_names() {
        let names: Vec<_> = Operation::ALL.iter().map(|op| op.column_name()).collect();
        assert_eq!(names, &columns::ALL[1..]);
    }
}
