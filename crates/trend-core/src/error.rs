//! Error types for series analysis.
//!
//! Only parameter problems and table-shape violations are errors. Data
//! pathologies (a series too short for a statistic, a statistic that is
//! mathematically undefined) are absorbed into the missing marker so that every
//! derived sequence keeps the input's length.

use core::fmt;

use thiserror::Error;

/// Result type alias for analysis operations that may fail.
pub type Result<T> = core::result::Result<T, AnalysisError>;

/// Identifies a call argument by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    /// A positional argument (0-based).
    Position(usize),
    /// A named argument.
    Name(String),
}

impl ArgKey {
    /// Build a named key.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(index) => write!(f, "at position {index}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Errors that can occur while validating arguments or assembling results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// An argument could not be interpreted as a real number, or was a number
    /// outside the operation's domain.
    #[error("Invalid argument {key}: {value} (expected {expected})")]
    InvalidArgument {
        /// Which argument was rejected.
        key: ArgKey,
        /// The rejected value, rendered for display.
        value: String,
        /// Description of the expected value.
        expected: &'static str,
    },

    /// An argument was supplied that the operation does not accept.
    #[error("Unexpected argument {key} for operation '{operation}'")]
    UnexpectedArgument {
        /// The surplus argument.
        key: ArgKey,
        /// Name of the operation being invoked.
        operation: &'static str,
    },

    /// A column's length does not match the table's row count.
    #[error("Column length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Row count of the table.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },

    /// A column with this name already exists.
    #[error("Duplicate column: '{0}'")]
    DuplicateColumn(String),

    /// A requested column does not exist.
    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    /// An operation name did not match any known operation.
    #[error("Unknown operation: '{0}'")]
    UnknownOperation(String),
}

impl AnalysisError {
    /// Shorthand for a non-numeric argument.
    #[must_use]
    pub fn not_numeric(key: ArgKey, value: impl fmt::Display) -> Self {
        Self::InvalidArgument {
            key,
            value: value.to_string(),
            expected: "real number",
        }
    }

    /// Returns `true` for argument validation failures.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::UnexpectedArgument { .. }
        )
    }
}
