//! Error types for the service layer.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use trend_core::AnalysisError;

use crate::ledger::LedgerError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors raised by sources, sinks, configuration and the monitor.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The analysis engine rejected a call.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Writing to an output stream failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),

    /// JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Source data has an unusable shape.
    #[error("Invalid source data: {0}")]
    InvalidSource(String),

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// `start` was called while a worker is already running.
    #[error("Monitoring service is already running")]
    AlreadyRunning,

    /// The background worker panicked.
    #[error("Monitoring worker panicked")]
    WorkerPanicked,
}

impl ServiceError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an invalid source error with the given message.
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_display_includes_path() {
        let err = ServiceError::io(
            "/tmp/missing.json",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "I/O error on /tmp/missing.json: not found");
    }

    #[test]
    fn test_analysis_error_is_transparent() {
        let err: ServiceError = AnalysisError::UnknownOperation("median".into()).into();
        assert_eq!(err.to_string(), "Unknown operation: 'median'");
    }
}
