//! Service configuration.
//!
//! A [`ServiceConfig`] describes one monitoring service: where its series
//! comes from, where results go, how often to poll and how to analyze. It is
//! usually loaded from a JSON file:
//!
//! ```json
//! {
//!   "service_id": "rust-trends",
//!   "source": { "path": "trends.json", "keyword": "rust" },
//!   "output": { "path": "analysis_results_rust-trends.txt", "format": "text" },
//!   "poll_interval_ms": 5000,
//!   "analysis": { "window_size": 5 }
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trend_analysis::AnalysisConfig;

use crate::error::{Result, ServiceError};
use crate::logging::LogConfig;

/// Default delay between monitoring cycles.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Window used by the monitoring service when none is configured.
pub const DEFAULT_SERVICE_WINDOW: usize = 5;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Appended plain-text report, one block per column.
    #[default]
    Text,
    /// Comma-separated table, rewritten every cycle.
    Csv,
    /// Pretty-printed JSON table, rewritten every cycle.
    Json,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ServiceError::config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Where the monitored series is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON file re-read on every cycle.
    pub path: PathBuf,
    /// Column to analyze when the file holds several keyword columns.
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Where results are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file.
    pub path: PathBuf,
    /// Output file format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Configuration for one monitoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Identifier used in log events and report labels.
    #[serde(default = "default_service_id")]
    pub service_id: String,
    /// Series source.
    pub source: SourceConfig,
    /// Result destination.
    pub output: OutputConfig,
    /// Delay between cycles, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Stop after this many cycles; run until stopped when absent.
    #[serde(default)]
    pub max_cycles: Option<u64>,
    /// Analysis parameters.
    #[serde(default = "default_analysis")]
    pub analysis: AnalysisConfig,
    /// Logging setup used by binaries that load this file.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_service_id() -> String {
    "trends".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_analysis() -> AnalysisConfig {
    AnalysisConfig::default().with_window_size(DEFAULT_SERVICE_WINDOW)
}

impl ServiceConfig {
    /// Configuration with defaults for everything but the file paths.
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            service_id: default_service_id(),
            source: SourceConfig {
                path: source.into(),
                keyword: None,
            },
            output: OutputConfig {
                path: output.into(),
                format: OutputFormat::default(),
            },
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_cycles: None,
            analysis: default_analysis(),
            log: LogConfig::default(),
        }
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ServiceError::io(path, e))?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), service_id = %config.service_id, "loaded service config");
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or invalid values.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the service identifier.
    pub fn with_service_id(mut self, id: impl Into<String>) -> Self {
        self.service_id = id.into();
        self
    }

    /// Sets the keyword column.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.source.keyword = Some(keyword.into());
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the cycle limit.
    pub fn with_max_cycles(mut self, cycles: Option<u64>) -> Self {
        self.max_cycles = cycles;
        self
    }

    /// Sets the moving average window.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.analysis = self.analysis.with_window_size(window_size);
        self
    }

    /// Delay between cycles.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] for an empty service id, a zero poll
    /// interval or cycle limit, and [`ServiceError::Analysis`] for invalid
    /// analysis parameters.
    pub fn validate(&self) -> Result<()> {
        if self.service_id.trim().is_empty() {
            return Err(ServiceError::config("service_id must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ServiceError::config("poll_interval_ms must be greater than 0"));
        }
        if self.max_cycles == Some(0) {
            return Err(ServiceError::config("max_cycles must be greater than 0"));
        }
        self.analysis.validate()?;
        Ok(())
    }
}
