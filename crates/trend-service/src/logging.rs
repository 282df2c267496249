//! Logging configuration and subscriber setup.
//!
//! Everything in the workspace logs through `tracing`. Binaries call
//! [`init_logging`] once; `RUST_LOG`, when set, overrides the configured
//! filter. Events go to stderr so reports printed on stdout stay parseable.

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{Result, ServiceError};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Level for the trendkit crates themselves.
    pub crate_level: Option<String>,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
    /// Full `EnvFilter` directive string, replacing `level` and `crate_level`.
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            crate_level: None,
            json: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Debug output from every trendkit crate.
    pub fn verbose() -> Self {
        Self {
            level: "info".to_string(),
            crate_level: Some("debug".to_string()),
            ..Self::default()
        }
    }

    /// Warnings and errors only, as JSON.
    pub fn production() -> Self {
        Self {
            level: "warn".to_string(),
            json: true,
            ..Self::default()
        }
    }

    /// Sets the base level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets whether to use JSON output format.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Parse the base level.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] for an unknown level name.
    pub fn base_level(&self) -> Result<Level> {
        self.level
            .parse::<Level>()
            .map_err(|_| ServiceError::config(format!("unknown log level '{}'", self.level)))
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.filter {
            return filter.clone();
        }

        let base = self.level.to_lowercase();
        let crates = self
            .crate_level
            .as_deref()
            .map_or_else(|| base.clone(), str::to_lowercase);
        format!(
            "{base},trend_core={crates},trend_analysis={crates},trend_service={crates},trend={crates}"
        )
    }
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`ServiceError::Config`] for an invalid level or filter, or when a
/// global subscriber is already installed.
///
/// # Examples
///
/// ```rust,no_run
/// use trend_service::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::default().with_json(true)).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    if config.filter.is_none() {
        config.base_level()?;
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.env_filter())
            .map_err(|e| ServiceError::config(format!("invalid log filter: {e}")))?,
    };

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ServiceError::config(format!("logging already initialized: {e}")))
}
