//! # trend-service
//!
//! Adapters that connect the analysis engine to the outside world:
//!
//! - [`source`]: where series come from (`SeriesSource`, JSON files)
//! - [`sink`]: where result tables go (text report, CSV, JSON)
//! - [`monitor`]: background service re-analyzing a source on an interval
//! - [`ledger`]: JSON-file spending ledger whose monthly totals can be analyzed
//! - [`config`] and [`logging`]: service configuration and `tracing` setup
//!
//! # Example
//!
//! ```
//! use trend_service::prelude::*;
//!
//! let sink = MemorySink::new();
//! let service = MonitoringService::new(
//!     StaticSource::repeating(vec![2.0, 4.0, 3.0, 6.0, 5.0]),
//!     sink.clone(),
//!     ServiceConfig::new("trends.json", "report.txt").with_window_size(2),
//! );
//!
//! service.run_cycle().unwrap();
//! let report = &sink.reports()[0];
//! assert_eq!(report.table.column_count(), 6);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod monitor;
pub mod sink;
pub mod source;

pub use config::{OutputFormat, ServiceConfig};
pub use error::{Result, ServiceError};
pub use monitor::{CycleOutcome, MonitorStats, MonitoringService};

/// Common imports for service users.
pub mod prelude {
    pub use crate::config::{OutputConfig, OutputFormat, ServiceConfig, SourceConfig};
    pub use crate::error::{Result, ServiceError};
    pub use crate::ledger::{Card, CardUpdate, JsonLedger, Ledger, LedgerError, SpendingSummary, UserRecord};
    pub use crate::logging::{init_logging, LogConfig};
    pub use crate::monitor::{CycleOutcome, MonitorStats, MonitoringService};
    pub use crate::sink::{file_sink, write_report, MemorySink, Report, ResultSink};
    pub use crate::source::{JsonFileSource, SeriesSource, Snapshot, StaticSource};
}
