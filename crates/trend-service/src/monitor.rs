//! Background monitoring service.
//!
//! [`MonitoringService`] polls a [`SeriesSource`] on a fixed interval, runs a
//! fresh [`SeriesAnalyzer`] over each snapshot and hands the resulting table
//! to a [`ResultSink`]. One worker thread does the polling; stopping is
//! cooperative through a channel, so an in-progress cycle always completes.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use trend_analysis::SeriesAnalyzer;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::sink::{Report, ResultSink};
use crate::source::SeriesSource;

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The source had nothing to analyze.
    Skipped,
    /// A table with `rows` rows was written to the sink.
    Analyzed {
        /// Row count of the written table.
        rows: usize,
    },
}

/// Running totals across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Cycles attempted.
    pub cycles: u64,
    /// Cycles that wrote a table.
    pub analyzed: u64,
    /// Cycles skipped for lack of data.
    pub skipped: u64,
    /// Cycles that failed.
    pub failed: u64,
}

struct Inner<S, K> {
    source: S,
    sink: K,
    stats: MonitorStats,
}

impl<S: SeriesSource, K: ResultSink> Inner<S, K> {
    fn cycle(&mut self, config: &ServiceConfig) -> Result<CycleOutcome> {
        self.stats.cycles += 1;
        let outcome = self.analyze_snapshot(config);
        match &outcome {
            Ok(CycleOutcome::Skipped) => self.stats.skipped += 1,
            Ok(CycleOutcome::Analyzed { .. }) => self.stats.analyzed += 1,
            Err(_) => self.stats.failed += 1,
        }
        outcome
    }

    fn analyze_snapshot(&mut self, config: &ServiceConfig) -> Result<CycleOutcome> {
        let service = config.service_id.as_str();

        let Some(snapshot) = self.source.fetch()? else {
            tracing::warn!(service, source = %self.source.describe(), "no data received, skipping cycle");
            return Ok(CycleOutcome::Skipped);
        };

        let analyzer = SeriesAnalyzer::new(snapshot.values);
        let table = analyzer.results_with(&config.analysis)?;
        let report = Report::new(service, &table).with_row_labels(snapshot.labels.as_deref());
        self.sink.write(&report)?;

        let rows = table.len();
        tracing::info!(service, rows, "analysis results saved");
        Ok(CycleOutcome::Analyzed { rows })
    }
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodic re-analysis of a polled series.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use trend_service::monitor::{CycleOutcome, MonitoringService};
/// use trend_service::sink::MemorySink;
/// use trend_service::source::StaticSource;
/// use trend_service::config::ServiceConfig;
///
/// let sink = MemorySink::new();
/// let config = ServiceConfig::new("unused.json", "unused.txt")
///     .with_poll_interval(Duration::from_millis(10));
/// let service = MonitoringService::new(
///     StaticSource::repeating(vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0]),
///     sink.clone(),
///     config,
/// );
///
/// assert_eq!(service.run_cycle().unwrap(), CycleOutcome::Analyzed { rows: 6 });
/// assert_eq!(sink.len(), 1);
/// ```
pub struct MonitoringService<S, K> {
    config: Arc<ServiceConfig>,
    inner: Arc<Mutex<Inner<S, K>>>,
    worker: Option<Worker>,
}

impl<S, K> MonitoringService<S, K>
where
    S: SeriesSource + 'static,
    K: ResultSink + 'static,
{
    /// Service over `source` and `sink`. Nothing runs until [`start`](Self::start)
    /// or [`run_cycle`](Self::run_cycle).
    pub fn new(source: S, sink: K, config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            inner: Arc::new(Mutex::new(Inner {
                source,
                sink,
                stats: MonitorStats::default(),
            })),
            worker: None,
        }
    }

    /// The service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Totals so far.
    pub fn stats(&self) -> MonitorStats {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).stats
    }

    /// Returns `true` while a worker thread is attached.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    /// Fetch, analyze and write once on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns source, analysis or sink errors. A source with no data is a
    /// [`CycleOutcome::Skipped`], not an error.
    pub fn run_cycle(&self) -> Result<CycleOutcome> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cycle(&self.config)
    }

    /// Spawn the worker thread.
    ///
    /// The worker runs a cycle immediately, then one per poll interval until
    /// [`stop`](Self::stop) is called or `max_cycles` is reached. Cycle errors
    /// are logged and do not end the loop.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AlreadyRunning`] if a worker is attached, or an
    /// I/O error if the thread cannot be spawned.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Err(ServiceError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let inner = Arc::clone(&self.inner);
        let config = Arc::clone(&self.config);
        let service_id = config.service_id.clone();

        let handle = thread::Builder::new()
            .name(format!("monitor-{service_id}"))
            .spawn(move || {
                let interval = config.poll_interval();
                let mut completed = 0u64;
                loop {
                    let outcome = inner
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .cycle(&config);
                    if let Err(err) = outcome {
                        tracing::error!(service = %config.service_id, error = %err, "cycle failed");
                    }

                    completed += 1;
                    if config.max_cycles.is_some_and(|max| completed >= max) {
                        tracing::info!(service = %config.service_id, completed, "cycle limit reached");
                        break;
                    }

                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(ServiceError::Output)?;

        tracing::info!(service = %service_id, "service started");
        self.worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
        Ok(())
    }

    /// Signal the worker to stop and wait for it. A no-op when not running.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::WorkerPanicked`] if the worker panicked.
    pub fn stop(&mut self) -> Result<MonitorStats> {
        if let Some(worker) = self.worker.take() {
            tracing::info!(service = %self.config.service_id, "service stopping");
            // The worker may already have exited after its last cycle.
            let _ = worker.stop.send(());
            worker
                .handle
                .join()
                .map_err(|_| ServiceError::WorkerPanicked)?;
            tracing::info!(service = %self.config.service_id, "service stopped");
        }
        Ok(self.stats())
    }

    /// Wait for the worker to finish on its own (after `max_cycles`).
    ///
    /// Blocks indefinitely when no cycle limit is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::WorkerPanicked`] if the worker panicked.
    pub fn join(&mut self) -> Result<MonitorStats> {
        if let Some(worker) = self.worker.take() {
            worker
                .handle
                .join()
                .map_err(|_| ServiceError::WorkerPanicked)?;
            drop(worker.stop);
        }
        Ok(self.stats())
    }
}

impl<S, K> Drop for MonitoringService<S, K> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            let _ = worker.handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::source::StaticSource;
    use std::time::Duration;

    fn config() -> ServiceConfig {
        ServiceConfig::new("in.json", "out.txt")
            .with_service_id("test")
            .with_poll_interval(Duration::from_millis(5))
            .with_window_size(3)
    }

    #[test]
    fn test_run_cycle_skips_empty_fetch() {
        let sink = MemorySink::new();
        let service = MonitoringService::new(StaticSource::scripted(vec![vec![]]), sink.clone(), config());

        assert_eq!(service.run_cycle().unwrap(), CycleOutcome::Skipped);
        assert!(sink.is_empty());
        assert_eq!(service.stats().skipped, 1);
    }

    #[test]
    fn test_run_cycle_writes_table() {
        let sink = MemorySink::new();
        let service = MonitoringService::new(
            StaticSource::repeating(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            sink.clone(),
            config(),
        );

        assert_eq!(service.run_cycle().unwrap(), CycleOutcome::Analyzed { rows: 5 });
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label, "test");
        assert_eq!(reports[0].table.column_count(), 6);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut service = MonitoringService::new(
            StaticSource::repeating(vec![1.0]),
            MemorySink::new(),
            config(),
        );
        service.start().unwrap();
        assert!(matches!(service.start(), Err(ServiceError::AlreadyRunning)));
        service.stop().unwrap();
        assert!(!service.is_running());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut service = MonitoringService::new(StaticSource::repeating(vec![1.0]), MemorySink::new(), config());
        assert_eq!(service.stop().unwrap(), MonitorStats::default());
    }
}
