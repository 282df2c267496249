//! Downstream result sinks.
//!
//! A [`ResultSink`] receives every table the monitoring service produces.
//! The file sinks share their rendering with the CLI through
//! [`write_report`], so a table printed to stdout and one written to disk
//! look the same.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use trend_core::ResultTable;

use crate::config::OutputFormat;
use crate::error::{Result, ServiceError};

/// Width of the separator line closing each text block.
const SEPARATOR_WIDTH: usize = 40;

/// One analysis result ready to be written.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Name of the analyzed series (service id, keyword or file name).
    pub label: &'a str,
    /// Per-row labels such as dates; row numbers are used when absent.
    pub row_labels: Option<&'a [String]>,
    /// The full result table.
    pub table: &'a ResultTable<f64>,
}

impl<'a> Report<'a> {
    /// Report without row labels.
    pub fn new(label: &'a str, table: &'a ResultTable<f64>) -> Self {
        Self {
            label,
            row_labels: None,
            table,
        }
    }

    /// Attach row labels.
    pub fn with_row_labels(mut self, labels: Option<&'a [String]>) -> Self {
        self.row_labels = labels;
        self
    }

    fn row_label(&self, row: usize) -> String {
        self.row_labels
            .and_then(|labels| labels.get(row))
            .cloned()
            .unwrap_or_else(|| row.to_string())
    }
}

/// Consumer of result tables.
pub trait ResultSink: Send {
    /// Persist or forward one report.
    ///
    /// # Errors
    ///
    /// Returns an error when the report cannot be written.
    fn write(&mut self, report: &Report<'_>) -> Result<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn write(&mut self, report: &Report<'_>) -> Result<()> {
        (**self).write(report)
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

/// Render the plain-text report: one `Function:` block per column.
///
/// ```text
///
///
/// Function: Moving Average
/// Result:
/// 0    NaN
/// 1    NaN
/// 2    2
/// ----------------------------------------
/// ```
pub fn render_text(report: &Report<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n\nSeries: {}\n", report.label));

    for (name, column) in report.table.iter() {
        out.push_str(&format!("\n\nFunction: {name}\nResult:\n"));
        for (row, &value) in column.iter().enumerate() {
            out.push_str(&format!("{}    {}\n", report.row_label(row), format_value(value)));
        }
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
    }
    out
}

/// Write the table as CSV: a header row, then one row per position with an
/// empty cell for each missing value.
///
/// # Errors
///
/// Returns [`ServiceError::Csv`] when writing fails.
pub fn write_csv<W: Write>(report: &Report<'_>, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let index_name = if report.row_labels.is_some() { "date" } else { "index" };
    let mut header = vec![index_name.to_string()];
    header.extend(report.table.column_names().into_iter().map(str::to_string));
    csv_writer.write_record(&header)?;

    for (row, values) in report.table.rows().enumerate() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(report.row_label(row));
        record.extend(values.into_iter().map(|v| {
            if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            }
        }));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'a str,
    rows: usize,
    index: Option<&'a [String]>,
    columns: &'a ResultTable<f64>,
}

/// Write the table as pretty-printed JSON with `null` for missing values.
///
/// # Errors
///
/// Returns [`ServiceError::Json`] when serialization or writing fails.
pub fn write_json<W: Write>(report: &Report<'_>, mut writer: W) -> Result<()> {
    let body = JsonReport {
        label: report.label,
        rows: report.table.len(),
        index: report.row_labels,
        columns: report.table,
    };
    serde_json::to_writer_pretty(&mut writer, &body)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a report in the requested format.
///
/// # Errors
///
/// Propagates the format's write errors.
pub fn write_report<W: Write>(format: OutputFormat, report: &Report<'_>, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writer.write_all(render_text(report).as_bytes())?;
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(report, writer),
        OutputFormat::Json => write_json(report, writer),
    }
}

/// Appends text blocks to a report file, creating it when needed.
#[derive(Debug, Clone)]
pub struct TextReportSink {
    path: PathBuf,
}

impl TextReportSink {
    /// Sink appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for TextReportSink {
    fn write(&mut self, report: &Report<'_>) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ServiceError::io(&self.path, e))?;
        write_report(OutputFormat::Text, report, BufWriter::new(file))?;
        tracing::debug!(path = %self.path.display(), label = report.label, "appended text report");
        Ok(())
    }
}

/// Rewrites a CSV file with the latest table.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for CsvSink {
    fn write(&mut self, report: &Report<'_>) -> Result<()> {
        let file = create(&self.path)?;
        write_report(OutputFormat::Csv, report, BufWriter::new(file))?;
        tracing::debug!(path = %self.path.display(), rows = report.table.len(), "wrote csv table");
        Ok(())
    }
}

/// Rewrites a JSON file with the latest table.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonSink {
    fn write(&mut self, report: &Report<'_>) -> Result<()> {
        let file = create(&self.path)?;
        write_report(OutputFormat::Json, report, BufWriter::new(file))?;
        tracing::debug!(path = %self.path.display(), rows = report.table.len(), "wrote json table");
        Ok(())
    }
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| ServiceError::io(path, e))
}

/// File sink for `format`.
pub fn file_sink(format: OutputFormat, path: impl Into<PathBuf>) -> Box<dyn ResultSink> {
    match format {
        OutputFormat::Text => Box::new(TextReportSink::new(path)),
        OutputFormat::Csv => Box::new(CsvSink::new(path)),
        OutputFormat::Json => Box::new(JsonSink::new(path)),
    }
}

/// A report captured by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct RecordedReport {
    /// Report label.
    pub label: String,
    /// Row labels, if any.
    pub row_labels: Option<Vec<String>>,
    /// The table.
    pub table: ResultTable<f64>,
}

/// Keeps every report in memory. Clones share the same storage, so a test can
/// keep one clone while the monitor owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<RecordedReport>>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every report received so far.
    pub fn reports(&self) -> Vec<RecordedReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of reports received so far.
    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` when nothing was received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn write(&mut self, report: &Report<'_>) -> Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedReport {
                label: report.label.to_string(),
                row_labels: report.row_labels.map(<[String]>::to_vec),
                table: report.table.clone(),
            });
        Ok(())
    }
}
