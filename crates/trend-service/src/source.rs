//! Upstream series sources.
//!
//! A [`SeriesSource`] is polled once per monitoring cycle. `Ok(None)` means
//! "nothing to analyze this time" and makes the cycle a skip, not a failure.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use trend_core::Series;

use crate::error::{Result, ServiceError};

/// Key holding the date labels in object-shaped source files.
pub const DATES_KEY: &str = "dates";

/// One fetched series plus optional position labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Label for each position (usually a date), when the source has them.
    pub labels: Option<Vec<String>>,
    /// Observations, NaN for missing.
    pub values: Series<f64>,
}

impl Snapshot {
    /// Snapshot without labels.
    pub fn new(values: impl Into<Series<f64>>) -> Self {
        Self {
            labels: None,
            values: values.into(),
        }
    }

    /// Attach position labels.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when there are no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Provider of fresh series data.
pub trait SeriesSource: Send {
    /// Fetch the current series.
    ///
    /// # Errors
    ///
    /// Returns an error when the source exists but cannot be read or parsed.
    fn fetch(&mut self) -> Result<Option<Snapshot>>;

    /// Short description used in log events.
    fn describe(&self) -> String;
}

impl<S: SeriesSource + ?Sized> SeriesSource for Box<S> {
    fn fetch(&mut self) -> Result<Option<Snapshot>> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Series stored in a JSON file that is re-read on every fetch.
///
/// Two layouts are accepted:
///
/// - an array of numbers, with `null` for missing values:
///   `[41, 45, null, 52]`
/// - an object with an optional `"dates"` array and one array per keyword:
///   `{"dates": ["2024-01-07", "2024-01-14"], "rust": [41, 45]}`
///
/// A missing file or an empty series is reported as `Ok(None)`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    keyword: Option<String>,
}

impl JsonFileSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keyword: None,
        }
    }

    /// Select the keyword column of an object-shaped file.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// File being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file once.
    ///
    /// # Errors
    ///
    /// Returns an error for unreadable files, invalid JSON or an unusable
    /// layout. A missing file is `Ok(None)`.
    pub fn read(&self) -> Result<Option<Snapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "source file not found");
                return Ok(None);
            }
            Err(e) => return Err(ServiceError::io(&self.path, e)),
        };

        let document: Value = serde_json::from_str(&text)?;
        let snapshot = parse_document(&document, self.keyword.as_deref())?;
        Ok(snapshot.filter(|s| !s.is_empty()))
    }
}

impl SeriesSource for JsonFileSource {
    fn fetch(&mut self) -> Result<Option<Snapshot>> {
        self.read()
    }

    fn describe(&self) -> String {
        match &self.keyword {
            Some(keyword) => format!("{} [{keyword}]", self.path.display()),
            None => self.path.display().to_string(),
        }
    }
}

/// Turn a parsed document into a snapshot.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidSource`] when the layout is not one of the
/// accepted shapes.
pub fn parse_document(document: &Value, keyword: Option<&str>) -> Result<Option<Snapshot>> {
    match document {
        Value::Array(items) => Ok(Some(Snapshot::new(parse_values(items, "series")?))),
        Value::Object(map) => {
            let column = match keyword {
                Some(keyword) => map.get(keyword).ok_or_else(|| {
                    ServiceError::invalid_source(format!("keyword '{keyword}' not present"))
                })?,
                None => {
                    let mut candidates = map.iter().filter(|(k, _)| k.as_str() != DATES_KEY);
                    match (candidates.next(), candidates.next()) {
                        (Some((_, column)), None) => column,
                        (None, _) => return Ok(None),
                        (Some(_), Some(_)) => {
                            return Err(ServiceError::invalid_source(
                                "several keyword columns present; choose one with a keyword",
                            ))
                        }
                    }
                }
            };

            let items = column
                .as_array()
                .ok_or_else(|| ServiceError::invalid_source("keyword column is not an array"))?;
            let values = parse_values(items, keyword.unwrap_or("series"))?;

            let labels = match map.get(DATES_KEY) {
                Some(Value::Array(dates)) => Some(parse_labels(dates, values.len())?),
                Some(_) => return Err(ServiceError::invalid_source("'dates' is not an array")),
                None => None,
            };

            Ok(Some(Snapshot {
                labels,
                values,
            }))
        }
        _ => Err(ServiceError::invalid_source(
            "expected an array of numbers or an object of columns",
        )),
    }
}

fn parse_values(items: &[Value], name: &str) -> Result<Series<f64>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Null => Ok(f64::NAN),
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                ServiceError::invalid_source(format!("{name}[{i}] is out of range"))
            }),
            other => Err(ServiceError::invalid_source(format!(
                "{name}[{i}] is not a number: {other}"
            ))),
        })
        .collect()
}

fn parse_labels(dates: &[Value], expected: usize) -> Result<Vec<String>> {
    if dates.len() != expected {
        return Err(ServiceError::invalid_source(format!(
            "'dates' has {} entries but the series has {expected}",
            dates.len()
        )));
    }
    Ok(dates
        .iter()
        .map(|d| match d {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}

/// In-memory source for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticSource {
    script: VecDeque<Vec<f64>>,
    repeat: Option<Vec<f64>>,
}

impl StaticSource {
    /// Return the same values on every fetch.
    pub fn repeating(values: Vec<f64>) -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Some(values),
        }
    }

    /// Return each batch once, in order, then nothing. An empty batch is a
    /// skipped cycle.
    pub fn scripted(batches: Vec<Vec<f64>>) -> Self {
        Self {
            script: batches.into(),
            repeat: None,
        }
    }
}

impl SeriesSource for StaticSource {
    fn fetch(&mut self) -> Result<Option<Snapshot>> {
        let values = match self.script.pop_front() {
            Some(batch) => batch,
            None => match &self.repeat {
                Some(values) => values.clone(),
                None => return Ok(None),
            },
        };
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Snapshot::new(values)))
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_with_nulls() {
        let snapshot = parse_document(&json!([1, 2.5, null]), None).unwrap().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.values[1], 2.5);
        assert!(snapshot.values[2].is_nan());
        assert!(snapshot.labels.is_none());
    }

    #[test]
    fn test_parse_object_with_keyword_and_dates() {
        let doc = json!({"dates": ["a", "b"], "rust": [3, 4], "go": [5, 6]});
        let snapshot = parse_document(&doc, Some("rust")).unwrap().unwrap();
        assert_eq!(snapshot.values.as_slice(), &[3.0, 4.0]);
        assert_eq!(snapshot.labels, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_parse_object_single_column_without_keyword() {
        let doc = json!({"dates": ["a"], "rust": [1]});
        let snapshot = parse_document(&doc, None).unwrap().unwrap();
        assert_eq!(snapshot.values.as_slice(), &[1.0]);
    }

    #[test]
    fn test_parse_errors() {
        let ambiguous = json!({"rust": [1], "go": [2]});
        assert!(matches!(
            parse_document(&ambiguous, None),
            Err(ServiceError::InvalidSource(_))
        ));

        assert!(parse_document(&json!({"rust": [1]}), Some("go")).is_err());
        assert!(parse_document(&json!(["x"]), None).is_err());
        assert!(parse_document(&json!(42), None).is_err());
        assert!(parse_document(&json!({"dates": ["a", "b"], "rust": [1]}), None).is_err());
    }

    #[test]
    fn test_object_without_columns_is_empty() {
        assert!(parse_document(&json!({"dates": []}), None).unwrap().is_none());
    }

    #[test]
    fn test_static_source_script() {
        let mut source = StaticSource::scripted(vec![vec![], vec![1.0, 2.0]]);
        assert!(source.fetch().unwrap().is_none());
        assert_eq!(source.fetch().unwrap().unwrap().len(), 2);
        assert!(source.fetch().unwrap().is_none());
    }

    #[test]
    fn test_static_source_repeating() {
        let mut source = StaticSource::repeating(vec![1.0]);
        for _ in 0..3 {
            assert!(source.fetch().unwrap().is_some());
        }
    }
}
