//! Reference table tests for trend-analysis.
//!
//! These tests compare full result tables against hand-computed values stored
//! in `tests/fixtures/reference_tables.json`.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use trend_analysis::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    cases: Vec<ReferenceCase>,
}

/// One input series with the expected derived columns.
#[derive(Debug, Deserialize)]
struct ReferenceCase {
    name: String,
    window_size: usize,
    /// Input values, `null` for missing.
    input: Vec<Option<f64>>,
    /// Expected columns by table name, `null` for missing.
    expected: HashMap<String, Vec<Option<f64>>>,
}

impl ReferenceCase {
    fn input_series(&self) -> Series<f64> {
        self.input.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

fn fixture_path(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn load_cases() -> Vec<ReferenceCase> {
    let path = fixture_path("reference_tables.json");
    let file = File::open(&path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()));
    let parsed: ReferenceFile = serde_json::from_reader(BufReader::new(file)).expect("valid fixture");
    parsed.cases
}

/// Assert two floats are approximately equal, treating NaN as equal to NaN.
fn assert_float_eq(actual: f64, expected: Option<f64>, epsilon: f64, context: &str) {
    match expected {
        None => assert!(actual.is_nan(), "{context}: expected missing but got {actual}"),
        Some(exp) => {
            assert!(!actual.is_nan(), "{context}: got missing but expected {exp}");
            let diff = (actual - exp).abs();
            assert!(
                diff < epsilon,
                "{context}: expected {exp} but got {actual} (diff: {diff:.2e})"
            );
        }
    }
}

fn assert_column_eq(actual: &Series<f64>, expected: &[Option<f64>], context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch: {} vs {}",
        actual.len(),
        expected.len()
    );
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert_float_eq(a, e, 1e-12, &format!("{context}[{i}]"));
    }
}

// ============================================================================
// Full Table
// ============================================================================

#[test]
fn test_reference_tables() {
    let cases = load_cases();
    assert!(!cases.is_empty());

    for case in &cases {
        let analyzer = SeriesAnalyzer::new(case.input_series());
        let config = AnalysisConfig::default().with_window_size(case.window_size);
        let table = analyzer.results_with(&config).unwrap();

        assert_eq!(table.column_count(), 6, "{}", case.name);
        assert!(table
            .get(ORIGINAL_DATA)
            .unwrap()
            .same_as(&case.input_series()));

        for (column, expected) in &case.expected {
            let actual = table
                .get(column)
                .unwrap_or_else(|| panic!("{}: no column '{column}'", case.name));
            assert_column_eq(actual, expected, &format!("{}/{column}", case.name));
        }
    }
}

#[test]
fn test_reference_operations_match_table() {
    for case in load_cases() {
        let analyzer = SeriesAnalyzer::new(case.input_series());
        let args = CallArgs::new().named("window_size", case.window_size);

        for op in Operation::ALL {
            let call_args = if op.params().is_empty() {
                CallArgs::new()
            } else {
                args.clone()
            };
            let actual = analyzer.invoke(op, &call_args).unwrap();
            let expected = &case.expected[op.column_name()];
            assert_column_eq(&actual, expected, &format!("{}/{op}", case.name));
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_full_table_from_five_values() {
    let analyzer = SeriesAnalyzer::new(vec![1.0f64, 2.0, 3.0, 4.0, 5.0]);
    let table = analyzer.results().unwrap();

    assert_eq!(
        table.column_names(),
        vec![
            "Original Data",
            "Moving Average",
            "Differential",
            "Maxima",
            "Minima",
            "Autocorrelation"
        ]
    );
    assert!(table.iter().all(|(_, column)| column.len() == 5));
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let analyzer = SeriesAnalyzer::new(vec![0.1f64, 0.7, -0.3, 2.2, 1.9, f64::NAN, 0.4, 3.3]);

    let first = analyzer.results().unwrap();
    let second = analyzer.results().unwrap();

    for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
        let a_bits: Vec<u64> = a.iter().map(|x| x.to_bits()).collect();
        let b_bits: Vec<u64> = b.iter().map(|x| x.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }
}

#[test]
fn test_guard_blocks_non_numeric_window() {
    let analyzer = SeriesAnalyzer::new(vec![1.0f64, 2.0, 3.0]);
    let err = analyzer
        .invoke(
            Operation::MovingAverage,
            &CallArgs::new().named("window_size", "abc"),
        )
        .unwrap_err();

    assert_eq!(
        err,
        AnalysisError::InvalidArgument {
            key: ArgKey::name("window_size"),
            value: "\"abc\"".to_string(),
            expected: "real number",
        }
    );
}

#[test]
fn test_moving_average_iter_matches_batch() {
    let analyzer = SeriesAnalyzer::new(vec![5.0f64, 1.0, 4.0, 2.0, 3.0, 6.0]);
    let batch = analyzer.moving_average(3).unwrap();

    let replayed: Series<f64> = analyzer.moving_average_iter(3).unwrap().collect();
    assert!(replayed.same_as(&batch));

    let again: Vec<f64> = analyzer.moving_average_iter(3).unwrap().take(3).collect();
    assert!(again[0].is_nan());
    assert!(again[1].is_nan());
    assert_eq!(again[2], batch[2]);
}

#[test]
fn test_f32_session() {
    let analyzer = SeriesAnalyzer::<f32>::new(vec![1.0f32, 3.0, 2.0, 4.0]);
    let table = analyzer.results().unwrap();
    assert_eq!(table.get(MAXIMA).unwrap()[1], 3.0f32);
    assert_eq!(table.get(MINIMA).unwrap()[2], 2.0f32);
}
