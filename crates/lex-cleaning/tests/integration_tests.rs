//! Integration tests for the cleaning pipeline.
//!
//! These tests run the public API end to end against small CSV fixtures.

use lex_cleaning::output::{PREVIEW_ROWS, preview_records, to_csv_bytes};
use lex_cleaning::{
    CleaningConfig, CleaningError, CleaningPipeline, CleaningStage, ConfigValidationError,
    EncodeMethod, FillStrategy, apply_cleaning, parse_table,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_bytes(filename: &str) -> Vec<u8> {
    std::fs::read(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn load_config(filename: &str) -> CleaningConfig {
    let raw = std::fs::read_to_string(fixtures_path().join(filename))
        .expect("Failed to read config fixture");
    CleaningConfig::from_json_str(&raw).expect("Invalid config fixture")
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

fn i64_column(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn str_column(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

// ============================================================================
// Identity and Ordering
// ============================================================================

#[test]
fn test_empty_config_returns_parsed_table() {
    let raw = load_bytes("people.csv");

    let cleaned = apply_cleaning(&raw, &CleaningConfig::default()).unwrap();
    let parsed = parse_table(&raw).unwrap();

    assert!(cleaned.equals_missing(&parsed));
}

#[test]
fn test_key_order_in_document_does_not_matter() {
    let raw = load_bytes("people.csv");
    let a = CleaningConfig::from_json_str(
        r#"{"drop": ["id"], "fillna": {"strategy": "constant", "value": 1}}"#,
    )
    .unwrap();
    let b = CleaningConfig::from_json_str(
        r#"{"fillna": {"value": 1, "strategy": "constant"}, "drop": ["id"]}"#,
    )
    .unwrap();

    let left = apply_cleaning(&raw, &a).unwrap();
    let right = apply_cleaning(&raw, &b).unwrap();

    assert!(left.equals_missing(&right));
}

#[test]
fn test_full_config_runs_every_stage_in_order() {
    let raw = load_bytes("people.csv");
    let config = load_config("full_config.json");

    let result = CleaningPipeline::new(config).process_bytes(&raw).unwrap();

    assert_eq!(
        result.summary.stages_applied,
        vec![
            CleaningStage::Dropped,
            CleaningStage::Renamed,
            CleaningStage::Filled,
            CleaningStage::Encoded,
        ]
    );
    assert_eq!(names(&result.table), vec!["age", "town_NY", "town_LA"]);
    assert_eq!(i64_column(&result.table, "age"), vec![Some(30), Some(30), Some(25)]);
    assert_eq!(
        i64_column(&result.table, "town_NY"),
        vec![Some(1), Some(1), Some(0)]
    );
    assert_eq!(
        i64_column(&result.table, "town_LA"),
        vec![Some(0), Some(0), Some(1)]
    );
}

// ============================================================================
// Drop and Rename
// ============================================================================

#[test]
fn test_drop_keeps_remaining_order() {
    let raw = load_bytes("people.csv");
    let config = CleaningConfig::builder().drop(["age"]).build().unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(names(&cleaned), vec!["id", "city"]);
    assert_eq!(cleaned.height(), 3);
}

#[test]
fn test_rename_keeps_values() {
    let raw = load_bytes("people.csv");
    let config = CleaningConfig::builder()
        .rename("city", "town")
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(names(&cleaned), vec!["id", "age", "town"]);
    assert_eq!(
        str_column(&cleaned, "town"),
        vec![Some("NY".to_string()), None, Some("LA".to_string())]
    );
}

// ============================================================================
// Fill Strategies
// ============================================================================

#[test]
fn test_drop_then_constant_fill() {
    let raw = load_bytes("people.csv");
    let config = CleaningConfig::from_json_str(
        r#"{"drop": ["city"], "fillna": {"strategy": "constant", "value": 0}}"#,
    )
    .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(names(&cleaned), vec!["id", "age"]);
    assert_eq!(i64_column(&cleaned, "id"), vec![Some(1), Some(2), Some(3)]);
    assert_eq!(i64_column(&cleaned, "age"), vec![Some(0), Some(30), Some(25)]);
}

#[test]
fn test_constant_fill_reaches_text_columns() {
    let raw = load_bytes("people.csv");
    let config = CleaningConfig::builder()
        .fillna(FillStrategy::Constant, Some(0.0))
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(
        str_column(&cleaned, "city"),
        vec![Some("NY".to_string()), Some("0".to_string()), Some("LA".to_string())]
    );
}

#[test]
fn test_mean_fill_only_touches_numeric_columns() {
    let raw = load_bytes("scores.csv");
    let config = CleaningConfig::builder()
        .fillna(FillStrategy::Mean, None)
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    let scores = f64_column(&cleaned, "score");
    assert_eq!(scores[0], Some(1.0));
    assert!((scores[1].unwrap() - 14.0 / 3.0).abs() < 1e-9);
    assert_eq!(scores[3], Some(10.0));
    assert_eq!(cleaned.column("grade").unwrap().null_count(), 1);
}

#[test]
fn test_median_fill() {
    let raw = load_bytes("scores.csv");
    let config = CleaningConfig::builder()
        .fillna(FillStrategy::Median, None)
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(
        f64_column(&cleaned, "score"),
        vec![Some(1.0), Some(3.0), Some(3.0), Some(10.0)]
    );
}

#[test]
fn test_mode_fill_every_column() {
    let raw = load_bytes("scores.csv");
    let config = CleaningConfig::builder()
        .fillna(FillStrategy::Mode, None)
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    // All scores are distinct, so the first one seen wins
    assert_eq!(
        i64_column(&cleaned, "score"),
        vec![Some(1), Some(1), Some(3), Some(10)]
    );
    assert_eq!(str_column(&cleaned, "grade")[2], Some("A".to_string()));
    assert_eq!(cleaned.column("grade").unwrap().null_count(), 0);
}

#[test]
fn test_fill_is_idempotent() {
    let raw = load_bytes("scores.csv");
    let config = CleaningConfig::builder()
        .fillna(FillStrategy::Mode, None)
        .build()
        .unwrap();
    let pipeline = CleaningPipeline::new(config);

    let once = pipeline.process_bytes(&raw).unwrap().table;
    let twice = pipeline.process(&once).unwrap().table;

    assert!(once.equals_missing(&twice));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_label_encoding_first_seen_order() {
    let raw = load_bytes("colors.csv");
    let config = CleaningConfig::builder()
        .encode(["color"], EncodeMethod::Label)
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(
        i64_column(&cleaned, "color"),
        vec![Some(0), Some(1), Some(0), Some(2)]
    );
}

#[test]
fn test_onehot_encoding() {
    let raw = load_bytes("colors.csv");
    let config = CleaningConfig::builder()
        .encode(["color"], EncodeMethod::OneHot)
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();

    assert_eq!(
        names(&cleaned),
        vec!["color_red", "color_blue", "color_green"]
    );
    assert_eq!(
        i64_column(&cleaned, "color_red"),
        vec![Some(1), Some(0), Some(1), Some(0)]
    );
    assert_eq!(
        i64_column(&cleaned, "color_green"),
        vec![Some(0), Some(0), Some(0), Some(1)]
    );
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_csv_output() {
    let raw = load_bytes("people.csv");
    let config = CleaningConfig::builder()
        .drop(["city"])
        .fillna(FillStrategy::Constant, Some(0.0))
        .build()
        .unwrap();

    let cleaned = apply_cleaning(&raw, &config).unwrap();
    let csv = String::from_utf8(to_csv_bytes(&cleaned).unwrap()).unwrap();

    assert_eq!(csv, "id,age\n1,0\n2,30\n3,25\n");
}

#[test]
fn test_preview_output() {
    let raw = load_bytes("people.csv");

    let cleaned = apply_cleaning(&raw, &CleaningConfig::default()).unwrap();
    let records = preview_records(&cleaned, PREVIEW_ROWS);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["city"], serde_json::json!("NY"));
    assert_eq!(records[0]["age"], serde_json::Value::Null);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_columns_are_reported() {
    let raw = load_bytes("people.csv");
    let configs = [
        r#"{"drop": ["zip"]}"#,
        r#"{"rename": {"zip": "postal"}}"#,
        r#"{"encode": {"columns": ["zip"], "method": "label"}}"#,
    ];

    for doc in configs {
        let config = CleaningConfig::from_json_str(doc).unwrap();
        let err = apply_cleaning(&raw, &config).unwrap_err();
        assert!(
            matches!(err, CleaningError::ColumnNotFound(ref c) if c == "zip"),
            "unexpected error for {}: {:?}",
            doc,
            err
        );
    }
}

#[test]
fn test_invalid_config_documents() {
    let err = CleaningConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ConfigValidationError::Syntax(_)));

    let err = CleaningConfig::from_json_str(r#"{"encode": {"columns": ["a"], "method": "binary"}}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigValidationError::Schema(_)));
}

#[test]
fn test_malformed_csv_is_parse_error() {
    let err = apply_cleaning(b"a,b\n1,2,3\n", &CleaningConfig::default()).unwrap_err();
    assert!(matches!(err, CleaningError::Parse(_)));
    assert_eq!(err.error_code(), "PARSE_ERROR");
}
