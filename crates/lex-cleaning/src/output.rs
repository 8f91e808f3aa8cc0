//! Output rendering for cleaned tables.
//!
//! A cleaned table leaves the crate in one of two shapes:
//!
//! - a JSON preview: the first [`PREVIEW_ROWS`] rows as column-ordered records
//! - the full table as CSV bytes with a header row

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde_json::{Number, Value};

/// Number of rows returned by a preview.
pub const PREVIEW_ROWS: usize = 10;

/// Suggested file name for a full CSV download.
pub const CLEANED_FILE_NAME: &str = "cleaned.csv";

/// Media type of a full CSV download.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// One preview row, keyed by column name in table column order.
pub type RowRecord = serde_json::Map<String, Value>;

/// Render the first `limit` rows as records.
///
/// Missing values become JSON `null`; so do non-finite floats.
pub fn preview_records(df: &DataFrame, limit: usize) -> Vec<RowRecord> {
    let head = df.head(Some(limit));
    let columns = head.get_columns();

    (0..head.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| {
                    let value = col
                        .get(row_idx)
                        .ok()
                        .map_or(Value::Null, any_value_to_json);
                    (col.name().to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// Serialize the full table as CSV with a header row.
///
/// Missing values are written as empty fields.
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut table = df.clone();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut table)
        .context("Failed to write CSV output")?;

    Ok(buffer)
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Number(i.into()),
        AnyValue::Int16(i) => Value::Number(i.into()),
        AnyValue::Int32(i) => Value::Number(i.into()),
        AnyValue::Int64(i) => Value::Number(i.into()),
        AnyValue::UInt8(u) => Value::Number(u.into()),
        AnyValue::UInt16(u) => Value::Number(u.into()),
        AnyValue::UInt32(u) => Value::Number(u.into()),
        AnyValue::UInt64(u) => Value::Number(u.into()),

        AnyValue::Float32(f) => Number::from_f64(f as f64).map_or(Value::Null, Value::Number),
        AnyValue::Float64(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),

        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),

        // Dates, durations and nested values fall back to their display form
        other => Value::String(other.to_string()),
    }
}
