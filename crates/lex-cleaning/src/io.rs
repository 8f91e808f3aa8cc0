//! Reading raw tabular bytes into a [`DataFrame`].

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Field texts read as missing values, in addition to empty fields.
pub const MISSING_VALUE_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse comma-separated text (with a header row) into a DataFrame.
///
/// - Empty fields and [`MISSING_VALUE_MARKERS`] are missing values.
/// - Column types are inferred from every row, not a sample, so a late
///   non-numeric entry turns the column into text instead of failing.
/// - A row with more fields than the header is an error; a row with fewer
///   fields has its trailing cells set to missing.
pub fn parse_table(raw: &[u8]) -> Result<DataFrame> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| CleaningError::Parse(format!("input is not valid UTF-8 ({})", e)))?;

    if text.trim().is_empty() {
        return Err(CleaningError::Parse("no columns to parse from input".to_string()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(missing_markers())),
        )
        .into_reader_with_file_handle(Cursor::new(raw.to_vec()))
        .finish()
        .map_err(|e| CleaningError::Parse(e.to_string()))?;

    debug!("Parsed table with shape {:?}", df.shape());
    Ok(df)
}

fn missing_markers() -> NullValues {
    NullValues::AllColumns(MISSING_VALUE_MARKERS.iter().map(|m| (*m).into()).collect())
}
