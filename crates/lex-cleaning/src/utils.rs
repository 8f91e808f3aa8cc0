//! Shared utilities for the cleaning operations.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Column without any non-missing value (inferred as `Null`)
    Null,
    /// Other/unknown types
    Other,
}

impl DtypeCategory {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// Check if a DataType is an integer.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_integer_dtype(dtype) {
        DtypeCategory::Integer
    } else if is_numeric_dtype(dtype) {
        DtypeCategory::Float
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else if matches!(dtype, DataType::Null) {
        DtypeCategory::Null
    } else {
        DtypeCategory::Other
    }
}

/// Column names of a table, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Build a table from `columns`, keeping `height` rows even when no column is left.
pub fn assemble_table(height: usize, columns: Vec<Column>) -> PolarsResult<DataFrame> {
    if columns.is_empty() {
        return Ok(DataFrame::empty_with_height(height));
    }
    DataFrame::new(columns)
}

/// Error unless every name is a column of `df`. Reports the first missing one.
pub fn ensure_columns_exist<'a>(
    df: &DataFrame,
    names: impl IntoIterator<Item = &'a String>,
) -> crate::error::Result<()> {
    match names
        .into_iter()
        .find(|name| df.get_column_index(name.as_str()).is_none())
    {
        Some(missing) => Err(crate::error::CleaningError::ColumnNotFound(missing.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// Value Utilities
// =============================================================================

/// Textual form of every entry of a Series, `None` for missing entries.
///
/// Distinctness for mode and encoding is decided on this form, so `1` in an
/// integer column and `"1"` in a string column are the same category.
pub fn text_keys(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::String)?;
    Ok(as_text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Distinct non-missing keys in first-seen order.
pub fn distinct_in_order(keys: &[Option<String>]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for key in keys.iter().flatten() {
        if seen.insert(key.as_str()) {
            ordered.push(key.as_str());
        }
    }
    ordered
}

/// Row index of the mode (most frequent non-missing value) of a Series.
///
/// Ties go to the value that occurs first. Returns `None` when every entry
/// is missing.
pub fn mode_index(series: &Series) -> PolarsResult<Option<usize>> {
    let keys = text_keys(series)?;

    // key -> (count, first row)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            counts.entry(key.as_str()).or_insert((0, idx)).0 += 1;
        }
    }

    Ok(counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, first_row)| first_row))
}

/// Replace the missing entries of `series` with the first value of `fill`.
///
/// `fill` is cast to the dtype of `series`; callers choose the target dtype
/// beforehand when a widening (e.g. integer to float) is intended.
pub fn fill_nulls_with(series: &Series, fill: &Series) -> PolarsResult<Series> {
    let fill = fill.cast(series.dtype())?.new_from_index(0, series.len());
    let filled = series.zip_with(&series.is_not_null(), &fill)?;
    Ok(filled.with_name(series.name().clone()))
}

/// Turn floating-point NaN entries into missing entries. Other dtypes pass through.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    if !series.dtype().is_float() {
        return Ok(series.clone());
    }

    let is_nan = series.is_nan()?;
    if !is_nan.any() {
        return Ok(series.clone());
    }

    let nulls = Series::full_null(series.name().clone(), series.len(), series.dtype());
    Ok(series.zip_with(&!is_nan, &nulls)?.with_name(series.name().clone()))
}

/// Render a number the way it would be typed in a CSV cell:
/// integral values lose the trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Boolean Detection Utilities
// =============================================================================

/// Common boolean true representations.
pub const BOOLEAN_TRUE_VALUES: [&str; 6] = ["true", "yes", "1", "t", "y", "on"];

/// Common boolean false representations.
pub const BOOLEAN_FALSE_VALUES: [&str; 6] = ["false", "no", "0", "f", "n", "off"];

/// Parse a form-style boolean, `None` when the text is not a boolean.
pub fn parse_boolean_str(s: &str) -> Option<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
