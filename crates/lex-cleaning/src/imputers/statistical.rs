//! Statistical imputation methods.
//!
//! Provides mean, median, mode, and constant fill strategies.

use crate::config::{FillNaConfig, FillStrategy};
use crate::error::Result;
use crate::utils::{
    DtypeCategory, assemble_table, fill_nulls_with, format_number, get_dtype_category,
    is_numeric_dtype, mode_index, nan_to_null,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Largest magnitude for which an integral constant keeps an integer column integral.
const MAX_EXACT_INTEGER: f64 = 9.0e15;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the missing entries of a table according to `fillna`.
    ///
    /// Only columns that contain at least one missing entry are touched. A
    /// floating-point NaN is a missing entry.
    ///
    /// Column eligibility differs per strategy and the difference is intended:
    /// - `mean` / `median` fill numeric columns only; the column becomes `Float64`.
    /// - `mode` fills every column with its most frequent value, keeping the dtype.
    /// - `constant` fills every column. Integer columns stay integer when the
    ///   value is integral, text columns receive the value's textual form and
    ///   boolean columns receive `value != 0`. Without a value nothing is filled.
    pub fn fill_missing_values(
        df: &DataFrame,
        fillna: &FillNaConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        if fillna.strategy == FillStrategy::Constant && fillna.value.is_none() {
            warn!("Constant fill requested without a value; no entries will be replaced");
            processing_steps.push("Skipped constant fill: no value configured".to_string());
            return Ok(df.clone());
        }

        // NaN counts as missing
        let normalized = df
            .get_columns()
            .iter()
            .map(|col| nan_to_null(col.as_materialized_series()))
            .collect::<PolarsResult<Vec<Series>>>()?;

        let columns_with_missing = normalized
            .iter()
            .filter(|series| series.null_count() > 0)
            .count();
        info!(
            "Filling missing values with strategy '{}' ({} column(s) with missing entries)",
            fillna.strategy, columns_with_missing
        );

        let mut columns = Vec::with_capacity(df.width());
        for (col, series) in df.get_columns().iter().zip(&normalized) {
            if series.null_count() == 0 {
                columns.push(col.clone());
                continue;
            }

            let filled = match (fillna.strategy, fillna.value) {
                (FillStrategy::Mean, _) => Self::apply_numeric_mean(series, processing_steps)?,
                (FillStrategy::Median, _) => Self::apply_numeric_median(series, processing_steps)?,
                (FillStrategy::Mode, _) => Self::apply_mode_imputation(series, processing_steps)?,
                (FillStrategy::Constant, Some(value)) => {
                    Self::apply_constant_imputation(series, value, processing_steps)?
                }
                (FillStrategy::Constant, None) => None,
            };

            columns.push(Column::from(filled.unwrap_or_else(|| series.clone())));
        }

        Ok(assemble_table(df.height(), columns)?)
    }

    /// Mean imputation for a numeric column; `None` if the column is skipped.
    pub fn apply_numeric_mean(
        series: &Series,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Series>> {
        if !is_numeric_dtype(series.dtype()) {
            debug!("Skipping non-numeric column '{}' for mean fill", series.name());
            return Ok(None);
        }
        match series.mean() {
            Some(mean_val) => Self::fill_with_value(series, mean_val, processing_steps, "mean"),
            None => Ok(None),
        }
    }

    /// Median imputation for a numeric column; `None` if the column is skipped.
    pub fn apply_numeric_median(
        series: &Series,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Series>> {
        if !is_numeric_dtype(series.dtype()) {
            debug!("Skipping non-numeric column '{}' for median fill", series.name());
            return Ok(None);
        }
        match series.median() {
            Some(median_val) => {
                Self::fill_with_value(series, median_val, processing_steps, "median")
            }
            None => Ok(None),
        }
    }

    /// Mode imputation for any column. Ties go to the value seen first.
    pub fn apply_mode_imputation(
        series: &Series,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Series>> {
        let Some(row) = mode_index(series)? else {
            debug!("Column '{}' has no values to take a mode from", series.name());
            return Ok(None);
        };

        let mode = series.slice(row as i64, 1);
        let filled = fill_nulls_with(series, &mode)?;

        processing_steps.push(format!(
            "Filled '{}' with mode: {}",
            series.name(),
            mode.get(0)?
        ));

        Ok(Some(filled))
    }

    /// Constant imputation for any column of a supported dtype.
    pub fn apply_constant_imputation(
        series: &Series,
        value: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<Series>> {
        let filled = match get_dtype_category(series.dtype()) {
            DtypeCategory::Integer
                if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER =>
            {
                let as_int = series.cast(&DataType::Int64)?;
                fill_nulls_with(&as_int, &Series::new("fill".into(), &[value as i64]))?
            }
            DtypeCategory::Integer | DtypeCategory::Float => {
                let as_float = series.cast(&DataType::Float64)?;
                fill_nulls_with(&as_float, &Series::new("fill".into(), &[value]))?
            }
            DtypeCategory::Boolean => {
                fill_nulls_with(series, &Series::new("fill".into(), &[value != 0.0]))?
            }
            DtypeCategory::String | DtypeCategory::Null => {
                let as_text = series.cast(&DataType::String)?;
                let text = format_number(value);
                fill_nulls_with(&as_text, &Series::new("fill".into(), &[text.as_str()]))?
            }
            DtypeCategory::Other => {
                warn!(
                    "Column '{}' has unsupported dtype {:?} for constant fill; left unchanged",
                    series.name(),
                    series.dtype()
                );
                return Ok(None);
            }
        };

        processing_steps.push(format!(
            "Filled '{}' with constant value: {}",
            series.name(),
            format_number(value)
        ));

        Ok(Some(filled))
    }

    /// Fill a numeric column with a specific value, widening it to `Float64`.
    fn fill_with_value(
        series: &Series,
        fill_value: f64,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) -> Result<Option<Series>> {
        let as_float = series.cast(&DataType::Float64)?;
        let filled = fill_nulls_with(&as_float, &Series::new("fill".into(), &[fill_value]))?;

        processing_steps.push(format!(
            "Filled '{}' with {}: {:.2}",
            series.name(),
            method,
            fill_value
        ));

        Ok(Some(filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fillna(strategy: FillStrategy, value: Option<f64>) -> FillNaConfig {
        FillNaConfig { strategy, value }
    }

    fn mixed_df() -> DataFrame {
        df![
            "id" => [1i64, 2, 3, 4],
            "score" => [Some(1.0), None, Some(5.0), None],
            "count" => [Some(2i64), Some(4), None, Some(4)],
            "city" => [Some("NY"), None, Some("LA"), Some("LA")],
        ]
        .unwrap()
    }

    fn f64_at(df: &DataFrame, column: &str, row: usize) -> f64 {
        df.column(column)
            .unwrap()
            .get(row)
            .unwrap()
            .try_extract::<f64>()
            .unwrap()
    }

    fn str_at(df: &DataFrame, column: &str, row: usize) -> Option<String> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    // ========================================================================
    // mean / median
    // ========================================================================

    #[test]
    fn test_mean_fills_numeric_only() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Mean, None),
            &mut steps,
        )
        .unwrap();

        // Mean of [1, 5] = 3
        assert_eq!(f64_at(&result, "score", 1), 3.0);
        assert_eq!(f64_at(&result, "score", 3), 3.0);
        assert_eq!(result.column("count").unwrap().null_count(), 0);
        assert_eq!(result.column("count").unwrap().dtype(), &DataType::Float64);
        // Mean of [2, 4, 4] = 3.33
        assert!((f64_at(&result, "count", 2) - 10.0 / 3.0).abs() < 1e-9);
        // text column untouched
        assert_eq!(result.column("city").unwrap().null_count(), 1);
        // complete column untouched
        assert_eq!(result.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_median_fills_numeric_only() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Median, None),
            &mut steps,
        )
        .unwrap();

        assert_eq!(f64_at(&result, "score", 1), 3.0);
        assert_eq!(f64_at(&result, "count", 2), 4.0);
        assert_eq!(result.column("city").unwrap().null_count(), 1);
        assert!(steps[0].contains("median"));
    }

    #[test]
    fn test_mean_all_missing_column_is_left_alone() {
        let df = df!["values" => [Option::<f64>::None, None]].unwrap();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Mean, None),
            &mut steps,
        )
        .unwrap();

        assert_eq!(result.column("values").unwrap().null_count(), 2);
        assert!(steps.is_empty());
    }

    // ========================================================================
    // mode
    // ========================================================================

    #[test]
    fn test_mode_fills_every_column() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Mode, None),
            &mut steps,
        )
        .unwrap();

        assert_eq!(str_at(&result, "city", 1), Some("LA".to_string()));
        assert_eq!(result.column("count").unwrap().dtype(), &DataType::Int64);
        assert_eq!(f64_at(&result, "count", 2), 4.0);
        // tie between 1.0 and 5.0 goes to the first seen
        assert_eq!(f64_at(&result, "score", 1), 1.0);
        assert_eq!(steps.len(), 3);
    }

    // ========================================================================
    // constant
    // ========================================================================

    #[test]
    fn test_constant_fills_every_column() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Constant, Some(0.0)),
            &mut steps,
        )
        .unwrap();

        for name in ["score", "count", "city"] {
            assert_eq!(result.column(name).unwrap().null_count(), 0, "column {name}");
        }
        assert_eq!(result.column("count").unwrap().dtype(), &DataType::Int64);
        assert_eq!(f64_at(&result, "count", 2), 0.0);
        assert_eq!(str_at(&result, "city", 1), Some("0".to_string()));
    }

    #[test]
    fn test_constant_fractional_value_widens_integers() {
        let df = df!["count" => [Some(1i64), None]].unwrap();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Constant, Some(2.5)),
            &mut steps,
        )
        .unwrap();

        assert_eq!(result.column("count").unwrap().dtype(), &DataType::Float64);
        assert_eq!(f64_at(&result, "count", 1), 2.5);
    }

    #[test]
    fn test_constant_on_boolean_column() {
        let df = df!["flag" => [Some(true), None, Some(false)]].unwrap();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Constant, Some(0.0)),
            &mut steps,
        )
        .unwrap();

        let flag = result.column("flag").unwrap().as_materialized_series();
        assert_eq!(flag.bool().unwrap().get(1), Some(false));
    }

    #[test]
    fn test_constant_without_value_is_noop() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Constant, None),
            &mut steps,
        )
        .unwrap();

        assert!(result.equals_missing(&df));
        assert!(steps[0].contains("Skipped"));
    }

    #[test]
    fn test_fill_preserves_column_order_and_names() {
        let df = mixed_df();
        let mut steps = Vec::new();

        let result = StatisticalImputer::fill_missing_values(
            &df,
            &fillna(FillStrategy::Constant, Some(1.0)),
            &mut steps,
        )
        .unwrap();

        assert_eq!(
            crate::utils::column_names(&result),
            vec!["id", "score", "count", "city"]
        );
        assert_eq!(result.height(), 4);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df![
            "score" => [1.5, f64::NAN, 2.5],
        ]
        .unwrap();

        for (strategy, value, expected) in [
            (FillStrategy::Mean, None, 2.0),
            (FillStrategy::Constant, Some(0.0), 0.0),
        ] {
            let mut steps = Vec::new();
            let result =
                StatisticalImputer::fill_missing_values(&df, &fillna(strategy, value), &mut steps)
                    .unwrap();

            let score = result.column("score").unwrap();
            assert_eq!(score.null_count(), 0);
            assert_eq!(f64_at(&result, "score", 1), expected);
            assert!(!score.as_materialized_series().is_nan().unwrap().any());
        }
    }
}
