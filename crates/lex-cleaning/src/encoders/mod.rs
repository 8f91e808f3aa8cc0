//! Categorical encoding module.
//!
//! - Label encoding replaces a column in place with integer codes.
//! - One-hot encoding removes a column and appends one indicator column per
//!   category at the end of the table.

mod label;
mod onehot;

pub use label::LabelEncoder;
pub use onehot::OneHotEncoder;

use crate::config::{EncodeConfig, EncodeMethod};
use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::assemble_table;
use polars::prelude::*;
use tracing::{debug, info};

/// Applies an [`EncodeConfig`] to a DataFrame.
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    /// Encode the configured columns, in list order.
    ///
    /// Each named column must exist when its turn comes; a column already
    /// consumed by an earlier one-hot expansion fails with
    /// [`CleaningError::ColumnNotFound`].
    pub fn encode_categoricals(
        df: &DataFrame,
        encode: &EncodeConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        info!(
            "Encoding {} column(s) with method '{}'",
            encode.columns.len(),
            encode.method
        );

        match encode.method {
            EncodeMethod::Label => Self::apply_label(df, &encode.columns, processing_steps),
            EncodeMethod::OneHot => Self::apply_onehot(df, &encode.columns, processing_steps),
        }
    }

    fn apply_label(
        df: &DataFrame,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let mut encoded = df.clone();

        for name in columns {
            let source = column_series(&encoded, name)?;
            let (codes, classes) = LabelEncoder::fit_transform(&source)?;
            encoded
                .replace(name, codes)
                .context(format!("Failed to replace '{}' with label codes", name))?;

            debug!("Label encoded '{}' into {} classes", name, classes.len());
            processing_steps.push(format!(
                "Label encoded '{}' ({} classes)",
                name,
                classes.len()
            ));
        }

        Ok(encoded)
    }

    fn apply_onehot(
        df: &DataFrame,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let mut encoded = df.clone();

        for name in columns {
            let source = column_series(&encoded, name)?;
            let indicators = OneHotEncoder::indicator_columns(&source)?;

            let mut kept: Vec<Column> = encoded
                .get_columns()
                .iter()
                .filter(|col| col.name().as_str() != name.as_str())
                .cloned()
                .collect();

            for indicator in &indicators {
                if kept.iter().any(|col| col.name() == indicator.name()) {
                    return Err(CleaningError::DuplicateColumn(indicator.name().to_string()));
                }
            }
            let added = indicators.len();
            kept.extend(indicators.into_iter().map(Column::from));

            encoded = assemble_table(df.height(), kept)
                .context(format!("Failed to assemble table after one-hot encoding '{}'", name))?;

            debug!("One-hot encoded '{}' into {} indicator columns", name, added);
            processing_steps.push(format!(
                "One-hot encoded '{}' into {} indicator columns",
                name, added
            ));
        }

        Ok(encoded)
    }
}

/// Owned copy of a named column, or `ColumnNotFound`.
fn column_series(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|col| col.as_materialized_series().clone())
        .map_err(|_| CleaningError::ColumnNotFound(name.to_string()))
}
