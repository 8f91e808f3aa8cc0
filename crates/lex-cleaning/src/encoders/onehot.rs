//! One-hot encoding: one indicator column per category.

use crate::error::Result;
use crate::utils::{distinct_in_order, text_keys};
use polars::prelude::*;

/// Expands a categorical column into indicator columns.
pub struct OneHotEncoder;

impl OneHotEncoder {
    /// Build the indicator columns for `series`.
    ///
    /// One `Int32` column named `<column>_<value>` per distinct non-missing
    /// value, in first-seen order. A row holds 1 in the column of its value
    /// and 0 elsewhere; missing entries are 0 everywhere.
    pub fn indicator_columns(series: &Series) -> Result<Vec<Series>> {
        let keys = text_keys(series)?;

        let indicators = distinct_in_order(&keys)
            .into_iter()
            .map(|category| {
                let name = format!("{}_{}", series.name(), category);
                let flags: Vec<i32> = keys
                    .iter()
                    .map(|key| i32::from(key.as_deref() == Some(category)))
                    .collect();
                Series::new(name.into(), flags)
            })
            .collect();

        Ok(indicators)
    }
}
