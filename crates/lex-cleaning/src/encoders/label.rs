//! Label encoding: categories to integer codes.

use crate::error::Result;
use crate::utils::{distinct_in_order, text_keys};
use polars::prelude::*;
use std::collections::HashMap;

/// Maps each distinct value of a column to a zero-based integer code.
pub struct LabelEncoder;

impl LabelEncoder {
    /// Encode a column, returning the codes (same name, `Int64`) and the
    /// classes in code order.
    ///
    /// Codes follow first-seen order and values are compared by their textual
    /// form. Missing entries stay missing.
    pub fn fit_transform(series: &Series) -> Result<(Series, Vec<String>)> {
        let keys = text_keys(series)?;
        let classes: Vec<String> = distinct_in_order(&keys)
            .into_iter()
            .map(str::to_string)
            .collect();

        let codes: HashMap<&str, i64> = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.as_str(), code as i64))
            .collect();

        let encoded: Vec<Option<i64>> = keys
            .iter()
            .map(|key| key.as_deref().and_then(|key| codes.get(key).copied()))
            .collect();

        Ok((Series::new(series.name().clone(), encoded), classes))
    }
}
