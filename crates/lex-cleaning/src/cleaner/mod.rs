//! Column-level cleaning operations.
//!
//! This module provides functionality for:
//! - Dropping named columns
//! - Renaming columns through an old -> new mapping
//!
//! Both operations keep row order and the relative order of the remaining
//! columns, and return a new DataFrame instead of mutating their input.

use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::{assemble_table, ensure_columns_exist};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Drop and rename operations over a DataFrame's columns.
pub struct ColumnCleaner;

impl ColumnCleaner {
    /// Remove the named columns.
    ///
    /// Every name is checked before anything is removed, so a missing name
    /// fails with [`CleaningError::ColumnNotFound`] and nothing is dropped.
    /// Names listed more than once are dropped once.
    pub fn drop_columns(
        df: &DataFrame,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        ensure_columns_exist(df, columns)?;

        let to_drop: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let kept: Vec<Column> = df
            .get_columns()
            .iter()
            .filter(|col| !to_drop.contains(col.name().as_str()))
            .cloned()
            .collect();

        let dropped =
            assemble_table(df.height(), kept).context("Failed to assemble table after drop")?;

        info!("Dropped {} column(s): {:?}", to_drop.len(), columns);
        processing_steps.push(format!("Dropped columns: {}", columns.join(", ")));

        Ok(dropped)
    }

    /// Rename columns according to `rename_map` (old name -> new name).
    ///
    /// All source names must exist. The complete list of resulting names is
    /// computed up front; if any name would occur twice, whether it collides
    /// with an untouched column or with another rename target, the call fails
    /// with [`CleaningError::DuplicateColumn`]. Swaps such as `{a: b, b: a}`
    /// are therefore allowed.
    pub fn rename_columns(
        df: &DataFrame,
        rename_map: &BTreeMap<String, String>,
        processing_steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        ensure_columns_exist(df, rename_map.keys())?;

        let mut seen = HashSet::with_capacity(df.width());
        let mut renamed = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let target = rename_map
                .get(col.name().as_str())
                .map(String::as_str)
                .unwrap_or(col.name().as_str());

            if !seen.insert(target.to_string()) {
                return Err(CleaningError::DuplicateColumn(target.to_string()));
            }

            let mut col = col.clone();
            if target != col.name().as_str() {
                debug!("Renaming '{}' -> '{}'", col.name(), target);
                col.rename(target.into());
            }
            renamed.push(col);
        }

        let renamed = assemble_table(df.height(), renamed)
            .context("Failed to assemble table after rename")?;

        for (from, to) in rename_map {
            processing_steps.push(format!("Renamed '{}' to '{}'", from, to));
        }

        Ok(renamed)
    }
}
