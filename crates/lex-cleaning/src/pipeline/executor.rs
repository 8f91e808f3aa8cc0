//! Pipeline execution.
//!
//! Runs the configured operations over a table in a fixed order and collects
//! a summary of what changed.

use crate::cleaner::ColumnCleaner;
use crate::config::CleaningConfig;
use crate::encoders::CategoricalEncoder;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::io::parse_table;
use crate::pipeline::CleaningStage;
use crate::types::{CleaningResult, CleaningSummary};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline for one configuration.
///
/// The pipeline only holds its immutable configuration, so one instance can
/// serve any number of concurrent calls.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{CleaningConfig, CleaningPipeline, FillStrategy};
///
/// let config = CleaningConfig::builder()
///     .drop(["city"])
///     .fillna(FillStrategy::Constant, Some(0.0))
///     .build()?;
///
/// let result = CleaningPipeline::new(config).process(&df)?;
/// println!("{:?}", result.summary.processing_steps);
/// ```
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    config: CleaningConfig,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Clean an already parsed table.
    ///
    /// The input is never modified; the result holds a new table. Any error
    /// aborts the whole run and no partial table is returned.
    pub fn process(&self, df: &DataFrame) -> Result<CleaningResult> {
        match self.process_internal(df) {
            Ok(result) => {
                info!(
                    "Cleaning completed in {}ms: {:?} -> {:?}",
                    result.summary.duration_ms,
                    df.shape(),
                    result.table.shape()
                );
                Ok(result)
            }
            Err(e) => {
                error!("Cleaning failed: {}", e);
                Err(e)
            }
        }
    }

    /// Parse raw CSV bytes and clean them.
    pub fn process_bytes(&self, raw: &[u8]) -> Result<CleaningResult> {
        let table = parse_table(raw)?;
        self.process(&table)
    }

    fn process_internal(&self, df: &DataFrame) -> Result<CleaningResult> {
        let start = Instant::now();
        let mut processing_steps = Vec::new();
        let mut stages_applied = Vec::new();
        let mut table = df.clone();

        debug!(
            "Stage {}: shape {:?}",
            CleaningStage::Parsed.display_name(),
            table.shape()
        );

        let mut stage = CleaningStage::Parsed;
        while let Some(next) = stage.next() {
            stage = next;

            if stage.is_terminal() {
                debug!("Stage {}: shape {:?}", stage.display_name(), table.shape());
                break;
            }

            let applied = match stage {
                CleaningStage::Dropped => self
                    .config
                    .drop
                    .as_ref()
                    .map(|columns| ColumnCleaner::drop_columns(&table, columns, &mut processing_steps))
                    .transpose()?,
                CleaningStage::Renamed => self
                    .config
                    .rename
                    .as_ref()
                    .map(|rename_map| {
                        ColumnCleaner::rename_columns(&table, rename_map, &mut processing_steps)
                    })
                    .transpose()?,
                CleaningStage::Filled => self
                    .config
                    .fillna
                    .as_ref()
                    .map(|fillna| {
                        StatisticalImputer::fill_missing_values(&table, fillna, &mut processing_steps)
                    })
                    .transpose()?,
                CleaningStage::Encoded => self
                    .config
                    .encode
                    .as_ref()
                    .map(|encode| {
                        CategoricalEncoder::encode_categoricals(&table, encode, &mut processing_steps)
                    })
                    .transpose()?,
                CleaningStage::Parsed | CleaningStage::Done => None,
            };

            match applied {
                Some(next_table) => {
                    table = next_table;
                    stages_applied.push(stage);
                    debug!("Stage {}: shape {:?}", stage.display_name(), table.shape());
                }
                None => debug!("Stage {}: skipped", stage.display_name()),
            }
        }

        let summary = CleaningSummary {
            duration_ms: start.elapsed().as_millis() as u64,
            rows: table.height(),
            columns_before: df.width(),
            columns_after: table.width(),
            stages_applied,
            processing_steps,
        };

        Ok(CleaningResult { table, summary })
    }
}

/// Parse `raw` as CSV and apply `config` to it.
///
/// Operations run in a fixed order: drop, rename, fill, encode. Each one runs
/// only if its section is present in `config`.
pub fn apply_cleaning(raw: &[u8], config: &CleaningConfig) -> Result<DataFrame> {
    CleaningPipeline::new(config.clone())
        .process_bytes(raw)
        .map(|result| result.table)
}
