//! Result types returned by the cleaning pipeline.

use crate::pipeline::CleaningStage;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Outcome of one pipeline invocation: the cleaned table plus what happened.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub table: DataFrame,
    pub summary: CleaningSummary,
}

/// Human-readable record of what the pipeline did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows (never changed by the pipeline).
    pub rows: usize,

    pub columns_before: usize,
    pub columns_after: usize,

    /// Stages whose section was present, in execution order.
    pub stages_applied: Vec<CleaningStage>,

    /// One line per concrete change (a dropped list, a filled column, ...).
    pub processing_steps: Vec<String>,
}

impl CleaningSummary {
    /// True when no stage ran, i.e. the output equals the input.
    pub fn is_identity(&self) -> bool {
        self.stages_applied.is_empty()
    }
}
