//! Stages of the cleaning pipeline.
//!
//! Every invocation walks the same fixed sequence:
//!
//! ```text
//! Parsed -> Dropped -> Renamed -> Filled -> Encoded -> Done
//! ```
//!
//! A stage whose configuration section is absent is an identity transition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Input bytes were parsed into a table
    Parsed,
    /// Configured columns were removed
    Dropped,
    /// Configured columns were renamed
    Renamed,
    /// Missing values were filled
    Filled,
    /// Categorical columns were encoded
    Encoded,
    /// The resulting table is ready
    Done,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Parsed => "Parsed Input",
            Self::Dropped => "Dropping Columns",
            Self::Renamed => "Renaming Columns",
            Self::Filled => "Filling Missing Values",
            Self::Encoded => "Encoding Categoricals",
            Self::Done => "Done",
        }
    }

    /// The stage that follows this one, `None` after [`CleaningStage::Done`].
    pub fn next(&self) -> Option<CleaningStage> {
        match self {
            Self::Parsed => Some(Self::Dropped),
            Self::Dropped => Some(Self::Renamed),
            Self::Renamed => Some(Self::Filled),
            Self::Filled => Some(Self::Encoded),
            Self::Encoded => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Check if this is the terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
