//! Pipeline module.
//!
//! This module provides the cleaning pipeline and its stage sequence.

mod executor;
mod stage;

pub use executor::{CleaningPipeline, apply_cleaning};
pub use stage::CleaningStage;
