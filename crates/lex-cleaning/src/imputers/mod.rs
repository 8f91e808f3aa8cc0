//! Imputation module for handling missing values.
//!
//! This module provides the fill strategies of the cleaning pipeline:
//! mean, median, mode, and constant.

mod statistical;

pub use statistical::StatisticalImputer;
