//! Declarative Data Cleaning Library
//!
//! A small cleaning pipeline for tabular data built with Rust and Polars.
//!
//! # Overview
//!
//! A [`CleaningConfig`] names up to four operations, each optional:
//!
//! - **Drop**: remove named columns
//! - **Rename**: rename columns through an old-name to new-name map
//! - **Fill**: fill missing values with the mean, median, mode or a constant
//! - **Encode**: turn categorical columns into label codes or one-hot indicators
//!
//! Whatever order the configuration lists them in, they always run as
//! drop, rename, fill, encode. An operation that names a missing column fails
//! the whole run.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::{CleaningConfig, CleaningPipeline, apply_cleaning};
//!
//! let config = CleaningConfig::from_json_str(r#"{
//!     "drop": ["city"],
//!     "fillna": {"strategy": "constant", "value": 0}
//! }"#)?;
//!
//! // One-shot: CSV bytes in, table out
//! let table = apply_cleaning(b"id,age,city\n1,,NY\n2,30,\n", &config)?;
//!
//! // Or keep the pipeline around and inspect what happened
//! let result = CleaningPipeline::new(config).process(&table)?;
//! for step in &result.summary.processing_steps {
//!     println!("{}", step);
//! }
//! ```
//!
//! # Output
//!
//! The [`output`] module renders a cleaned table as JSON preview records or
//! as CSV bytes. With the `server` feature (on by default) the [`server`]
//! module exposes the pipeline as `POST /clean` over HTTP.

pub mod cleaner;
pub mod config;
pub mod encoders;
pub mod error;
pub mod imputers;
pub mod io;
pub mod output;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::ColumnCleaner;
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, EncodeConfig, EncodeMethod,
    FillNaConfig, FillStrategy,
};
pub use encoders::{CategoricalEncoder, LabelEncoder, OneHotEncoder};
pub use error::{CleaningError, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::parse_table;
pub use pipeline::{CleaningPipeline, CleaningStage, apply_cleaning};
pub use types::{CleaningResult, CleaningSummary};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};

static_assertions::assert_impl_all!(CleaningConfig: Send, Sync);
