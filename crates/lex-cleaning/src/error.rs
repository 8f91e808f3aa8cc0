//! Error types for the cleaning pipeline.
//!
//! Every failure in the library is a [`CleaningError`]. The first error aborts
//! the whole invocation; no partially cleaned table is ever returned.
//!
//! Errors are serializable so a transport layer can hand them straight back
//! to a client as `{ "code": ..., "message": ... }`.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The cleaning configuration is malformed or semantically invalid.
    #[error("Invalid configuration: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    /// Input bytes could not be interpreted as a consistent table.
    #[error("Failed to parse input table: {0}")]
    Parse(String),

    /// An operation referenced a column absent at execution time.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A rename or encoding would produce two columns with the same name.
    #[error("Column '{0}' would appear more than once in the result")]
    DuplicateColumn(String),

    /// Unrecognized fill strategy.
    #[error("Invalid fill strategy '{0}' (expected one of: mean, median, mode, constant)")]
    InvalidStrategy(String),

    /// Unrecognized encoding method.
    #[error("Invalid encoding method '{0}' (expected one of: label, onehot)")]
    InvalidMethod(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigValidation(_) => "CONFIG_VALIDATION_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::InvalidStrategy(_) => "INVALID_STRATEGY",
            Self::InvalidMethod(_) => "INVALID_METHOD",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the caller's input (table or config)
    /// rather than an internal failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Polars(_) => false,
            Self::WithContext { source, .. } => source.is_client_error(),
            _ => true,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
