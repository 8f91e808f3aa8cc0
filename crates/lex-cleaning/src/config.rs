//! Configuration types for the cleaning pipeline.
//!
//! A [`CleaningConfig`] describes which of the four cleaning operations to
//! run and with what parameters. Every section is optional; an empty
//! configuration is a valid no-op.
//!
//! Configurations usually arrive as a JSON document (for example a form field
//! on an HTTP request) and are parsed with [`CleaningConfig::from_json_str`].
//! Programmatic callers can use the fluent [`CleaningConfig::builder()`].

use crate::error::CleaningError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Strategy for filling missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FillStrategy {
    /// Mean of the non-missing entries (numeric columns only)
    Mean,
    /// Median of the non-missing entries (numeric columns only)
    Median,
    /// Most frequent non-missing value (every column)
    Mode,
    /// The configured literal value (every column)
    Constant,
}

impl FillStrategy {
    pub const ALL: [FillStrategy; 4] = [Self::Mean, Self::Median, Self::Mode, Self::Constant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Constant => "constant",
        }
    }
}

impl FromStr for FillStrategy {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| CleaningError::InvalidStrategy(s.to_string()))
    }
}

impl TryFrom<String> for FillStrategy {
    type Error = CleaningError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method for encoding categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EncodeMethod {
    /// Replace values with zero-based integer codes in first-seen order
    Label,
    /// Expand into one indicator column per distinct value
    OneHot,
}

impl EncodeMethod {
    pub const ALL: [EncodeMethod; 2] = [Self::Label, Self::OneHot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::OneHot => "onehot",
        }
    }
}

impl FromStr for EncodeMethod {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| CleaningError::InvalidMethod(s.to_string()))
    }
}

impl TryFrom<String> for EncodeMethod {
    type Error = CleaningError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EncodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the fill-missing-values operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillNaConfig {
    pub strategy: FillStrategy,

    /// Literal used by [`FillStrategy::Constant`]. Ignored by the other strategies.
    /// A constant fill without a value replaces nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Parameters of the categorical encoding operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Columns to encode, processed in this order.
    pub columns: Vec<String>,
    pub method: EncodeMethod,
}

/// The full description of one cleaning invocation.
///
/// Sections run in a fixed order regardless of how they appear in the
/// document: drop, rename, fillna, encode.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::config::{CleaningConfig, FillStrategy};
///
/// let config = CleaningConfig::from_json_str(
///     r#"{"fillna": {"strategy": "constant", "value": 0}, "drop": ["city"]}"#,
/// )?;
/// assert_eq!(config.fillna.unwrap().strategy, FillStrategy::Constant);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillna: Option<FillNaConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<Vec<String>>,

    /// Mapping from existing column name to new column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encode: Option<EncodeConfig>,
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigValidationError> {
        let config: CleaningConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from an already decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigValidationError> {
        let config: CleaningConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// True when no section is present, i.e. the pipeline is an identity.
    pub fn is_empty(&self) -> bool {
        self.fillna.is_none() && self.drop.is_none() && self.rename.is_none() && self.encode.is_none()
    }

    /// Validate the configuration and return errors if invalid.
    ///
    /// Only shape checks happen here. Whether referenced columns exist is
    /// decided by each operation against the table it runs on.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(fillna) = &self.fillna
            && let Some(value) = fillna.value
            && !value.is_finite()
        {
            return Err(ConfigValidationError::NonFiniteFillValue(value));
        }

        if let Some(drop) = &self.drop {
            ensure_named("drop", drop.iter())?;
        }

        if let Some(rename) = &self.rename {
            ensure_named("rename", rename.iter().flat_map(|(from, to)| [from, to]))?;
        }

        if let Some(encode) = &self.encode {
            ensure_named("encode.columns", encode.columns.iter())?;
        }

        Ok(())
    }
}

fn ensure_named<'a>(
    section: &'static str,
    mut names: impl Iterator<Item = &'a String>,
) -> Result<(), ConfigValidationError> {
    if names.any(|name| name.is_empty()) {
        return Err(ConfigValidationError::EmptyColumnName { section });
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// The document is not well-formed JSON.
    #[error("Malformed configuration document: {0}")]
    Syntax(String),

    /// Well-formed JSON that does not match the configuration shape: wrong
    /// types, missing required fields, or values outside an enum's allowed set.
    #[error("Configuration does not match the expected schema: {0}")]
    Schema(String),

    #[error("Empty column name in '{section}'")]
    EmptyColumnName { section: &'static str },

    #[error("Invalid fill value: {0} (must be a finite number)")]
    NonFiniteFillValue(f64),
}

impl From<serde_json::Error> for ConfigValidationError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => Self::Syntax(err.to_string()),
            Category::Data => Self::Schema(err.to_string()),
        }
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    fillna: Option<FillNaConfig>,
    drop: Option<Vec<String>>,
    rename: Option<BTreeMap<String, String>>,
    encode: Option<EncodeConfig>,
}

impl CleaningConfigBuilder {
    /// Add columns to drop. Repeated calls extend the list.
    pub fn drop<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop
            .get_or_insert_with(Vec::new)
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Rename `from` to `to`. Repeated calls extend the mapping.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename
            .get_or_insert_with(BTreeMap::new)
            .insert(from.into(), to.into());
        self
    }

    /// Set the fill strategy and its optional constant.
    pub fn fillna(mut self, strategy: FillStrategy, value: Option<f64>) -> Self {
        self.fillna = Some(FillNaConfig { strategy, value });
        self
    }

    /// Set the columns to encode and the encoding method.
    pub fn encode<I, S>(mut self, columns: I, method: EncodeMethod) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encode = Some(EncodeConfig {
            columns: columns.into_iter().map(Into::into).collect(),
            method,
        });
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            fillna: self.fillna,
            drop: self.drop,
            rename: self.rename,
            encode: self.encode,
        };

        config.validate()?;
        Ok(config)
    }
}
