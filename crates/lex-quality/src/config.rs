//! Configuration for profiling and plan building.
//!
//! All thresholds that steer type inference, issue detection and plan
//! building live here. Use [`QualityConfig::builder()`] for a validated
//! configuration, or [`QualityConfig::default()`] for the stock rules.

use serde::{Deserialize, Serialize};

/// How `standardize_casing` picks the canonical spelling of a value group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CasingStyle {
    /// Most frequent spelling in the group (ties go to the first seen)
    #[default]
    Dominant,
    /// Title case ("new york" -> "New York")
    Title,
}

impl CasingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasingStyle::Dominant => "dominant",
            CasingStyle::Title => "title",
        }
    }
}

/// Configuration for the profiling and cleaning-plan engine.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::config::{CasingStyle, QualityConfig};
///
/// let config = QualityConfig::builder()
///     .high_cardinality_ratio(0.6)
///     .casing_style(CasingStyle::Title)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Share of non-missing values that must parse as numbers for a column
    /// to be inferred numeric.
    /// Default: 0.95
    pub numeric_parse_ratio: f64,

    /// Share of numeric-looking values that flags a categorical or
    /// identifier column as `numeric_as_text`.
    /// Default: 0.80
    pub numeric_as_text_ratio: f64,

    /// distinct_count / row_count above which a text column is inferred
    /// identifier-text.
    /// Default: 0.90
    pub identifier_distinct_ratio: f64,

    /// distinct_count / row_count above which a categorical column is
    /// flagged `high_cardinality`.
    /// Default: 0.50
    pub high_cardinality_ratio: f64,

    /// Missing percentage above which a `missing_values` issue is high.
    /// Default: 30.0
    pub missing_high_pct: f64,

    /// Missing percentage above which a `missing_values` issue is medium.
    /// Default: 5.0
    pub missing_medium_pct: f64,

    /// Outlier percentage (of rows) above which an `outliers` issue is high.
    /// Default: 10.0
    pub outlier_high_pct: f64,

    /// Outlier percentage (of rows) above which an `outliers` issue is medium.
    /// Default: 2.0
    pub outlier_medium_pct: f64,

    /// Fence multiplier for IQR bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Number of most frequent values reported for categorical columns.
    /// Default: 10
    pub top_n: usize,

    /// Number of sample values kept per column profile.
    /// Default: 10
    pub sample_size: usize,

    /// Canonical spelling used when standardizing casing.
    /// Default: Dominant
    pub casing_style: CasingStyle,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            numeric_parse_ratio: 0.95,
            numeric_as_text_ratio: 0.80,
            identifier_distinct_ratio: 0.90,
            high_cardinality_ratio: 0.50,
            missing_high_pct: 30.0,
            missing_medium_pct: 5.0,
            outlier_high_pct: 10.0,
            outlier_medium_pct: 2.0,
            iqr_multiplier: 1.5,
            top_n: 10,
            sample_size: 10,
            casing_style: CasingStyle::default(),
        }
    }
}

impl QualityConfig {
    /// Create a new configuration builder.
    pub fn builder() -> QualityConfigBuilder {
        QualityConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("numeric_parse_ratio", self.numeric_parse_ratio),
            ("numeric_as_text_ratio", self.numeric_as_text_ratio),
            ("identifier_distinct_ratio", self.identifier_distinct_ratio),
            ("high_cardinality_ratio", self.high_cardinality_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("missing_high_pct", self.missing_high_pct),
            ("missing_medium_pct", self.missing_medium_pct),
            ("outlier_high_pct", self.outlier_high_pct),
            ("outlier_medium_pct", self.outlier_medium_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPercentage {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.missing_medium_pct > self.missing_high_pct {
            return Err(ConfigValidationError::InvertedSeverityBands {
                field: "missing".to_string(),
                medium: self.missing_medium_pct,
                high: self.missing_high_pct,
            });
        }

        if self.outlier_medium_pct > self.outlier_high_pct {
            return Err(ConfigValidationError::InvertedSeverityBands {
                field: "outlier".to_string(),
                medium: self.outlier_medium_pct,
                high: self.outlier_high_pct,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercentage { field: String, value: f64 },

    #[error("Invalid {field} severity bands: medium {medium} exceeds high {high}")]
    InvertedSeverityBands { field: String, medium: f64, high: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),
}

/// Builder for [`QualityConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct QualityConfigBuilder {
    numeric_parse_ratio: Option<f64>,
    numeric_as_text_ratio: Option<f64>,
    identifier_distinct_ratio: Option<f64>,
    high_cardinality_ratio: Option<f64>,
    missing_high_pct: Option<f64>,
    missing_medium_pct: Option<f64>,
    outlier_high_pct: Option<f64>,
    outlier_medium_pct: Option<f64>,
    iqr_multiplier: Option<f64>,
    top_n: Option<usize>,
    sample_size: Option<usize>,
    casing_style: Option<CasingStyle>,
}

impl QualityConfigBuilder {
    /// Set the share of parseable values required for a numeric column.
    pub fn numeric_parse_ratio(mut self, ratio: f64) -> Self {
        self.numeric_parse_ratio = Some(ratio);
        self
    }

    /// Set the share of parseable values that flags `numeric_as_text`.
    pub fn numeric_as_text_ratio(mut self, ratio: f64) -> Self {
        self.numeric_as_text_ratio = Some(ratio);
        self
    }

    /// Set the distinct ratio above which text is treated as an identifier.
    pub fn identifier_distinct_ratio(mut self, ratio: f64) -> Self {
        self.identifier_distinct_ratio = Some(ratio);
        self
    }

    /// Set the distinct ratio above which categoricals are high-cardinality.
    pub fn high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = Some(ratio);
        self
    }

    /// Set the missing-percentage severity bands.
    ///
    /// # Arguments
    /// * `medium` - percentage above which severity is at least medium
    /// * `high` - percentage above which severity is high
    pub fn missing_severity(mut self, medium: f64, high: f64) -> Self {
        self.missing_medium_pct = Some(medium);
        self.missing_high_pct = Some(high);
        self
    }

    /// Set the outlier-percentage severity bands.
    pub fn outlier_severity(mut self, medium: f64, high: f64) -> Self {
        self.outlier_medium_pct = Some(medium);
        self.outlier_high_pct = Some(high);
        self
    }

    /// Set the IQR fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set how many top values categorical statistics report.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set how many sample values each column profile keeps.
    pub fn sample_size(mut self, n: usize) -> Self {
        self.sample_size = Some(n);
        self
    }

    /// Set the canonical spelling used by `standardize_casing`.
    pub fn casing_style(mut self, style: CasingStyle) -> Self {
        self.casing_style = Some(style);
        self
    }

    /// Build the configuration, validating all values.
    pub fn build(self) -> Result<QualityConfig, ConfigValidationError> {
        let defaults = QualityConfig::default();

        let config = QualityConfig {
            numeric_parse_ratio: self
                .numeric_parse_ratio
                .unwrap_or(defaults.numeric_parse_ratio),
            numeric_as_text_ratio: self
                .numeric_as_text_ratio
                .unwrap_or(defaults.numeric_as_text_ratio),
            identifier_distinct_ratio: self
                .identifier_distinct_ratio
                .unwrap_or(defaults.identifier_distinct_ratio),
            high_cardinality_ratio: self
                .high_cardinality_ratio
                .unwrap_or(defaults.high_cardinality_ratio),
            missing_high_pct: self.missing_high_pct.unwrap_or(defaults.missing_high_pct),
            missing_medium_pct: self
                .missing_medium_pct
                .unwrap_or(defaults.missing_medium_pct),
            outlier_high_pct: self.outlier_high_pct.unwrap_or(defaults.outlier_high_pct),
            outlier_medium_pct: self
                .outlier_medium_pct
                .unwrap_or(defaults.outlier_medium_pct),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            sample_size: self.sample_size.unwrap_or(defaults.sample_size),
            casing_style: self.casing_style.unwrap_or(defaults.casing_style),
        };

        config.validate()?;
        Ok(config)
    }
}
