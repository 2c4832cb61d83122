//! Error types for the profiling and cleaning engine.
//!
//! Precondition failures abort a call before any partial result exists.
//! Cleaning failures are recovered by the executor (skip + log), so the
//! `ActionNotApplicable` variant mostly shows up inside audit logs rather
//! than as a returned error.
//!
//! Errors serialize as `{ code, message }` so hosts can forward them as-is.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the engine.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Generic malformed-input failure.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// A column's length disagrees with the first column's length.
    #[error("Column '{column}' has {found} values but the table has {expected} rows")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns share the same name.
    #[error("Column name '{0}' appears more than once")]
    DuplicateColumn(String),

    /// A column's values cannot be rendered for inspection.
    #[error("Column '{column}' has unreadable dtype {dtype}")]
    UnreadableColumn { column: String, dtype: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A cleaning action cannot run against the current data.
    #[error("{action} is not applicable: {reason}")]
    ActionNotApplicable { action: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for an [`QualityError::ActionNotApplicable`].
    pub fn not_applicable(action: impl Into<String>, reason: impl Into<String>) -> Self {
        QualityError::ActionNotApplicable {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for hosts.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PreconditionViolation(_) => "PRECONDITION_VIOLATION",
            Self::RaggedColumns { .. } => "RAGGED_COLUMNS",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::UnreadableColumn { .. } => "UNREADABLE_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ActionNotApplicable { .. } => "ACTION_NOT_APPLICABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error stems from a structurally malformed input table.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::PreconditionViolation(_)
            | Self::RaggedColumns { .. }
            | Self::DuplicateColumn(_)
            | Self::UnreadableColumn { .. } => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }

    /// Check if the caller can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ActionNotApplicable { .. } | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, QualityError>;

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
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}
