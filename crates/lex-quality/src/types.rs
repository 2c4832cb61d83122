//! Core data model shared by the profiler, role suggester and planner.
//!
//! Everything here is plain data, JSON-serializable with stable field names
//! (`name`, `inferred_type`, `missing_pct`, `issues[].kind`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Semantic Types
// ============================================================================

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Numeric,
    Boolean,
    Categorical,
    Datetime,
    IdentifierText,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Numeric => "numeric",
            SemanticType::Boolean => "boolean",
            SemanticType::Categorical => "categorical",
            SemanticType::Datetime => "datetime",
            SemanticType::IdentifierText => "identifier_text",
        }
    }

    /// Categorical or identifier text: columns whose values are labels.
    pub fn is_textual(&self) -> bool {
        matches!(self, SemanticType::Categorical | SemanticType::IdentifierText)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Issues
// ============================================================================

/// Severity ranking of an issue. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of data-quality defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingValues,
    Outliers,
    Whitespace,
    InconsistentCasing,
    HighCardinality,
    ConstantColumn,
    NumericAsText,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingValues => "missing_values",
            IssueKind::Outliers => "outliers",
            IssueKind::Whitespace => "whitespace",
            IssueKind::InconsistentCasing => "inconsistent_casing",
            IssueKind::HighCardinality => "high_cardinality",
            IssueKind::ConstantColumn => "constant_column",
            IssueKind::NumericAsText => "numeric_as_text",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected defect in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub column: String,
    pub description: String,
    /// Size of the defect: a count or a percentage depending on the kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
}

// ============================================================================
// Column Statistics
// ============================================================================

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Statistics for numeric columns; `None` when undefined (no values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    /// IQR fences `[lower, upper]` used for outlier detection.
    pub iqr_bounds: Option<(f64, f64)>,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub distinct_count: usize,
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanStats {
    pub distinct_count: usize,
    pub true_count: usize,
    pub false_count: usize,
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatetimeStats {
    pub count: usize,
    pub min: Option<String>,
    pub max: Option<String>,
    pub span_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierStats {
    pub distinct_count: usize,
    /// Non-missing values beyond the first occurrence of each distinct value.
    pub duplicate_count: usize,
}

/// Type-specific statistics, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStatistics {
    Numeric(NumericStats),
    Boolean(BooleanStats),
    Categorical(CategoricalStats),
    Datetime(DatetimeStats),
    Identifier(IdentifierStats),
}

impl ColumnStatistics {
    pub fn as_numeric(&self) -> Option<&NumericStats> {
        match self {
            ColumnStatistics::Numeric(stats) => Some(stats),
            _ => None,
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Physical polars dtype, as text.
    pub physical_dtype: String,
    pub inferred_type: SemanticType,
    pub row_count: usize,
    pub missing_count: usize,
    pub missing_pct: f64,
    pub distinct_count: usize,
    pub sample_values: Vec<String>,
    pub statistics: ColumnStatistics,
    pub issues: Vec<Issue>,
}

impl ColumnProfile {
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }

    /// distinct_count / row_count, 0 for an empty table.
    pub fn distinct_ratio(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.distinct_count as f64 / self.row_count as f64
        }
    }
}

/// Count of issues per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Dataset-level profile: one [`ColumnProfile`] per input column, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub total_cells: usize,
    pub total_missing: usize,
    pub missing_pct: f64,
    pub duplicate_rows: usize,
    pub duplicate_pct: f64,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every issue across all columns, in column order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.columns.iter().flat_map(|c| c.issues.iter())
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues().filter(move |issue| issue.kind == kind)
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for issue in self.issues() {
            match issue.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }
}
