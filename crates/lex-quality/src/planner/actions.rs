//! Cleaning action vocabulary.

use crate::config::CasingStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How missing values are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeMethod {
    Median,
    Mode,
    /// Previous observed value; leading gaps take the next observed value.
    ForwardFill,
}

impl ImputeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputeMethod::Median => "median",
            ImputeMethod::Mode => "mode",
            ImputeMethod::ForwardFill => "forward_fill",
        }
    }
}

/// One cleaning transformation, carrying only the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CleaningAction {
    RemoveDuplicates,
    DropConstantColumn { column: String },
    StripWhitespace { column: String },
    StandardizeCasing { column: String, style: CasingStyle },
    ConvertToNumeric { column: String },
    ImputeMissing { column: String, method: ImputeMethod },
    ClipOutliers { column: String, multiplier: f64 },
}

impl CleaningAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            CleaningAction::RemoveDuplicates => ActionKind::RemoveDuplicates,
            CleaningAction::DropConstantColumn { .. } => ActionKind::DropConstantColumn,
            CleaningAction::StripWhitespace { .. } => ActionKind::StripWhitespace,
            CleaningAction::StandardizeCasing { .. } => ActionKind::StandardizeCasing,
            CleaningAction::ConvertToNumeric { .. } => ActionKind::ConvertToNumeric,
            CleaningAction::ImputeMissing { .. } => ActionKind::ImputeMissing,
            CleaningAction::ClipOutliers { .. } => ActionKind::ClipOutliers,
        }
    }

    /// Target column; `None` for dataset-wide actions.
    pub fn column(&self) -> Option<&str> {
        match self {
            CleaningAction::RemoveDuplicates => None,
            CleaningAction::DropConstantColumn { column }
            | CleaningAction::StripWhitespace { column }
            | CleaningAction::StandardizeCasing { column, .. }
            | CleaningAction::ConvertToNumeric { column }
            | CleaningAction::ImputeMissing { column, .. }
            | CleaningAction::ClipOutliers { column, .. } => Some(column),
        }
    }

    /// Method label for export, where the action has one.
    pub fn method(&self) -> Option<&'static str> {
        match self {
            CleaningAction::ImputeMissing { method, .. } => Some(method.as_str()),
            CleaningAction::StandardizeCasing { style, .. } => Some(style.as_str()),
            CleaningAction::ClipOutliers { .. } => Some("iqr"),
            _ => None,
        }
    }

    pub fn key(&self) -> ActionKey {
        ActionKey {
            kind: self.kind(),
            column: self.column().map(str::to_string),
        }
    }

    pub fn record(&self) -> ActionRecord {
        ActionRecord {
            action: self.kind(),
            column: self.column().map(str::to_string),
            method: self.method().map(str::to_string),
        }
    }
}

/// Action kinds, declared in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RemoveDuplicates,
    DropConstantColumn,
    StripWhitespace,
    StandardizeCasing,
    ConvertToNumeric,
    ImputeMissing,
    ClipOutliers,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::RemoveDuplicates => "remove_duplicates",
            ActionKind::DropConstantColumn => "drop_constant_column",
            ActionKind::StripWhitespace => "strip_whitespace",
            ActionKind::StandardizeCasing => "standardize_casing",
            ActionKind::ConvertToNumeric => "convert_to_numeric",
            ActionKind::ImputeMissing => "impute_missing",
            ActionKind::ClipOutliers => "clip_outliers",
        }
    }

    pub fn phase(&self) -> ActionPhase {
        match self {
            ActionKind::RemoveDuplicates | ActionKind::DropConstantColumn => {
                ActionPhase::Structural
            }
            ActionKind::StripWhitespace
            | ActionKind::StandardizeCasing
            | ActionKind::ConvertToNumeric => ActionPhase::PerValue,
            ActionKind::ImputeMissing | ActionKind::ClipOutliers => ActionPhase::Statistical,
        }
    }

    /// Safe actions cannot lose information and are pre-selected.
    pub fn is_safe(&self) -> bool {
        matches!(
            self,
            ActionKind::RemoveDuplicates
                | ActionKind::StripWhitespace
                | ActionKind::StandardizeCasing
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPhase {
    Structural,
    PerValue,
    Statistical,
}

/// Identity of a planned action: its kind and column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionKey {
    pub kind: ActionKind,
    pub column: Option<String>,
}

impl ActionKey {
    pub fn new(kind: ActionKind, column: Option<&str>) -> Self {
        Self {
            kind,
            column: column.map(str::to_string),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}({})", self.kind, column),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// The caller's chosen subset of a plan.
pub type ActionSelection = BTreeSet<ActionKey>;

/// Flat `{action, column, method}` record for logging and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: ActionKind,
    pub column: Option<String>,
    pub method: Option<String>,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            ActionKey {
                kind: self.action,
                column: self.column.clone(),
            }
        )
    }
}

/// An action proposed by the plan builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub action: CleaningAction,
    pub is_safe: bool,
    pub rationale: String,
}

impl PlannedAction {
    pub fn new(action: CleaningAction, rationale: impl Into<String>) -> Self {
        Self {
            is_safe: action.kind().is_safe(),
            action,
            rationale: rationale.into(),
        }
    }

    pub fn key(&self) -> ActionKey {
        self.action.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_order_follows_phases() {
        let kinds = [
            ActionKind::RemoveDuplicates,
            ActionKind::DropConstantColumn,
            ActionKind::StripWhitespace,
            ActionKind::StandardizeCasing,
            ActionKind::ConvertToNumeric,
            ActionKind::ImputeMissing,
            ActionKind::ClipOutliers,
        ];
        for pair in kinds.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].phase() <= pair[1].phase());
        }
    }

    #[test]
    fn test_safety_flags() {
        assert!(ActionKind::StripWhitespace.is_safe());
        assert!(ActionKind::RemoveDuplicates.is_safe());
        assert!(!ActionKind::ImputeMissing.is_safe());
        assert!(!ActionKind::ConvertToNumeric.is_safe());
        assert!(!ActionKind::DropConstantColumn.is_safe());
    }

    #[test]
    fn test_key_display() {
        let action = CleaningAction::ClipOutliers {
            column: "score".to_string(),
            multiplier: 1.5,
        };
        assert_eq!(action.key().to_string(), "clip_outliers(score)");
        assert_eq!(CleaningAction::RemoveDuplicates.key().to_string(), "remove_duplicates");
    }

    #[test]
    fn test_record() {
        let action = CleaningAction::ImputeMissing {
            column: "age".to_string(),
            method: ImputeMethod::Median,
        };
        assert_eq!(
            action.record(),
            ActionRecord {
                action: ActionKind::ImputeMissing,
                column: Some("age".to_string()),
                method: Some("median".to_string()),
            }
        );
    }

    #[test]
    fn test_action_serializes_tagged() {
        let action = CleaningAction::StripWhitespace {
            column: "city".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "strip_whitespace", "column": "city"})
        );
    }
}
