//! Cleaning plan building.
//!
//! Turns the issues of a [`DatasetProfile`] into an ordered, deduplicated
//! list of proposed actions. Nothing here touches data; the plan is only a
//! proposal for the caller to review and select from.

mod actions;

use crate::config::QualityConfig;
use crate::types::{ColumnProfile, DatasetProfile, Issue, IssueKind, SemanticType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub use actions::{
    ActionKey, ActionKind, ActionPhase, ActionRecord, ActionSelection, CleaningAction,
    ImputeMethod, PlannedAction,
};

/// Ordered cleaning proposal.
///
/// Actions are unique by [`ActionKey`] and sorted by kind (structural, then
/// per-value, then statistical) and, within a kind, by column position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub actions: Vec<PlannedAction>,
}

impl CleaningPlan {
    pub fn iter(&self) -> impl Iterator<Item = &PlannedAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, key: &ActionKey) -> Option<&PlannedAction> {
        self.actions.iter().find(|a| &a.key() == key)
    }

    pub fn contains(&self, key: &ActionKey) -> bool {
        self.get(key).is_some()
    }

    /// Keys of the actions that are pre-selected by default.
    pub fn safe_selection(&self) -> ActionSelection {
        self.actions
            .iter()
            .filter(|a| a.is_safe)
            .map(PlannedAction::key)
            .collect()
    }

    pub fn full_selection(&self) -> ActionSelection {
        self.actions.iter().map(PlannedAction::key).collect()
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        self.actions.iter().map(|a| a.action.record()).collect()
    }
}

/// Builds a [`CleaningPlan`] from a profile.
pub struct CleaningPlanBuilder;

impl CleaningPlanBuilder {
    pub fn build(profile: &DatasetProfile, config: &QualityConfig) -> CleaningPlan {
        let mut actions = Vec::new();

        if profile.duplicate_rows > 0 {
            actions.push(PlannedAction::new(
                CleaningAction::RemoveDuplicates,
                format!(
                    "{} duplicate rows ({:.1}% of rows)",
                    profile.duplicate_rows, profile.duplicate_pct
                ),
            ));
        }

        for column in &profile.columns {
            for issue in &column.issues {
                match action_for(issue, column, config) {
                    Some(action) => actions.push(PlannedAction::new(
                        action,
                        format!("{} ({} severity)", issue.description, issue.severity),
                    )),
                    None => debug!(
                        "No action for {} on '{}'; informational only",
                        issue.kind, column.name
                    ),
                }
            }
        }

        let mut seen = HashSet::new();
        actions.retain(|a| seen.insert(a.key()));

        let position: HashMap<&str, usize> = profile
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();
        actions.sort_by_key(|a| {
            let column = a.action.column().and_then(|c| position.get(c).copied());
            (a.action.kind(), column)
        });

        let plan = CleaningPlan { actions };
        info!(
            "Built cleaning plan: {} actions ({} safe)",
            plan.len(),
            plan.safe_selection().len()
        );
        plan
    }
}

/// Fixed issue-kind to action-kind lookup.
fn action_for(issue: &Issue, column: &ColumnProfile, config: &QualityConfig) -> Option<CleaningAction> {
    let name = column.name.clone();
    let action = match issue.kind {
        IssueKind::MissingValues => CleaningAction::ImputeMissing {
            column: name,
            method: impute_method(column),
        },
        IssueKind::Outliers => CleaningAction::ClipOutliers {
            column: name,
            multiplier: config.iqr_multiplier,
        },
        IssueKind::Whitespace => CleaningAction::StripWhitespace { column: name },
        IssueKind::InconsistentCasing => CleaningAction::StandardizeCasing {
            column: name,
            style: config.casing_style,
        },
        IssueKind::ConstantColumn => CleaningAction::DropConstantColumn { column: name },
        IssueKind::NumericAsText => CleaningAction::ConvertToNumeric { column: name },
        IssueKind::HighCardinality => return None,
    };
    Some(action)
}

fn impute_method(column: &ColumnProfile) -> ImputeMethod {
    if column.inferred_type == SemanticType::Numeric || column.has_issue(IssueKind::NumericAsText)
    {
        ImputeMethod::Median
    } else if column.inferred_type == SemanticType::Datetime {
        ImputeMethod::ForwardFill
    } else {
        ImputeMethod::Mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn plan_for(df: &DataFrame) -> CleaningPlan {
        let config = QualityConfig::default();
        let profile = DataProfiler::profile_dataset(df, &config).unwrap();
        CleaningPlanBuilder::build(&profile, &config)
    }

    fn keys(plan: &CleaningPlan) -> Vec<String> {
        plan.iter().map(|a| a.key().to_string()).collect()
    }

    fn messy() -> DataFrame {
        df![
            "score" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(100.0), Some(3.0)],
            "city" => [" Rome", "rome", "Oslo", "Oslo", "Rome", "Oslo", " Rome"],
            "plant" => ["A", "A", "A", "A", "A", "A", "A"],
        ]
        .unwrap()
    }

    // ===== build tests =====

    #[test]
    fn test_plan_order() {
        let mut df = messy();
        df = df.vstack(&df.head(Some(1))).unwrap();
        let plan = plan_for(&df);

        assert_eq!(
            keys(&plan),
            vec![
                "remove_duplicates",
                "drop_constant_column(plant)",
                "strip_whitespace(city)",
                "standardize_casing(city)",
                "impute_missing(score)",
                "clip_outliers(score)",
            ]
        );
    }

    #[test]
    fn test_phases_never_decrease() {
        let plan = plan_for(&messy());
        let phases: Vec<ActionPhase> = plan.iter().map(|a| a.action.kind().phase()).collect();
        let mut sorted = phases.clone();
        sorted.sort();
        assert_eq!(phases, sorted);
    }

    #[test]
    fn test_safe_flags_and_selection() {
        let plan = plan_for(&messy());
        for action in plan.iter() {
            assert_eq!(action.is_safe, action.action.kind().is_safe());
        }
        let safe: Vec<String> = plan.safe_selection().iter().map(|k| k.to_string()).collect();
        assert_eq!(
            safe,
            vec!["strip_whitespace(city)", "standardize_casing(city)"]
        );
        assert_eq!(plan.full_selection().len(), plan.len());
    }

    #[test]
    fn test_high_cardinality_has_no_action() {
        let df = df![
            "note" => ["a", "b", "c", "d", "e", "f", "a", "b", "c", "d"],
        ]
        .unwrap();
        let plan = plan_for(&df);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_no_duplicates_no_dataset_action() {
        let plan = plan_for(&messy());
        assert!(!plan.contains(&ActionKey::new(ActionKind::RemoveDuplicates, None)));
    }

    #[test]
    fn test_rationale_from_issue() {
        let plan = plan_for(&messy());
        let impute = plan
            .get(&ActionKey::new(ActionKind::ImputeMissing, Some("score")))
            .unwrap();
        assert!(impute.rationale.contains("1 of 7 values are missing"));
        assert!(!impute.is_safe);
    }

    // ===== impute method tests =====

    #[test]
    fn test_impute_methods_by_type() {
        let df = df![
            "n" => [Some(1.0), None, Some(3.0), Some(4.0)],
            "c" => [Some("x"), Some("y"), None, Some("x")],
            "d" => [Some("2024-01-01"), None, Some("2024-01-03"), Some("2024-01-04")],
        ]
        .unwrap();
        let plan = plan_for(&df);
        let methods: Vec<Option<String>> = plan
            .records()
            .into_iter()
            .filter(|r| r.action == ActionKind::ImputeMissing)
            .map(|r| r.method)
            .collect();
        assert_eq!(
            methods,
            vec![
                Some("median".to_string()),
                Some("mode".to_string()),
                Some("forward_fill".to_string()),
            ]
        );
    }

    #[test]
    fn test_numeric_as_text_imputes_median() {
        let df = df![
            "amount" => [Some("10"), Some("12"), Some("n/a"), Some("15"), Some("abc"), Some("11"), Some("14"), Some("13"), Some("9"), Some("16")],
        ]
        .unwrap();
        let plan = plan_for(&df);
        let keys = keys(&plan);
        assert!(keys.contains(&"convert_to_numeric(amount)".to_string()));
        let impute = plan
            .get(&ActionKey::new(ActionKind::ImputeMissing, Some("amount")))
            .unwrap();
        assert_eq!(
            impute.action,
            CleaningAction::ImputeMissing {
                column: "amount".to_string(),
                method: ImputeMethod::Median,
            }
        );
    }

    #[test]
    fn test_empty_profile_empty_plan() {
        assert!(plan_for(&DataFrame::empty()).is_empty());
    }
}
