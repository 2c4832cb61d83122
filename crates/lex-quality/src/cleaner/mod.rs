//! Cleaning execution.
//!
//! Applies the selected actions of a [`CleaningPlan`] to a copy of a table,
//! in plan order, and records one [`CleaningLogEntry`] per action. A failing
//! action is skipped and logged; the batch always runs to the end.

mod converters;
mod outliers;
mod sanitizers;

use crate::error::{QualityError, Result};
use crate::imputers::StatisticalImputer;
use crate::planner::{ActionRecord, ActionSelection, CleaningAction, CleaningPlan};
use crate::table;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// What one transformation step did.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StepReport {
    pub values_changed: usize,
    pub detail: String,
}

impl StepReport {
    pub fn new(values_changed: usize, detail: impl Into<String>) -> Self {
        Self {
            values_changed,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Applied,
    Failed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Applied => "applied",
            ActionStatus::Failed => "failed",
        }
    }
}

/// One audit log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningLogEntry {
    pub action: ActionRecord,
    pub status: ActionStatus,
    pub rows_before: usize,
    pub rows_after: usize,
    pub values_changed_count: usize,
    pub detail: String,
}

impl fmt::Display for CleaningLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: rows {} -> {}, {} values changed. {}",
            self.status.as_str(),
            self.action,
            self.rows_before,
            self.rows_after,
            self.values_changed_count,
            self.detail
        )
    }
}

/// Ordered audit log of an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningLog {
    pub entries: Vec<CleaningLogEntry>,
}

impl CleaningLog {
    pub fn iter(&self) -> impl Iterator<Item = &CleaningLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == ActionStatus::Applied)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CleaningLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == ActionStatus::Failed)
    }

    /// Plain-text audit log, one entry per line.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cleaned copy of the input plus its audit log.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: DataFrame,
    pub log: CleaningLog,
}

/// Applies selected cleaning actions.
pub struct CleaningExecutor;

impl CleaningExecutor {
    /// Run the actions of `plan` whose keys are in `selection`, in plan order.
    ///
    /// `df` is never modified; the returned table is a separate copy.
    pub fn execute(
        df: &DataFrame,
        plan: &CleaningPlan,
        selection: &ActionSelection,
    ) -> CleaningOutcome {
        let mut table = df.clone();
        let mut log = CleaningLog::default();

        for planned in plan.iter().filter(|a| selection.contains(&a.key())) {
            let action = &planned.action;
            let rows_before = table.height();

            let (status, values_changed_count, detail) = match Self::apply(&mut table, action) {
                Ok(report) => {
                    debug!("Applied {}: {}", action.key(), report.detail);
                    (ActionStatus::Applied, report.values_changed, report.detail)
                }
                Err(e) => {
                    warn!("Skipped {}: {}", action.key(), e);
                    let detail = match e {
                        QualityError::ActionNotApplicable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    (ActionStatus::Failed, 0, detail)
                }
            };

            log.entries.push(CleaningLogEntry {
                action: action.record(),
                status,
                rows_before,
                rows_after: table.height(),
                values_changed_count,
                detail,
            });
        }

        info!(
            "Cleaning finished: {} applied, {} failed, {} rows x {} columns",
            log.applied_count(),
            log.failures().count(),
            table.height(),
            table.width()
        );

        CleaningOutcome { table, log }
    }

    fn apply(df: &mut DataFrame, action: &CleaningAction) -> Result<StepReport> {
        if let Some(column) = action.column()
            && df.column(column).is_err()
        {
            return Err(QualityError::not_applicable(
                action.key().to_string(),
                format!("column '{column}' is no longer present"),
            ));
        }

        match action {
            CleaningAction::RemoveDuplicates => remove_duplicates(df),
            CleaningAction::DropConstantColumn { column } => drop_column(df, column),
            CleaningAction::StripWhitespace { column } => sanitizers::strip_whitespace(df, column),
            CleaningAction::StandardizeCasing { column, style } => {
                sanitizers::standardize_casing(df, column, *style)
            }
            CleaningAction::ConvertToNumeric { column } => {
                converters::convert_to_numeric(df, column)
            }
            CleaningAction::ImputeMissing { column, method } => {
                StatisticalImputer::impute(df, column, *method)
            }
            CleaningAction::ClipOutliers { column, multiplier } => {
                outliers::clip_outliers(df, column, *multiplier)
            }
        }
    }
}

fn remove_duplicates(df: &mut DataFrame) -> Result<StepReport> {
    let (keep, duplicates) = table::duplicate_row_mask(df)?;
    if duplicates > 0 {
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask)?;
    }
    Ok(StepReport::new(0, format!("Removed {duplicates} duplicate rows")))
}

fn drop_column(df: &mut DataFrame, column: &str) -> Result<StepReport> {
    df.drop_in_place(column)?;
    Ok(StepReport::new(0, format!("Dropped column '{column}'")))
}
