//! Caller-owned cleaning context.
//!
//! A [`CleaningSession`] threads one table through profile, role suggestion,
//! planning and execution. Every derived artifact is recomputed from the
//! table, never patched; [`CleaningSession::refresh`] swaps in a new table.

use crate::cleaner::{CleaningExecutor, CleaningOutcome};
use crate::config::QualityConfig;
use crate::error::{QualityError, Result};
use crate::planner::{ActionKey, ActionSelection, CleaningPlan, CleaningPlanBuilder};
use crate::profiler::DataProfiler;
use crate::roles::{RoleSuggester, RoleSuggestion};
use crate::types::DatasetProfile;
use polars::prelude::*;
use tracing::{debug, info};

/// Profile, roles, plan and selection for one table.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::{CleaningSession, QualityConfig};
///
/// let mut session = CleaningSession::new(df, QualityConfig::default())?;
/// session.select_safe();
/// let outcome = session.execute();
/// println!("{}", outcome.log.to_text());
/// ```
#[derive(Debug, Clone)]
pub struct CleaningSession {
    raw: DataFrame,
    config: QualityConfig,
    profile: DatasetProfile,
    roles: RoleSuggestion,
    plan: CleaningPlan,
    selection: ActionSelection,
}

static_assertions::assert_impl_all!(CleaningSession: Send, Sync);

impl CleaningSession {
    /// Profile `df` and derive roles and a plan. Safe actions start selected.
    pub fn new(df: DataFrame, config: QualityConfig) -> Result<Self> {
        config.validate()?;

        let profile = DataProfiler::profile_dataset(&df, &config)?;
        let roles = RoleSuggester::suggest(&profile);
        let plan = CleaningPlanBuilder::build(&profile, &config);
        let selection = plan.safe_selection();

        Ok(Self {
            raw: df,
            config,
            profile,
            roles,
            plan,
            selection,
        })
    }

    pub fn raw(&self) -> &DataFrame {
        &self.raw
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    pub fn roles(&self) -> &RoleSuggestion {
        &self.roles
    }

    pub fn plan(&self) -> &CleaningPlan {
        &self.plan
    }

    pub fn selection(&self) -> &ActionSelection {
        &self.selection
    }

    /// Select a planned action. Keys outside the current plan are rejected.
    pub fn select(&mut self, key: ActionKey) -> Result<()> {
        if !self.plan.contains(&key) {
            return Err(QualityError::not_applicable(
                key.to_string(),
                "action is not part of the current plan",
            ));
        }
        debug!("Selected {}", key);
        self.selection.insert(key);
        Ok(())
    }

    /// Returns whether the key was selected.
    pub fn deselect(&mut self, key: &ActionKey) -> bool {
        self.selection.remove(key)
    }

    pub fn select_safe(&mut self) {
        self.selection = self.plan.safe_selection();
    }

    pub fn select_all(&mut self) {
        self.selection = self.plan.full_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the suggested roles with caller-edited ones.
    pub fn set_roles(&mut self, roles: RoleSuggestion) {
        self.roles = roles;
    }

    /// Apply the selected actions to a copy of the raw table.
    pub fn execute(&self) -> CleaningOutcome {
        CleaningExecutor::execute(&self.raw, &self.plan, &self.selection)
    }

    /// Recompute every derived artifact from `df`, which becomes the raw
    /// table. The selection is reset to the safe actions of the new plan.
    pub fn refresh(&mut self, df: DataFrame) -> Result<()> {
        let fresh = Self::new(df, self.config.clone())?;
        info!(
            "Session refreshed: {} rows x {} columns, {} planned actions",
            fresh.profile.row_count,
            fresh.profile.column_count,
            fresh.plan.len()
        );
        *self = fresh;
        Ok(())
    }
}
