//! Role suggestion.
//!
//! Proposes which columns act as identifier, target and time, and which
//! remaining columns are numeric or categorical features. Suggestions are
//! advisory; [`RoleSuggestion::set_role`] lets the caller override them.

mod rules;

use crate::types::{ColumnProfile, DatasetProfile, IssueKind, SemanticType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

pub use rules::{
    OUTCOME_VOCABULARY, RULES, RULESET_VERSION, Role, RoleRule, RuleContext, TIME_VOCABULARY,
    name_tokens,
};

/// Rule name recorded when the caller overrides a role.
pub const MANUAL_OVERRIDE: &str = "manual_override";

/// Which rule assigned a column to a singular role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEvidence {
    pub role: Role,
    pub column: String,
    pub rule: String,
}

/// Suggested column roles.
///
/// A column holds at most one singular role, and a column holding a singular
/// role never appears in the feature lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSuggestion {
    pub id: Option<String>,
    pub target: Option<String>,
    pub time: Option<String>,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub evidence: Vec<RoleEvidence>,
    pub ruleset_version: u32,
}

impl Default for RoleSuggestion {
    fn default() -> Self {
        Self {
            id: None,
            target: None,
            time: None,
            numeric_features: Vec::new(),
            categorical_features: Vec::new(),
            evidence: Vec::new(),
            ruleset_version: RULESET_VERSION,
        }
    }
}

impl RoleSuggestion {
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Id => self.id.as_deref(),
            Role::Target => self.target.as_deref(),
            Role::Time => self.time.as_deref(),
        }
    }

    fn slot(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Id => &mut self.id,
            Role::Target => &mut self.target,
            Role::Time => &mut self.time,
        }
    }

    /// The singular role a column holds, if any.
    pub fn role_of(&self, column: &str) -> Option<Role> {
        [Role::Id, Role::Target, Role::Time]
            .into_iter()
            .find(|&role| self.get(role) == Some(column))
    }

    /// Override a singular role. Assigning a column releases it from any other
    /// singular role and from the feature lists; `None` unassigns the role.
    pub fn set_role(&mut self, role: Role, column: Option<String>) {
        self.evidence.retain(|e| e.role != role);

        if let Some(name) = &column {
            if let Some(previous) = self.role_of(name)
                && previous != role
            {
                *self.slot(previous) = None;
                self.evidence.retain(|e| e.role != previous);
            }
            self.numeric_features.retain(|c| c != name);
            self.categorical_features.retain(|c| c != name);
            self.evidence.push(RoleEvidence {
                role,
                column: name.clone(),
                rule: MANUAL_OVERRIDE.to_string(),
            });
        }

        *self.slot(role) = column;
    }
}

/// Rule-table driven role suggester.
pub struct RoleSuggester;

impl RoleSuggester {
    /// Suggest roles from a profile. Pure and deterministic.
    pub fn suggest(profile: &DatasetProfile) -> RoleSuggestion {
        let ctx = RuleContext::from_columns(&profile.columns);
        let mut suggestion = RoleSuggestion::default();
        let mut claimed: HashSet<&str> = HashSet::new();

        for role in [Role::Id, Role::Target, Role::Time] {
            let Some((rule, column)) = Self::first_match(role, &profile.columns, &claimed, &ctx)
            else {
                debug!("No candidate for role '{}'", role.as_str());
                continue;
            };

            debug!(
                "Role '{}' -> '{}' (rule {})",
                role.as_str(),
                column.name,
                rule.name
            );
            claimed.insert(column.name.as_str());
            *suggestion.slot(role) = Some(column.name.clone());
            suggestion.evidence.push(RoleEvidence {
                role,
                column: column.name.clone(),
                rule: rule.name.to_string(),
            });
        }

        for column in &profile.columns {
            if claimed.contains(column.name.as_str()) {
                continue;
            }
            match column.inferred_type {
                SemanticType::Numeric => suggestion.numeric_features.push(column.name.clone()),
                SemanticType::Categorical | SemanticType::Boolean
                    if !column.has_issue(IssueKind::HighCardinality) =>
                {
                    suggestion.categorical_features.push(column.name.clone())
                }
                _ => {}
            }
        }

        info!(
            "Suggested roles (ruleset v{}): id={:?} target={:?} time={:?}, {} numeric / {} categorical features",
            RULESET_VERSION,
            suggestion.id,
            suggestion.target,
            suggestion.time,
            suggestion.numeric_features.len(),
            suggestion.categorical_features.len()
        );

        suggestion
    }

    /// First rule for `role` with any unclaimed candidate, and its best column.
    fn first_match<'a>(
        role: Role,
        columns: &'a [ColumnProfile],
        claimed: &HashSet<&str>,
        ctx: &RuleContext,
    ) -> Option<(&'static RoleRule, &'a ColumnProfile)> {
        RULES.iter().filter(|rule| rule.role == role).find_map(|rule| {
            let mut best: Option<(u32, &ColumnProfile)> = None;
            for column in columns {
                if claimed.contains(column.name.as_str()) {
                    continue;
                }
                if let Some(score) = (rule.score)(column, ctx)
                    && best.is_none_or(|(top, _)| score > top)
                {
                    best = Some((score, column));
                }
            }
            best.map(|(_, column)| (rule, column))
        })
    }
}
