use crate::cleaner::CleaningLog;
use crate::planner::{ActionRecord, CleaningPlan};
use crate::roles::RoleSuggestion;
use crate::types::DatasetProfile;
use chrono::Local;
use serde::{Deserialize, Serialize};

// ============================================================================
// Report Types
// ============================================================================

/// Everything one run produced, in a JSON-friendly shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the input, if the table came from a file
    pub input_file: Option<String>,
    pub profile: DatasetProfile,
    pub roles: RoleSuggestion,
    pub plan: CleaningPlan,
    /// Flat `{action, column, method}` view of the plan
    pub plan_records: Vec<ActionRecord>,
    /// Present only when cleaning was executed
    pub cleaning_log: Option<CleaningLog>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Renders profiles, roles, plans and logs as text or a [`QualityReport`].
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn build_report(
        input_file: Option<&str>,
        profile: &DatasetProfile,
        roles: &RoleSuggestion,
        plan: &CleaningPlan,
        cleaning_log: Option<&CleaningLog>,
    ) -> QualityReport {
        QualityReport {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.map(str::to_string),
            profile: profile.clone(),
            roles: roles.clone(),
            plan: plan.clone(),
            plan_records: plan.records(),
            cleaning_log: cleaning_log.cloned(),
        }
    }

    /// Dataset summary plus one line per issue, highest severity first.
    pub fn render_issue_table(profile: &DatasetProfile) -> String {
        let counts = profile.severity_counts();
        let mut lines = vec![
            format!(
                "Dataset: {} rows x {} columns, {:.1}% missing, {} duplicate rows ({:.1}%)",
                profile.row_count,
                profile.column_count,
                profile.missing_pct,
                profile.duplicate_rows,
                profile.duplicate_pct
            ),
            format!(
                "Issues: {} high, {} medium, {} low",
                counts.high, counts.medium, counts.low
            ),
        ];

        let mut issues: Vec<_> = profile.issues().collect();
        // stable: column order within a severity
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));

        if issues.is_empty() {
            lines.push("No issues detected.".to_string());
        }

        let width = issues.iter().map(|i| i.column.len()).max().unwrap_or(0);
        lines.extend(issues.iter().map(|issue| {
            format!(
                "  [{:<6}] {:<width$}  {:<19}  {}",
                issue.severity.as_str(),
                issue.column,
                issue.kind.as_str(),
                issue.description,
            )
        }));
        join_lines(lines)
    }

    pub fn render_columns(profile: &DatasetProfile) -> String {
        join_lines(profile.columns.iter().map(|column| {
            format!(
                "  {} ({} -> {}): {:.1}% missing, {} distinct",
                column.name,
                column.physical_dtype,
                column.inferred_type,
                column.missing_pct,
                column.distinct_count
            )
        }))
    }

    pub fn render_roles(roles: &RoleSuggestion) -> String {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let list = |v: &[String]| {
            if v.is_empty() {
                "-".to_string()
            } else {
                v.join(", ")
            }
        };

        join_lines([
            format!("Roles (ruleset v{}):", roles.ruleset_version),
            format!("  id:                   {}", show(&roles.id)),
            format!("  target:               {}", show(&roles.target)),
            format!("  time:                 {}", show(&roles.time)),
            format!("  numeric features:     {}", list(&roles.numeric_features)),
            format!("  categorical features: {}", list(&roles.categorical_features)),
        ])
    }

    /// Numbered checklist; `*` marks actions that are safe to pre-select.
    pub fn render_plan(plan: &CleaningPlan) -> String {
        if plan.is_empty() {
            return "Cleaning plan: nothing to do.\n".to_string();
        }

        let header = format!("Cleaning plan ({} actions, * = safe):", plan.len());
        let rows = plan.iter().enumerate().map(|(i, planned)| {
            let method = planned
                .action
                .method()
                .map(|m| format!(" [{m}]"))
                .unwrap_or_default();
            format!(
                "  {:>2}. {} {}{} - {}",
                i + 1,
                if planned.is_safe { "*" } else { " " },
                planned.key(),
                method,
                planned.rationale
            )
        });
        join_lines(std::iter::once(header).chain(rows))
    }
}

/// One line per entry, each newline-terminated.
fn join_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityConfig;
    use crate::planner::CleaningPlanBuilder;
    use crate::profiler::DataProfiler;
    use crate::roles::RoleSuggester;
    use polars::prelude::*;

    fn artifacts() -> (DatasetProfile, RoleSuggestion, CleaningPlan) {
        let df = df![
            "order_id" => ["o1", "o2", "o3", "o4"],
            "city" => [" Rome", "rome", "Oslo", "Oslo"],
            "total" => [Some(10.0), None, None, Some(11.0)],
        ]
        .unwrap();
        let config = QualityConfig::default();
        let profile = DataProfiler::profile_dataset(&df, &config).unwrap();
        let roles = RoleSuggester::suggest(&profile);
        let plan = CleaningPlanBuilder::build(&profile, &config);
        (profile, roles, plan)
    }

    #[test]
    fn test_issue_table_orders_by_severity() {
        let (profile, _, _) = artifacts();
        let text = ReportGenerator::render_issue_table(&profile);
        assert!(text.starts_with("Dataset: 4 rows x 3 columns"));

        let high = text.find("[high").unwrap();
        let low = text.find("[low").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_issue_table_for_clean_table() {
        let df = df![
            "sku" => ["A1", "A2", "A3"],
            "price" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let profile = DataProfiler::profile_dataset(&df, &QualityConfig::default()).unwrap();
        let text = ReportGenerator::render_issue_table(&profile);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Issues: 0 high, 0 medium, 0 low");
        assert_eq!(lines[2], "No issues detected.");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_columns_one_line_each() {
        let (profile, _, _) = artifacts();
        let text = ReportGenerator::render_columns(&profile);
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("  order_id ("));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_roles() {
        let (_, roles, _) = artifacts();
        let text = ReportGenerator::render_roles(&roles);
        assert!(text.contains("id:                   order_id"));
        assert!(text.contains("time:                 -"));
    }

    #[test]
    fn test_render_plan_marks_safe() {
        let (_, _, plan) = artifacts();
        let text = ReportGenerator::render_plan(&plan);
        assert!(text.contains("* strip_whitespace(city)"));
        assert!(text.contains("impute_missing(total) [median]"));
    }

    #[test]
    fn test_report_serializes() {
        let (profile, roles, plan) = artifacts();
        let report = ReportGenerator::build_report(Some("in.csv"), &profile, &roles, &plan, None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["input_file"], "in.csv");
        assert_eq!(json["profile"]["columns"][0]["name"], "order_id");
        assert!(json["cleaning_log"].is_null());
    }
}
