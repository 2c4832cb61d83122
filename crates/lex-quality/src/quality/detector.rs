//! Per-column issue checks.
//!
//! Each check is an independent function over the same [`CheckInput`]; the
//! detector runs them in a fixed order so a column's issue list is stable.

use crate::config::QualityConfig;
use crate::profiler::ColumnValues;
use crate::types::{ColumnStatistics, Issue, IssueKind, SemanticType, Severity};
use std::collections::HashMap;

/// Everything a check may look at for one column.
pub(crate) struct CheckInput<'a> {
    pub values: &'a ColumnValues,
    pub inferred: SemanticType,
    pub statistics: &'a ColumnStatistics,
    pub config: &'a QualityConfig,
}

impl CheckInput<'_> {
    fn issue(&self, kind: IssueKind, severity: Severity, description: String) -> Issue {
        Issue {
            kind,
            severity,
            column: self.values.name.clone(),
            description,
            magnitude: None,
        }
    }
}

type Check = fn(&CheckInput<'_>) -> Option<Issue>;

const CHECKS: [Check; 7] = [
    check_missing_values,
    check_outliers,
    check_whitespace,
    check_inconsistent_casing,
    check_high_cardinality,
    check_constant_column,
    check_numeric_as_text,
];

/// Runs the fixed battery of quality checks.
pub struct IssueDetector;

impl IssueDetector {
    pub(crate) fn detect(input: &CheckInput<'_>) -> Vec<Issue> {
        CHECKS.iter().filter_map(|check| check(input)).collect()
    }
}

fn band(pct: f64, medium: f64, high: f64) -> Severity {
    if pct > high {
        Severity::High
    } else if pct > medium {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn check_missing_values(input: &CheckInput<'_>) -> Option<Issue> {
    let missing = input.values.missing_count();
    if missing == 0 {
        return None;
    }
    let rows = input.values.row_count();
    let pct = missing as f64 / rows as f64 * 100.0;
    let severity = band(
        pct,
        input.config.missing_medium_pct,
        input.config.missing_high_pct,
    );

    let mut issue = input.issue(
        IssueKind::MissingValues,
        severity,
        format!("{missing} of {rows} values are missing ({pct:.1}%)"),
    );
    issue.magnitude = Some(pct);
    Some(issue)
}

fn check_outliers(input: &CheckInput<'_>) -> Option<Issue> {
    let stats = input.statistics.as_numeric()?;
    if stats.outlier_count == 0 {
        return None;
    }
    let (lower, upper) = stats.iqr_bounds?;
    let pct = stats.outlier_count as f64 / input.values.row_count() as f64 * 100.0;
    let severity = band(
        pct,
        input.config.outlier_medium_pct,
        input.config.outlier_high_pct,
    );

    let mut issue = input.issue(
        IssueKind::Outliers,
        severity,
        format!(
            "{} values fall outside the IQR bounds [{lower:.2}, {upper:.2}]",
            stats.outlier_count
        ),
    );
    issue.magnitude = Some(stats.outlier_count as f64);
    Some(issue)
}

fn check_whitespace(input: &CheckInput<'_>) -> Option<Issue> {
    if !input.values.is_text() {
        return None;
    }
    let padded = input
        .values
        .values()
        .filter(|v| v.trim() != *v)
        .count();
    if padded == 0 {
        return None;
    }

    let mut issue = input.issue(
        IssueKind::Whitespace,
        Severity::Low,
        format!("{padded} values have leading or trailing whitespace"),
    );
    issue.magnitude = Some(padded as f64);
    Some(issue)
}

fn check_inconsistent_casing(input: &CheckInput<'_>) -> Option<Issue> {
    if !input.inferred.is_textual() {
        return None;
    }

    let groups = casing_groups(input.values.values());
    let mixed: Vec<&Vec<&str>> = groups.iter().filter(|g| g.len() >= 2).collect();
    let example = mixed.first()?;

    let mut issue = input.issue(
        IssueKind::InconsistentCasing,
        Severity::Low,
        format!(
            "{} values appear under multiple casings (e.g. '{}' / '{}')",
            mixed.len(),
            example[0],
            example[1]
        ),
    );
    issue.magnitude = Some(mixed.len() as f64);
    Some(issue)
}

/// Distinct trimmed spellings grouped by their case-folded form, in
/// first-seen order.
pub(crate) fn casing_groups<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Vec<&'a str>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'a str>> = Vec::new();

    for value in values {
        let trimmed = value.trim();
        let folded = trimmed.to_lowercase();
        match index.get(&folded) {
            Some(&i) => {
                if !groups[i].contains(&trimmed) {
                    groups[i].push(trimmed);
                }
            }
            None => {
                index.insert(folded, groups.len());
                groups.push(vec![trimmed]);
            }
        }
    }

    groups
}

fn check_high_cardinality(input: &CheckInput<'_>) -> Option<Issue> {
    if input.inferred != SemanticType::Categorical {
        return None;
    }
    let rows = input.values.row_count();
    if rows == 0 {
        return None;
    }
    let distinct = input.values.distinct_count();
    let ratio = distinct as f64 / rows as f64;
    if ratio <= input.config.high_cardinality_ratio {
        return None;
    }

    let mut issue = input.issue(
        IssueKind::HighCardinality,
        Severity::Medium,
        format!(
            "{distinct} distinct values across {rows} rows ({:.0}% unique)",
            ratio * 100.0
        ),
    );
    issue.magnitude = Some(distinct as f64);
    Some(issue)
}

fn check_constant_column(input: &CheckInput<'_>) -> Option<Issue> {
    if input.values.row_count() == 0 {
        return None;
    }
    let distinct = input.values.distinct();
    if distinct.len() > 1 {
        return None;
    }

    let description = match distinct.iter().next() {
        Some(value) => format!("Column holds the single value '{value}'"),
        None => "Column has no non-missing values".to_string(),
    };
    let mut issue = input.issue(IssueKind::ConstantColumn, Severity::Medium, description);
    issue.magnitude = Some(distinct.len() as f64);
    Some(issue)
}

fn check_numeric_as_text(input: &CheckInput<'_>) -> Option<Issue> {
    let values = input.values;
    if values.non_missing_count() == 0 {
        return None;
    }

    if input.inferred.is_textual() {
        let ratio = values.numeric_ratio();
        if ratio < input.config.numeric_as_text_ratio {
            return None;
        }
        let mut issue = input.issue(
            IssueKind::NumericAsText,
            Severity::Medium,
            format!(
                "{:.0}% of values parse as numbers but the column is {}",
                ratio * 100.0,
                input.inferred
            ),
        );
        issue.magnitude = Some(ratio * 100.0);
        return Some(issue);
    }

    // numeric by majority, but some text would be lost on coercion
    if input.inferred == SemanticType::Numeric && values.is_text() {
        let stray = values.non_missing_count() - values.present_numbers().len();
        if stray == 0 {
            return None;
        }
        let mut issue = input.issue(
            IssueKind::NumericAsText,
            Severity::Medium,
            format!("{stray} non-numeric values would become missing on numeric conversion"),
        );
        issue.magnitude = Some(stray as f64);
        return Some(issue);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::compute_statistics;
    use crate::profiler::infer_semantic_type;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn detect_with(series: Series, config: &QualityConfig) -> Vec<Issue> {
        let values = ColumnValues::from_series(&series).unwrap();
        let inferred = infer_semantic_type(&values, config);
        let statistics = compute_statistics(&values, inferred, config);
        IssueDetector::detect(&CheckInput {
            values: &values,
            inferred,
            statistics: &statistics,
            config,
        })
    }

    fn detect(series: Series) -> Vec<Issue> {
        detect_with(series, &QualityConfig::default())
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    // ===== missing_values tests =====

    #[test]
    fn test_missing_severity_bands() {
        // 1 of 4 missing = 25% -> medium
        let issues = detect(Series::new("x".into(), &[Some(1.0), None, Some(3.0), Some(4.0)]));
        let missing = issues
            .iter()
            .find(|i| i.kind == IssueKind::MissingValues)
            .unwrap();
        assert_eq!(missing.severity, Severity::Medium);
        assert_eq!(missing.magnitude, Some(25.0));

        // 2 of 4 = 50% -> high
        let issues = detect(Series::new("x".into(), &[Some(1.0), None, None, Some(4.0)]));
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_missing_low_band() {
        let mut values: Vec<Option<f64>> = (0..40).map(|i| Some(i as f64)).collect();
        values[7] = None;
        // 2.5% missing
        let issues = detect(Series::new("x".into(), values));
        assert_eq!(issues[0].kind, IssueKind::MissingValues);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    // ===== outlier tests =====

    #[test]
    fn test_outlier_detected() {
        let issues = detect(Series::new("x".into(), &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]));
        assert_eq!(kinds(&issues), vec![IssueKind::Outliers]);
        // 1 of 6 rows = 16.7% -> high
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].magnitude, Some(1.0));
    }

    #[test]
    fn test_no_outliers_no_issue() {
        let issues = detect(Series::new("x".into(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert!(issues.is_empty());
    }

    // ===== text checks =====

    #[test]
    fn test_whitespace_and_casing() {
        let issues = detect(Series::new(
            "city".into(),
            &[
                "Paris", " paris", "Rome", "Rome", "rome ", "Paris", "Rome", "Paris", "Rome",
                "Paris",
            ],
        ));
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::Whitespace, IssueKind::InconsistentCasing]
        );
        assert_eq!(issues[0].magnitude, Some(2.0));
        assert_eq!(issues[1].magnitude, Some(2.0));
        assert!(issues[1].description.contains("'Paris' / 'paris'"));
    }

    #[test]
    fn test_casing_groups() {
        let groups = casing_groups(["A", "a ", "b", "A", "B"].into_iter());
        assert_eq!(groups, vec![vec!["A", "a"], vec!["b", "B"]]);
    }

    #[test]
    fn test_high_cardinality_only_for_categorical() {
        // 6 distinct of 10 rows = 60% -> categorical, high cardinality
        let issues = detect(Series::new(
            "c".into(),
            &["a", "b", "c", "d", "e", "f", "a", "b", "c", "d"],
        ));
        assert_eq!(kinds(&issues), vec![IssueKind::HighCardinality]);

        // identifier text is exempt
        let issues = detect(Series::new("id".into(), &["k1", "k2", "k3", "k4", "k5"]));
        assert!(issues.is_empty());
    }

    // ===== constant_column tests =====

    #[test]
    fn test_constant_column() {
        let issues = detect(Series::new("k".into(), &["x", "x", "x"]));
        assert_eq!(kinds(&issues), vec![IssueKind::ConstantColumn]);
        assert_eq!(issues[0].severity, Severity::Medium);

        let issues = detect(Series::new("one".into(), &[7i64]));
        assert!(kinds(&issues).contains(&IssueKind::ConstantColumn));
    }

    #[test]
    fn test_entirely_missing_column() {
        let issues = detect(Series::new("m".into(), &[None::<&str>, None]));
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::MissingValues, IssueKind::ConstantColumn]
        );
        assert_eq!(issues[0].severity, Severity::High);
    }

    // ===== numeric_as_text tests =====

    #[test]
    fn test_numeric_as_text_near_miss() {
        // 8 of 10 numeric: below 95%, at 80%
        let issues = detect(Series::new(
            "amount".into(),
            &["10", "12", "15", "n/k", "11", "13", "14", "16", "17", "unknown"],
        ));
        assert!(kinds(&issues).contains(&IssueKind::NumericAsText));
    }

    #[test]
    fn test_numeric_with_stray_text() {
        let mut values: Vec<String> = (10..29).map(|i| i.to_string()).collect();
        values.push("twelve".to_string());
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let issues = detect(Series::new("qty".into(), refs));
        let issue = issues
            .iter()
            .find(|i| i.kind == IssueKind::NumericAsText)
            .unwrap();
        assert_eq!(issue.magnitude, Some(1.0));
    }

    #[test]
    fn test_clean_boolean_has_no_issues() {
        let issues = detect(Series::new("flag".into(), &["0", "1", "1", "0"]));
        assert!(issues.is_empty());
    }
}
