//! Row filters over role-mapped columns.
//!
//! Categorical features filter by an allowed value set, numeric features by
//! an inclusive range. Filtering returns a new table.

use crate::error::Result;
use crate::roles::RoleSuggestion;
use crate::table::{self, numeric_values, present_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The choices a column offers to a filter widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterOption {
    /// Sorted distinct non-missing values.
    Categories { values: Vec<String> },
    Range { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilterOption {
    pub column: String,
    pub option: FilterOption,
}

/// Filter options for the feature columns of `roles` present in `df`.
///
/// Numeric columns without any numeric value offer nothing.
pub fn filter_options(df: &DataFrame, roles: &RoleSuggestion) -> Result<Vec<ColumnFilterOption>> {
    let mut options = Vec::new();

    for column in &roles.categorical_features {
        let Ok(series) = table::series(df, column) else {
            continue;
        };
        let values: BTreeSet<String> = present_values(series)?.into_iter().flatten().collect();
        options.push(ColumnFilterOption {
            column: column.clone(),
            option: FilterOption::Categories {
                values: values.into_iter().collect(),
            },
        });
    }

    for column in &roles.numeric_features {
        let Ok(series) = table::series(df, column) else {
            continue;
        };
        let numbers: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
        let min = numbers.iter().copied().reduce(f64::min);
        let max = numbers.iter().copied().reduce(f64::max);
        if let (Some(min), Some(max)) = (min, max) {
            options.push(ColumnFilterOption {
                column: column.clone(),
                option: FilterOption::Range { min, max },
            });
        }
    }

    Ok(options)
}

/// Selected filter values. Empty category sets do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub categories: BTreeMap<String, BTreeSet<String>>,
    pub ranges: BTreeMap<String, (f64, f64)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_range(mut self, column: impl Into<String>, low: f64, high: f64) -> Self {
        self.ranges.insert(column.into(), (low, high));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeSet::is_empty) && self.ranges.is_empty()
    }
}

/// Keep rows whose categorical values are allowed and whose numeric values
/// fall inside the ranges. Missing values never pass an active filter.
pub fn apply_filters(df: &DataFrame, filters: &FilterSet) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];

    for (column, allowed) in &filters.categories {
        if allowed.is_empty() {
            continue;
        }
        let values = present_values(table::series(df, column)?)?;
        for (flag, value) in keep.iter_mut().zip(values) {
            *flag &= value.is_some_and(|v| allowed.contains(&v));
        }
    }

    for (column, &(low, high)) in &filters.ranges {
        let numbers = numeric_values(table::series(df, column)?)?;
        for (flag, number) in keep.iter_mut().zip(numbers) {
            *flag &= number.is_some_and(|x| x >= low && x <= high);
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!("Filters kept {} of {} rows", filtered.height(), df.height());
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "course" => [Some("math"), Some("art"), Some("math"), None, Some("bio")],
            "hours" => [Some(10.0), Some(4.0), None, Some(7.0), Some(12.0)],
        ]
        .unwrap()
    }

    fn roles() -> RoleSuggestion {
        RoleSuggestion {
            numeric_features: vec!["hours".to_string(), "gone".to_string()],
            categorical_features: vec!["course".to_string()],
            ..RoleSuggestion::default()
        }
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&sample(), &roles()).unwrap();
        assert_eq!(
            options,
            vec![
                ColumnFilterOption {
                    column: "course".to_string(),
                    option: FilterOption::Categories {
                        values: vec!["art".to_string(), "bio".to_string(), "math".to_string()],
                    },
                },
                ColumnFilterOption {
                    column: "hours".to_string(),
                    option: FilterOption::Range { min: 4.0, max: 12.0 },
                },
            ]
        );
    }

    #[test]
    fn test_apply_category_and_range() {
        let filters = FilterSet::new()
            .with_categories("course", ["math", "bio"])
            .with_range("hours", 5.0, 20.0);
        let filtered = apply_filters(&sample(), &filters).unwrap();
        // row 2 has no hours, row 3 no course
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let filters = FilterSet::new().with_categories("course", Vec::<String>::new());
        assert!(filters.is_empty());
        assert_eq!(apply_filters(&sample(), &filters).unwrap().height(), 5);
    }

    #[test]
    fn test_unknown_column_errors() {
        let filters = FilterSet::new().with_range("nope", 0.0, 1.0);
        let err = apply_filters(&sample(), &filters).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
