//! Structured statistics over role-mapped columns.
//!
//! This is the fact sheet a narrative or report layer consumes: totals,
//! a target summary, per-feature correlation with the target, per-category
//! target means and a per-period target trend. Columns named by the roles
//! but absent from the table are skipped.

use crate::error::Result;
use crate::roles::RoleSuggestion;
use crate::table::{self, present_values};
use crate::utils::{
    boolean_token, is_numeric_dtype, mean, median, parse_number, pearson, sample_std,
    sorted_values,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Percentage of ones, for a target whose values are all 0 or 1.
    pub positive_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub column: String,
    pub mean: Option<f64>,
    /// Pearson correlation with the target over rows where both are present.
    pub target_correlation: Option<f64>,
}

/// Target mean within one group of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub group: String,
    pub count: usize,
    pub target_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub column: String,
    pub groups: Vec<GroupMean>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedStatistics {
    pub total_records: usize,
    pub unique_entities: Option<usize>,
    pub target: Option<TargetSummary>,
    pub features: Vec<FeatureSummary>,
    pub breakdowns: Vec<CategoryBreakdown>,
    /// Target mean per distinct time value, in ascending order.
    pub time_trend: Vec<GroupMean>,
}

/// Compute the mapped statistics of `df` under `roles`.
pub fn mapped_statistics(df: &DataFrame, roles: &RoleSuggestion) -> Result<MappedStatistics> {
    let column = |name: &Option<String>| {
        name.as_deref()
            .and_then(|n| table::series(df, n).ok())
    };

    let unique_entities = match column(&roles.id) {
        Some(series) => Some(
            present_values(series)?
                .into_iter()
                .flatten()
                .collect::<HashSet<_>>()
                .len(),
        ),
        None => None,
    };

    let target = match column(&roles.target) {
        Some(series) => Some((series.name().to_string(), target_numbers(series)?)),
        None => None,
    };

    let mut features = Vec::new();
    for name in &roles.numeric_features {
        let Ok(series) = table::series(df, name) else {
            continue;
        };
        if target.as_ref().is_some_and(|(t, _)| t == name) {
            continue;
        }
        let numbers = target_numbers(series)?;
        let present: Vec<f64> = numbers.iter().flatten().copied().collect();
        let target_correlation = target.as_ref().and_then(|(_, target)| {
            let pairs: Vec<(f64, f64)> = numbers
                .iter()
                .zip(target)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect();
            pearson(&pairs)
        });
        features.push(FeatureSummary {
            column: name.clone(),
            mean: mean(&present),
            target_correlation,
        });
    }

    let mut breakdowns = Vec::new();
    let mut time_trend = Vec::new();
    if let Some((_, target_values)) = &target {
        for name in &roles.categorical_features {
            let Ok(series) = table::series(df, name) else {
                continue;
            };
            breakdowns.push(CategoryBreakdown {
                column: name.clone(),
                groups: group_means(series, target_values)?,
            });
        }
        if let Some(series) = column(&roles.time) {
            time_trend = group_means(series, target_values)?;
        }
    }

    Ok(MappedStatistics {
        total_records: df.height(),
        unique_entities,
        target: target.map(|(name, values)| summarize_target(name, &values)),
        features,
        breakdowns,
        time_trend,
    })
}

/// Numeric view that also reads booleans and boolean tokens as 1/0.
fn target_numbers(series: &Series) -> Result<Vec<Option<f64>>> {
    if is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Boolean {
        let cast = series.cast(&DataType::Float64)?;
        return Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }

    Ok(present_values(series)?
        .into_iter()
        .map(|v| {
            let v = v?;
            parse_number(&v).or_else(|| boolean_token(&v).map(|b| if b { 1.0 } else { 0.0 }))
        })
        .collect())
}

fn summarize_target(column: String, values: &[Option<f64>]) -> TargetSummary {
    let sorted = sorted_values(&values.iter().flatten().copied().collect::<Vec<_>>());
    let binary = !sorted.is_empty() && sorted.iter().all(|&v| v == 0.0 || v == 1.0);
    let mean = mean(&sorted);

    TargetSummary {
        column,
        count: sorted.len(),
        mean,
        median: median(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        positive_rate: if binary { mean.map(|m| m * 100.0) } else { None },
    }
}

/// Target mean per distinct non-missing group value, sorted by group.
fn group_means(series: &Series, target: &[Option<f64>]) -> Result<Vec<GroupMean>> {
    let mut groups: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();
    for (group, value) in present_values(series)?.into_iter().zip(target) {
        let Some(group) = group else {
            continue;
        };
        let entry = groups.entry(group).or_default();
        entry.0 += 1;
        if let Some(v) = value {
            entry.1.push(*v);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(group, (count, values))| GroupMean {
            group,
            count,
            target_mean: mean(&values),
        })
        .collect())
}
