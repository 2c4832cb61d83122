//! Descriptive statistics per semantic type.
//!
//! Missing values never enter an aggregate. Aggregates with no input are
//! `None` rather than zero.

use super::column::ColumnValues;
use crate::config::QualityConfig;
use crate::types::{
    BooleanStats, CategoricalStats, ColumnStatistics, DatetimeStats, IdentifierStats,
    NumericStats, SemanticType, ValueCount,
};
use crate::utils::{
    boolean_token, iqr_bounds, mean, median, parse_datetime, quantile, sample_std, sorted_values,
    value_counts,
};
use chrono::{NaiveDateTime, Timelike};

/// Compute the statistics matching a column's inferred type.
pub(crate) fn compute_statistics(
    values: &ColumnValues,
    inferred: SemanticType,
    config: &QualityConfig,
) -> ColumnStatistics {
    match inferred {
        SemanticType::Numeric => {
            ColumnStatistics::Numeric(numeric_stats(&values.present_numbers(), config.iqr_multiplier))
        }
        SemanticType::Boolean => ColumnStatistics::Boolean(boolean_stats(values, config.top_n)),
        SemanticType::Categorical => ColumnStatistics::Categorical(CategoricalStats {
            distinct_count: values.distinct_count(),
            top_values: top_values(values, config.top_n),
        }),
        SemanticType::Datetime => ColumnStatistics::Datetime(datetime_stats(values)),
        SemanticType::IdentifierText => {
            let distinct_count = values.distinct_count();
            ColumnStatistics::Identifier(IdentifierStats {
                distinct_count,
                duplicate_count: values.non_missing_count() - distinct_count,
            })
        }
    }
}

/// Numeric summary plus IQR fences.
///
/// Outliers are only counted when the IQR is positive; a column whose middle
/// half is a single value has no usable fence.
fn numeric_stats(numbers: &[f64], multiplier: f64) -> NumericStats {
    let sorted = sorted_values(numbers);
    let bounds = iqr_bounds(&sorted, multiplier);

    let outlier_count = match bounds {
        Some((lower, upper, iqr)) if iqr > 0.0 => sorted
            .iter()
            .filter(|&&v| v < lower || v > upper)
            .count(),
        _ => 0,
    };

    NumericStats {
        count: sorted.len(),
        mean: mean(&sorted),
        median: median(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        q1: quantile(&sorted, 0.25),
        q3: quantile(&sorted, 0.75),
        iqr_bounds: bounds.map(|(lower, upper, _)| (lower, upper)),
        outlier_count,
    }
}

fn top_values(values: &ColumnValues, top_n: usize) -> Vec<ValueCount> {
    value_counts(values.values())
        .into_iter()
        .take(top_n)
        .map(|(value, count)| ValueCount { value, count })
        .collect()
}

fn boolean_stats(values: &ColumnValues, top_n: usize) -> BooleanStats {
    let mut true_count = 0;
    let mut false_count = 0;
    for value in values.values() {
        match boolean_token(value) {
            Some(true) => true_count += 1,
            Some(false) => false_count += 1,
            None => {}
        }
    }

    BooleanStats {
        distinct_count: values.distinct_count(),
        true_count,
        false_count,
        top_values: top_values(values, top_n),
    }
}

fn datetime_stats(values: &ColumnValues) -> DatetimeStats {
    let parsed: Vec<NaiveDateTime> = values.values().filter_map(parse_datetime).collect();
    let min = parsed.iter().min().copied();
    let max = parsed.iter().max().copied();

    let date_only = parsed
        .iter()
        .all(|dt| dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0);
    let render = |dt: NaiveDateTime| {
        if date_only {
            dt.format("%Y-%m-%d").to_string()
        } else {
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    };

    DatetimeStats {
        count: parsed.len(),
        min: min.map(render),
        max: max.map(render),
        span_days: min
            .zip(max)
            .map(|(lo, hi)| hi.signed_duration_since(lo).num_days()),
    }
}
