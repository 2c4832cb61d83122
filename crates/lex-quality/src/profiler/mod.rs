//! Data profiling module.
//!
//! This module profiles a table column by column:
//! - Type inference (datetime, boolean, numeric, identifier text, categorical)
//! - Type-specific descriptive statistics
//! - Quality issue detection (via [`crate::quality`])
//!
//! and assembles the results into a [`DatasetProfile`] in input column order.

mod column;
mod statistics;
mod type_inference;

use crate::config::QualityConfig;
use crate::error::Result;
use crate::quality::{CheckInput, IssueDetector};
use crate::table;
use crate::types::{ColumnProfile, DatasetProfile};
use polars::prelude::*;
use rand::prelude::*;
use tracing::{debug, info};

pub(crate) use column::ColumnValues;
pub(crate) use statistics::compute_statistics;
pub(crate) use type_inference::infer_semantic_type;

const SAMPLE_SEED: u64 = 42;

/// Data profiler for analyzing table structure and quality.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire table.
    ///
    /// Produces exactly one column profile per column, in column order. Fails
    /// only on malformed input (unreadable columns); an empty table yields an
    /// empty profile.
    pub fn profile_dataset(df: &DataFrame, config: &QualityConfig) -> Result<DatasetProfile> {
        table::validate(df)?;

        let mut columns = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            columns.push(Self::profile_column(column.as_materialized_series(), config)?);
        }

        let (_, duplicate_rows) = table::duplicate_row_mask(df)?;
        let row_count = df.height();
        let total_cells = row_count * df.width();
        let total_missing: usize = columns.iter().map(|c| c.missing_count).sum();

        let profile = DatasetProfile {
            row_count,
            column_count: df.width(),
            total_cells,
            total_missing,
            missing_pct: percent(total_missing, total_cells),
            duplicate_rows,
            duplicate_pct: percent(duplicate_rows, row_count),
            columns,
        };

        let counts = profile.severity_counts();
        info!(
            "Profiled {} rows x {} columns: {} high / {} medium / {} low issues, {} duplicate rows",
            profile.row_count,
            profile.column_count,
            counts.high,
            counts.medium,
            counts.low,
            profile.duplicate_rows
        );

        Ok(profile)
    }

    /// Profile a single column.
    pub fn profile_column(series: &Series, config: &QualityConfig) -> Result<ColumnProfile> {
        let values = ColumnValues::from_series(series)?;
        let inferred = infer_semantic_type(&values, config);
        let statistics = compute_statistics(&values, inferred, config);
        let issues = IssueDetector::detect(&CheckInput {
            values: &values,
            inferred,
            statistics: &statistics,
            config,
        });

        let row_count = values.row_count();
        let missing_count = values.missing_count();

        debug!(
            "Column '{}': {} ({} missing, {} issues)",
            values.name,
            inferred,
            missing_count,
            issues.len()
        );

        Ok(ColumnProfile {
            name: values.name.clone(),
            physical_dtype: series.dtype().to_string(),
            inferred_type: inferred,
            row_count,
            missing_count,
            missing_pct: percent(missing_count, row_count),
            distinct_count: values.distinct_count(),
            sample_values: sample_values(&values, config.sample_size),
            statistics,
            issues,
        })
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Up to `size` non-missing values, drawn with a fixed seed and kept in row
/// order so repeated profiling is identical.
fn sample_values(values: &ColumnValues, size: usize) -> Vec<String> {
    let present: Vec<&str> = values.values().collect();
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let mut picked: Vec<usize> = (0..present.len())
        .collect::<Vec<_>>()
        .choose_multiple(&mut rng, size.min(present.len()))
        .copied()
        .collect();
    picked.sort_unstable();
    picked.into_iter().map(|i| present[i].to_string()).collect()
}
