//! IQR outlier clipping.
//!
//! Fences are recomputed from the column as it stands when the action runs,
//! so earlier steps (imputation, coercion) feed into them.

use super::StepReport;
use crate::error::{QualityError, Result};
use crate::table::{self, numeric_values, text_values};
use crate::utils::{format_number, iqr_bounds, is_numeric_dtype, sorted_values};
use polars::prelude::*;
use tracing::debug;

/// Clamp values of a numeric (or numeric-text) column to the IQR fences.
///
/// Native numeric columns come back as Float64. Text columns keep their
/// dtype and only the clipped values are rewritten.
pub(crate) fn clip_outliers(df: &mut DataFrame, column: &str, multiplier: f64) -> Result<StepReport> {
    let series = table::series(df, column)?;
    let is_text = series.dtype() == &DataType::String;
    if !is_numeric_dtype(series.dtype()) && !is_text {
        return Err(QualityError::not_applicable(
            format!("clip_outliers({column})"),
            format!("column '{column}' holds {} values", series.dtype()),
        ));
    }

    let numbers = numeric_values(series)?;
    let present: Vec<f64> = numbers.iter().flatten().copied().collect();
    let Some((lower, upper, iqr)) = iqr_bounds(&sorted_values(&present), multiplier) else {
        return Err(QualityError::not_applicable(
            format!("clip_outliers({column})"),
            format!("column '{column}' has no numeric values"),
        ));
    };

    if iqr == 0.0 {
        return Ok(StepReport::new(
            0,
            format!("IQR of '{column}' is 0; nothing clipped"),
        ));
    }

    let outside = |v: f64| v < lower || v > upper;
    let clipped_count = present.iter().filter(|&&v| outside(v)).count();

    let replacement = if is_text {
        let rewritten: Vec<Option<String>> = text_values(series)?
            .into_iter()
            .zip(&numbers)
            .map(|(text, number)| match number {
                Some(v) if outside(*v) => Some(format_number(v.clamp(lower, upper))),
                _ => text,
            })
            .collect();
        Series::new(column.into(), rewritten)
    } else {
        let clamped: Vec<Option<f64>> = numbers
            .iter()
            .map(|v| v.map(|x| x.clamp(lower, upper)))
            .collect();
        Series::new(column.into(), clamped)
    };

    df.replace(column, replacement)?;
    debug!(
        "Clipped {} values in '{}' to [{}, {}]",
        clipped_count, column, lower, upper
    );

    Ok(StepReport::new(
        clipped_count,
        format!("Clipped {clipped_count} outlier values in '{column}' to [{lower}, {upper}]"),
    ))
}
