//! Text sanitization: whitespace trimming and casing standardization.

use super::StepReport;
use crate::config::CasingStyle;
use crate::error::{QualityError, Result};
use crate::table::{self, text_values};
use crate::utils::{is_missing_marker, title_case, value_counts};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

fn text_column<'a>(df: &'a DataFrame, column: &str, action: &str) -> Result<&'a Series> {
    let series = table::series(df, column)?;
    if series.dtype() != &DataType::String {
        return Err(QualityError::not_applicable(
            format!("{action}({column})"),
            format!("column '{column}' holds {} values, not text", series.dtype()),
        ));
    }
    Ok(series)
}

/// Trim leading and trailing whitespace from every value of a text column.
pub(crate) fn strip_whitespace(df: &mut DataFrame, column: &str) -> Result<StepReport> {
    let values = text_values(text_column(df, column, "strip_whitespace")?)?;

    let mut changed = 0;
    let cleaned: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|v| {
                let trimmed = v.trim();
                if trimmed.len() == v.len() {
                    v
                } else {
                    changed += 1;
                    trimmed.to_string()
                }
            })
        })
        .collect();

    df.replace(column, Series::new(column.into(), cleaned))?;
    debug!("Trimmed {} values in '{}'", changed, column);

    Ok(StepReport::new(
        changed,
        format!("Trimmed whitespace from {changed} values in '{column}'"),
    ))
}

/// Rewrite every spelling of a case-folded value to one canonical spelling.
///
/// Surrounding whitespace is kept; only the trimmed core is rewritten.
pub(crate) fn standardize_casing(
    df: &mut DataFrame,
    column: &str,
    style: CasingStyle,
) -> Result<StepReport> {
    let values = text_values(text_column(df, column, "standardize_casing")?)?;
    let canonical = canonical_spellings(&values, style);

    let mut changed = 0;
    let standardized: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|v| {
                let core = v.trim();
                match canonical.get(&core.to_lowercase()) {
                    Some(target) if target != core => {
                        changed += 1;
                        let start = v.len() - v.trim_start().len();
                        let end = v.trim_end().len();
                        format!("{}{}{}", &v[..start], target, &v[end..])
                    }
                    _ => v,
                }
            })
        })
        .collect();

    df.replace(column, Series::new(column.into(), standardized))?;

    Ok(StepReport::new(
        changed,
        format!(
            "Standardized casing of {changed} values in '{column}' ({} style)",
            style.as_str()
        ),
    ))
}

/// Case-folded value -> canonical spelling. Missing markers are left alone.
fn canonical_spellings(values: &[Option<String>], style: CasingStyle) -> HashMap<String, String> {
    let cores = values
        .iter()
        .flatten()
        .filter(|v| !is_missing_marker(v))
        .map(|v| v.trim());

    let mut canonical = HashMap::new();
    // most frequent first, ties in first-seen order
    for (spelling, _) in value_counts(cores) {
        let folded = spelling.to_lowercase();
        if !canonical.contains_key(&folded) {
            let target = match style {
                CasingStyle::Dominant => spelling,
                CasingStyle::Title => title_case(&spelling),
            };
            canonical.insert(folded, target);
        }
    }
    canonical
}
