//! Statistical imputation methods.
//!
//! Median, mode and forward fill. Fill values are computed from the column
//! as it stands when the action runs. Missing markers in text columns count
//! as missing and are replaced along with nulls.

use crate::cleaner::StepReport;
use crate::error::{QualityError, Result};
use crate::planner::ImputeMethod;
use crate::table::{self, numeric_values, present_values};
use crate::utils::{
    format_number, is_datetime_dtype, is_numeric_dtype, median, mode_of, parse_number,
    sorted_values,
};
use polars::prelude::*;
use tracing::debug;

/// A filled replacement column.
struct Filled {
    series: Series,
    count: usize,
    /// Rendered fill value, for methods that use a single one.
    value: Option<String>,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the missing slots of `column` using `method`.
    pub(crate) fn impute(
        df: &mut DataFrame,
        column: &str,
        method: ImputeMethod,
    ) -> Result<StepReport> {
        let series = table::series(df, column)?;
        let filled = match method {
            ImputeMethod::Median => Self::median_fill(series)?,
            ImputeMethod::Mode => Self::mode_fill(series)?,
            ImputeMethod::ForwardFill => Self::forward_fill(series)?,
        };

        df.replace(column, filled.series)?;
        debug!(
            "Imputed {} values in '{}' by {}",
            filled.count,
            column,
            method.as_str()
        );

        let detail = match filled.value {
            Some(value) => format!(
                "Filled {} missing values in '{}' with {} {}",
                filled.count,
                column,
                method.as_str(),
                value
            ),
            None => format!(
                "Filled {} missing values in '{}' by {}",
                filled.count,
                column,
                method.as_str()
            ),
        };
        Ok(StepReport::new(filled.count, detail))
    }

    fn median_fill(series: &Series) -> Result<Filled> {
        let name = series.name().clone();

        if is_numeric_dtype(series.dtype()) {
            let mut numbers = numeric_values(series)?;
            let present: Vec<f64> = numbers.iter().flatten().copied().collect();
            let fill = median(&sorted_values(&present)).ok_or_else(|| no_values(series, "median"))?;
            let count = fill_with(&mut numbers, fill);
            return Ok(Filled {
                series: Series::new(name, numbers),
                count,
                value: Some(format_number(fill)),
            });
        }

        if series.dtype() == &DataType::String {
            let mut values = present_values(series)?;
            let present: Vec<f64> = values.iter().flatten().filter_map(|v| parse_number(v)).collect();
            let fill = median(&sorted_values(&present)).ok_or_else(|| no_values(series, "median"))?;
            let rendered = format_number(fill);
            let count = fill_with(&mut values, rendered.clone());
            return Ok(Filled {
                series: Series::new(name, values),
                count,
                value: Some(rendered),
            });
        }

        Err(unsupported(series, "median"))
    }

    fn mode_fill(series: &Series) -> Result<Filled> {
        let name = series.name().clone();

        match series.dtype() {
            DataType::Boolean => {
                let mut flags: Vec<Option<bool>> = series.bool()?.into_iter().collect();
                let rendered: Vec<&str> = flags
                    .iter()
                    .flatten()
                    .map(|&b| if b { "true" } else { "false" })
                    .collect();
                let fill = mode_of(rendered).ok_or_else(|| no_values(series, "mode"))?;
                let count = fill_with(&mut flags, fill == "true");
                Ok(Filled {
                    series: Series::new(name, flags),
                    count,
                    value: Some(fill),
                })
            }
            DataType::String => {
                let mut values = present_values(series)?;
                let fill = mode_of(values.iter().flatten().map(String::as_str))
                    .ok_or_else(|| no_values(series, "mode"))?;
                let count = fill_with(&mut values, fill.clone());
                Ok(Filled {
                    series: Series::new(name, values),
                    count,
                    value: Some(format!("'{fill}'")),
                })
            }
            dtype if is_numeric_dtype(dtype) => {
                let mut numbers = numeric_values(series)?;
                let rendered: Vec<String> = numbers.iter().flatten().map(|&v| format_number(v)).collect();
                let fill = mode_of(rendered.iter().map(String::as_str))
                    .and_then(|v| parse_number(&v))
                    .ok_or_else(|| no_values(series, "mode"))?;
                let count = fill_with(&mut numbers, fill);
                Ok(Filled {
                    series: Series::new(name, numbers),
                    count,
                    value: Some(format_number(fill)),
                })
            }
            _ => Err(unsupported(series, "mode")),
        }
    }

    /// Previous observed value; leading gaps take the first observed value.
    fn forward_fill(series: &Series) -> Result<Filled> {
        let name = series.name().clone();

        if is_datetime_dtype(series.dtype()) {
            if series.null_count() == series.len() {
                return Err(no_values(series, "forward fill"));
            }
            let before = series.null_count();
            let filled = series
                .fill_null(FillNullStrategy::Forward(None))?
                .fill_null(FillNullStrategy::Backward(None))?;
            let count = before - filled.null_count();
            return Ok(Filled {
                series: filled,
                count,
                value: None,
            });
        }

        let (series, count) = match series.dtype() {
            DataType::String => {
                let mut values = present_values(series)?;
                let count = fill_gaps(&mut values).ok_or_else(|| no_values(series, "forward fill"))?;
                (Series::new(name, values), count)
            }
            DataType::Boolean => {
                let mut flags: Vec<Option<bool>> = series.bool()?.into_iter().collect();
                let count = fill_gaps(&mut flags).ok_or_else(|| no_values(series, "forward fill"))?;
                (Series::new(name, flags), count)
            }
            dtype if is_numeric_dtype(dtype) => {
                let mut numbers = numeric_values(series)?;
                let count = fill_gaps(&mut numbers).ok_or_else(|| no_values(series, "forward fill"))?;
                (Series::new(name, numbers), count)
            }
            _ => return Err(unsupported(series, "forward fill")),
        };

        Ok(Filled {
            series,
            count,
            value: None,
        })
    }
}

fn no_values(series: &Series, method: &str) -> QualityError {
    QualityError::not_applicable(
        format!("impute_missing({})", series.name()),
        format!("no observed values to take a {method} from"),
    )
}

fn unsupported(series: &Series, method: &str) -> QualityError {
    QualityError::not_applicable(
        format!("impute_missing({})", series.name()),
        format!("{method} imputation does not apply to {} values", series.dtype()),
    )
}

/// Replace every gap with `value`; returns how many were filled.
fn fill_with<T: Clone>(values: &mut [Option<T>], value: T) -> usize {
    let mut count = 0;
    for slot in values.iter_mut().filter(|slot| slot.is_none()) {
        *slot = Some(value.clone());
        count += 1;
    }
    count
}

/// Forward fill then back fill. `None` when nothing is observed.
fn fill_gaps<T: Clone>(values: &mut [Option<T>]) -> Option<usize> {
    let first = values.iter().position(Option::is_some)?;
    let mut count = 0;

    let mut last = values[first].clone();
    for slot in values.iter_mut() {
        if slot.is_some() {
            last = slot.clone();
        } else {
            *slot = last.clone();
            count += 1;
        }
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::text_values;
    use pretty_assertions::assert_eq;

    fn impute(df: &mut DataFrame, column: &str, method: ImputeMethod) -> StepReport {
        StatisticalImputer::impute(df, column, method).unwrap()
    }

    // ===== median tests =====

    #[test]
    fn test_median_fill_numeric() {
        let mut df = df!["x" => [Some(10.0), Some(20.0), None, Some(40.0)]].unwrap();
        let report = impute(&mut df, "x", ImputeMethod::Median);

        assert_eq!(report.values_changed, 1);
        assert_eq!(
            numeric_values(table::series(&df, "x").unwrap()).unwrap(),
            vec![Some(10.0), Some(20.0), Some(20.0), Some(40.0)]
        );
        assert_eq!(report.detail, "Filled 1 missing values in 'x' with median 20");
    }

    #[test]
    fn test_median_fill_text_after_markers() {
        let mut df = df!["x" => [Some("1"), Some("n/a"), Some("3"), None]].unwrap();
        let report = impute(&mut df, "x", ImputeMethod::Median);
        assert_eq!(report.values_changed, 2);
        assert_eq!(
            text_values(table::series(&df, "x").unwrap()).unwrap(),
            vec![
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string()),
                Some("2".to_string()),
            ]
        );
    }

    #[test]
    fn test_median_all_missing_not_applicable() {
        let mut df = df!["x" => [None::<f64>, None]].unwrap();
        let err = StatisticalImputer::impute(&mut df, "x", ImputeMethod::Median).unwrap_err();
        assert_eq!(err.error_code(), "ACTION_NOT_APPLICABLE");
    }

    // ===== mode tests =====

    #[test]
    fn test_mode_fill_text_ties_first_seen() {
        let mut df = df!["c" => [Some("b"), Some("a"), None, Some("a"), Some("b")]].unwrap();
        impute(&mut df, "c", ImputeMethod::Mode);
        let values = text_values(table::series(&df, "c").unwrap()).unwrap();
        assert_eq!(values[2].as_deref(), Some("b"));
    }

    #[test]
    fn test_mode_fill_boolean() {
        let mut df = df!["f" => [Some(true), None, Some(false), Some(true)]].unwrap();
        let report = impute(&mut df, "f", ImputeMethod::Mode);
        assert_eq!(report.values_changed, 1);
        let flags: Vec<Option<bool>> = table::series(&df, "f")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(flags, vec![Some(true), Some(true), Some(false), Some(true)]);
    }

    // ===== forward fill tests =====

    #[test]
    fn test_forward_fill_text() {
        let mut df = df!["d" => [None, Some("2024-01-01"), None, Some("2024-01-03"), Some("NA")]].unwrap();
        let report = impute(&mut df, "d", ImputeMethod::ForwardFill);
        assert_eq!(report.values_changed, 3);
        let values = text_values(table::series(&df, "d").unwrap()).unwrap();
        let values: Vec<&str> = values.iter().map(|v| v.as_deref().unwrap()).collect();
        assert_eq!(
            values,
            vec!["2024-01-01", "2024-01-01", "2024-01-01", "2024-01-03", "2024-01-03"]
        );
    }

    #[test]
    fn test_fill_gaps() {
        let mut values = vec![None, Some(1), None, Some(3)];
        assert_eq!(fill_gaps(&mut values), Some(2));
        assert_eq!(values, vec![Some(1), Some(1), Some(1), Some(3)]);

        let mut empty: Vec<Option<i32>> = vec![None, None];
        assert_eq!(fill_gaps(&mut empty), None);
    }
}
