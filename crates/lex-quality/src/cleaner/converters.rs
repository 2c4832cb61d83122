//! Type conversion for cleaning.

use super::StepReport;
use crate::error::{QualityError, Result};
use crate::table::{self, present_values};
use crate::utils::{is_numeric_dtype, parse_number};
use polars::prelude::*;
use tracing::debug;

/// Coerce a text column to Float64.
///
/// Parseable values become numbers; values that do not parse become missing
/// and are counted as changed. Missing markers become null without being
/// counted. A column that is already numeric is left as is.
pub(crate) fn convert_to_numeric(df: &mut DataFrame, column: &str) -> Result<StepReport> {
    let series = table::series(df, column)?;

    if is_numeric_dtype(series.dtype()) {
        return Ok(StepReport::new(
            0,
            format!("'{column}' is already numeric ({})", series.dtype()),
        ));
    }
    if series.dtype() != &DataType::String {
        return Err(QualityError::not_applicable(
            format!("convert_to_numeric({column})"),
            format!("cannot coerce {} values to numbers", series.dtype()),
        ));
    }

    let mut coerced_to_missing = 0;
    let numbers: Vec<Option<f64>> = present_values(series)?
        .into_iter()
        .map(|value| {
            let text = value?;
            let parsed = parse_number(&text);
            if parsed.is_none() {
                coerced_to_missing += 1;
            }
            parsed
        })
        .collect();

    df.replace(column, Series::new(column.into(), numbers))?;
    debug!(
        "Converted '{}' to Float64, {} unparseable values set to missing",
        column, coerced_to_missing
    );

    Ok(StepReport::new(
        coerced_to_missing,
        format!(
            "Converted '{column}' to numeric; {coerced_to_missing} unparseable values set to missing"
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::numeric_values;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_text_column() {
        let mut df = df!["amount" => [Some("10"), Some(" 12.5"), Some("n/a"), Some("abc"), None]].unwrap();
        let report = convert_to_numeric(&mut df, "amount").unwrap();

        let series = table::series(&df, "amount").unwrap();
        assert_eq!(series.dtype(), &DataType::Float64);
        assert_eq!(
            numeric_values(series).unwrap(),
            vec![Some(10.0), Some(12.5), None, None, None]
        );
        assert_eq!(report.values_changed, 1);
    }

    #[test]
    fn test_native_numeric_is_noop() {
        let mut df = df!["n" => [1i64, 2, 3]].unwrap();
        let report = convert_to_numeric(&mut df, "n").unwrap();
        assert_eq!(report.values_changed, 0);
        assert_eq!(table::series(&df, "n").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_boolean_not_applicable() {
        let mut df = df!["b" => [true, false]].unwrap();
        let err = convert_to_numeric(&mut df, "b").unwrap_err();
        assert!(err.is_recoverable());
    }
}
