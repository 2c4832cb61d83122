//! Table construction and column views.
//!
//! A table is a polars [`DataFrame`]. This module is the precondition gate
//! (ragged, duplicate or unreadable columns are rejected up front) and the
//! single place where physical columns are turned into the text and numeric
//! views that profiling and cleaning operate on.

use crate::error::{QualityError, Result};
use crate::utils::{is_missing_marker, is_numeric_dtype, parse_number};
use polars::prelude::*;
use std::collections::HashSet;

/// Build a table from raw text columns handed over by an upload layer.
///
/// Every column must have the same length and a unique, non-empty name.
pub fn from_text_columns<N>(columns: Vec<(N, Vec<Option<String>>)>) -> Result<DataFrame>
where
    N: Into<String>,
{
    if columns.is_empty() {
        return Ok(DataFrame::empty());
    }

    let mut seen = HashSet::new();
    let mut expected = None;
    let mut built = Vec::with_capacity(columns.len());

    for (name, values) in columns {
        let name: String = name.into();
        if name.trim().is_empty() {
            return Err(QualityError::PreconditionViolation(
                "column names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(QualityError::DuplicateColumn(name));
        }

        let rows = *expected.get_or_insert(values.len());
        if values.len() != rows {
            return Err(QualityError::RaggedColumns {
                column: name,
                expected: rows,
                found: values.len(),
            });
        }

        built.push(Series::new(name.as_str().into(), values).into_column());
    }

    Ok(DataFrame::new(built)?)
}

/// Reject tables containing columns that cannot be inspected as values.
pub fn validate(df: &DataFrame) -> Result<()> {
    for column in df.get_columns() {
        let dtype = column.dtype();
        if dtype.is_nested() {
            return Err(QualityError::UnreadableColumn {
                column: column.name().to_string(),
                dtype: dtype.to_string(),
            });
        }
    }
    Ok(())
}

/// Render every slot of a series as text, `None` for nulls.
///
/// Values are returned as stored; missing-marker handling is up to callers.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let rendered = series
        .cast(&DataType::String)
        .map_err(|_| QualityError::UnreadableColumn {
            column: series.name().to_string(),
            dtype: series.dtype().to_string(),
        })?;

    Ok(rendered
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Render a series as text with missing markers folded into `None`.
pub fn present_values(series: &Series) -> Result<Vec<Option<String>>> {
    Ok(text_values(series)?
        .into_iter()
        .map(|v| v.filter(|s| !is_missing_marker(s)))
        .collect())
}

/// Numeric view of a series.
///
/// Native numeric columns are cast; text columns are parsed value by value.
/// Anything else yields no numbers.
pub fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    if is_numeric_dtype(series.dtype()) {
        let cast = series.cast(&DataType::Float64)?;
        return Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }

    if matches!(series.dtype(), DataType::String) {
        return Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect());
    }

    Ok(vec![None; series.len()])
}

/// Look up a column by name as a materialized series.
pub fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| QualityError::ColumnNotFound(name.to_string()))
}

/// Full-row equality over all columns.
///
/// Returns a keep-mask (first occurrence of each row kept) and the number
/// of duplicate rows.
pub fn duplicate_row_mask(df: &DataFrame) -> Result<(Vec<bool>, usize)> {
    let height = df.height();
    let mut keys = vec![String::new(); height];

    for column in df.get_columns() {
        let values = present_values(column.as_materialized_series())?;
        for (key, value) in keys.iter_mut().zip(values) {
            match value {
                Some(v) => {
                    key.push('\u{2}');
                    key.push_str(&v);
                }
                None => key.push('\u{0}'),
            }
            key.push('\u{1f}');
        }
    }

    let mut seen = HashSet::with_capacity(height);
    let mut keep = Vec::with_capacity(height);
    let mut duplicates = 0;
    for key in keys {
        let first = seen.insert(key);
        if !first {
            duplicates += 1;
        }
        keep.push(first);
    }

    Ok((keep, duplicates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    // ===== from_text_columns tests =====

    #[test]
    fn test_from_text_columns_builds_table() {
        let df = from_text_columns(vec![
            ("name", text(&[Some("a"), Some("b")])),
            ("score", text(&[Some("1"), None])),
        ])
        .unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_from_text_columns_rejects_ragged() {
        let err = from_text_columns(vec![
            ("a", text(&[Some("1"), Some("2"), Some("3")])),
            ("b", text(&[Some("1")])),
        ])
        .unwrap_err();
        assert_eq!(err.error_code(), "RAGGED_COLUMNS");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_from_text_columns_rejects_duplicate_names() {
        let err = from_text_columns(vec![
            ("a", text(&[Some("1")])),
            ("a", text(&[Some("2")])),
        ])
        .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_COLUMN");
    }

    #[test]
    fn test_from_text_columns_empty() {
        let df = from_text_columns(Vec::<(String, Vec<Option<String>>)>::new()).unwrap();
        assert_eq!(df.shape(), (0, 0));
    }

    // ===== view tests =====

    #[test]
    fn test_present_values_folds_markers() {
        let s = Series::new("x".into(), &[Some("a"), Some("N/A"), None, Some(" ")]);
        assert_eq!(
            present_values(&s).unwrap(),
            vec![Some("a".to_string()), None, None, None]
        );
    }

    #[test]
    fn test_numeric_values() {
        let ints = Series::new("i".into(), &[Some(1i64), None, Some(3)]);
        assert_eq!(
            numeric_values(&ints).unwrap(),
            vec![Some(1.0), None, Some(3.0)]
        );

        let strs = Series::new("s".into(), &["4", "x", " 5.5 "]);
        assert_eq!(
            numeric_values(&strs).unwrap(),
            vec![Some(4.0), None, Some(5.5)]
        );

        let bools = Series::new("b".into(), &[true, false]);
        assert_eq!(numeric_values(&bools).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_series_lookup_missing_column() {
        let df = df!["a" => [1, 2]].unwrap();
        assert!(series(&df, "a").is_ok());
        assert_eq!(series(&df, "b").unwrap_err().error_code(), "COLUMN_NOT_FOUND");
    }

    // ===== duplicate_row_mask tests =====

    #[test]
    fn test_duplicate_row_mask() {
        let df = df![
            "a" => [Some("x"), Some("x"), Some("y"), None, Some("NA")],
            "b" => [1, 1, 1, 2, 2],
        ]
        .unwrap();
        let (keep, duplicates) = duplicate_row_mask(&df).unwrap();
        // null and "NA" are both missing
        assert_eq!(keep, vec![true, false, true, true, false]);
        assert_eq!(duplicates, 2);
    }
}
