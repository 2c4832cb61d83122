//! Per-column value view shared by inference, statistics and issue checks.

use crate::error::Result;
use crate::table::{numeric_values, present_values};
use polars::prelude::*;
use std::collections::HashSet;

/// A column rendered once into text and numeric views.
///
/// `present[i]` is `None` for nulls and missing markers; `numbers[i]` is the
/// parsed number of slot `i`, if it has one.
#[derive(Debug, Clone)]
pub(crate) struct ColumnValues {
    pub name: String,
    pub dtype: DataType,
    pub present: Vec<Option<String>>,
    pub numbers: Vec<Option<f64>>,
}

impl ColumnValues {
    pub fn from_series(series: &Series) -> Result<Self> {
        Ok(Self {
            name: series.name().to_string(),
            dtype: series.dtype().clone(),
            present: present_values(series)?,
            numbers: numeric_values(series)?,
        })
    }

    pub fn row_count(&self) -> usize {
        self.present.len()
    }

    /// Non-missing values, in row order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.present.iter().filter_map(|v| v.as_deref())
    }

    pub fn non_missing_count(&self) -> usize {
        self.present.iter().filter(|v| v.is_some()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.row_count() - self.non_missing_count()
    }

    pub fn distinct(&self) -> HashSet<&str> {
        self.values().collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.distinct().len()
    }

    /// Numbers of the non-missing slots, in row order.
    pub fn present_numbers(&self) -> Vec<f64> {
        self.present
            .iter()
            .zip(&self.numbers)
            .filter_map(|(text, number)| text.as_ref().and(*number))
            .collect()
    }

    /// Share of non-missing values that parse as numbers.
    pub fn numeric_ratio(&self) -> f64 {
        let total = self.non_missing_count();
        if total == 0 {
            return 0.0;
        }
        self.present_numbers().len() as f64 / total as f64
    }

    /// Stored as text (so values may carry whitespace or stray casing).
    pub fn is_text(&self) -> bool {
        matches!(self.dtype, DataType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_values_counts() {
        let s = Series::new(
            "score".into(),
            &[Some("10"), Some("x"), None, Some("NA"), Some("10")],
        );
        let values = ColumnValues::from_series(&s).unwrap();

        assert_eq!(values.row_count(), 5);
        assert_eq!(values.non_missing_count(), 3);
        assert_eq!(values.missing_count(), 2);
        assert_eq!(values.distinct_count(), 2);
        assert_eq!(values.present_numbers(), vec![10.0, 10.0]);
        assert!((values.numeric_ratio() - 2.0 / 3.0).abs() < 1e-12);
        assert!(values.is_text());
    }

    #[test]
    fn test_native_numeric_column() {
        let s = Series::new("n".into(), &[Some(1.5f64), None, Some(f64::NAN)]);
        let values = ColumnValues::from_series(&s).unwrap();

        // NaN renders as "NaN", which is a missing marker
        assert_eq!(values.non_missing_count(), 1);
        assert_eq!(values.present_numbers(), vec![1.5]);
        assert!(!values.is_text());
    }
}
