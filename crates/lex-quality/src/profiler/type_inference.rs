//! Semantic type inference.
//!
//! Ordered precedence, first match wins: datetime, boolean, numeric,
//! identifier text, categorical. A column that clears no rule (including an
//! entirely missing one) is categorical.

use super::column::ColumnValues;
use crate::config::QualityConfig;
use crate::types::SemanticType;
use crate::utils::{DtypeCategory, boolean_token, get_dtype_category, parse_datetime};
use tracing::debug;

/// Infer the semantic type of a column.
pub(crate) fn infer_semantic_type(values: &ColumnValues, config: &QualityConfig) -> SemanticType {
    if values.non_missing_count() == 0 {
        debug!("Column '{}' has no values; defaulting to categorical", values.name);
        return SemanticType::Categorical;
    }

    let inferred = if is_datetime_column(values) {
        SemanticType::Datetime
    } else if is_boolean_column(values) {
        SemanticType::Boolean
    } else if is_numeric_column(values, config) {
        SemanticType::Numeric
    } else if is_identifier_column(values, config) {
        SemanticType::IdentifierText
    } else {
        SemanticType::Categorical
    };

    debug!("Column '{}' inferred as {}", values.name, inferred);
    inferred
}

/// Every non-missing value parses under at least one date/time format.
fn is_datetime_column(values: &ColumnValues) -> bool {
    match get_dtype_category(&values.dtype) {
        DtypeCategory::Datetime => true,
        DtypeCategory::String => values.values().all(|v| parse_datetime(v).is_some()),
        _ => false,
    }
}

/// Distinct values fold into {0, 1, true, false, yes, no}.
fn is_boolean_column(values: &ColumnValues) -> bool {
    match get_dtype_category(&values.dtype) {
        DtypeCategory::Boolean => true,
        DtypeCategory::String | DtypeCategory::Numeric => values
            .distinct()
            .into_iter()
            .all(|v| boolean_token(v).is_some()),
        _ => false,
    }
}

fn is_numeric_column(values: &ColumnValues, config: &QualityConfig) -> bool {
    match get_dtype_category(&values.dtype) {
        DtypeCategory::Numeric => true,
        DtypeCategory::String => values.numeric_ratio() >= config.numeric_parse_ratio,
        _ => false,
    }
}

/// Near-unique text. A single distinct value is never an identifier.
fn is_identifier_column(values: &ColumnValues, config: &QualityConfig) -> bool {
    if get_dtype_category(&values.dtype) != DtypeCategory::String {
        return false;
    }
    let distinct = values.distinct_count();
    distinct >= 2
        && distinct as f64 / values.row_count() as f64 > config.identifier_distinct_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn infer(series: Series) -> SemanticType {
        let values = ColumnValues::from_series(&series).unwrap();
        infer_semantic_type(&values, &QualityConfig::default())
    }

    fn strings(values: &[&str]) -> Series {
        Series::new("col".into(), values)
    }

    #[test]
    fn test_datetime_strings() {
        assert_eq!(
            infer(strings(&["2024-01-05", "2024/02/10", "03/15/2024"])),
            SemanticType::Datetime
        );
    }

    #[test]
    fn test_one_bad_date_is_not_datetime() {
        assert_ne!(
            infer(strings(&["2024-01-05", "2024-02-10", "soon"])),
            SemanticType::Datetime
        );
    }

    #[test]
    fn test_zero_one_strings_are_boolean_before_numeric() {
        assert_eq!(infer(strings(&["0", "1", "1", "0"])), SemanticType::Boolean);
        assert_eq!(
            infer(strings(&["Yes", "no", "YES", "No"])),
            SemanticType::Boolean
        );
    }

    #[test]
    fn test_native_types() {
        assert_eq!(
            infer(Series::new("b".into(), &[true, false, true])),
            SemanticType::Boolean
        );
        assert_eq!(
            infer(Series::new("n".into(), &[1.5f64, 2.5, 9.0])),
            SemanticType::Numeric
        );
        assert_eq!(
            infer(Series::new("i".into(), &[0i64, 1, 1])),
            SemanticType::Boolean
        );
    }

    #[test]
    fn test_numeric_with_few_typos() {
        let mut values: Vec<String> = (0..19).map(|i| (i * 3).to_string()).collect();
        values.push("oops".to_string());
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        // 19 of 20 parse: exactly 95%
        assert_eq!(infer(strings(&refs)), SemanticType::Numeric);
    }

    #[test]
    fn test_identifier_text() {
        assert_eq!(
            infer(strings(&["A-100", "A-101", "A-102", "A-103", "A-104"])),
            SemanticType::IdentifierText
        );
    }

    #[test]
    fn test_categorical_default() {
        assert_eq!(
            infer(strings(&["red", "blue", "red", "green", "blue"])),
            SemanticType::Categorical
        );
    }

    #[test]
    fn test_single_value_is_not_identifier() {
        assert_eq!(infer(strings(&["only"])), SemanticType::Categorical);
    }

    #[test]
    fn test_all_missing_is_categorical() {
        assert_eq!(
            infer(Series::new("m".into(), &[None::<&str>, None, Some("NA")])),
            SemanticType::Categorical
        );
    }
}
