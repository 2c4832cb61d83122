//! Shared utilities for profiling and cleaning.
//!
//! Value-level parsing (missing markers, numbers, booleans, dates) and the
//! order statistics used by both the profiler and the executor live here so
//! that detection and repair always agree on what a value means.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a physical polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date or datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Missing Values
// =============================================================================

/// Text tokens treated as an empty slot, compared after trim + lowercase.
pub const MISSING_MARKERS: [&str; 7] = ["", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Check if a raw text value stands for a missing slot.
///
/// ```rust,ignore
/// assert!(is_missing_marker("  N/A "));
/// assert!(is_missing_marker(""));
/// assert!(!is_missing_marker("0"));
/// ```
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// A single optional sign, digits, and at most one decimal point.
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("Invalid regex: number"));

/// Parse a text value as a number.
///
/// Surrounding whitespace is ignored; thousands separators, currency
/// symbols and exponents are not accepted.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if !NUMBER_PATTERN.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Boolean Tokens
// =============================================================================

pub const BOOLEAN_TRUE_TOKENS: [&str; 3] = ["1", "true", "yes"];
pub const BOOLEAN_FALSE_TOKENS: [&str; 3] = ["0", "false", "no"];

/// Interpret a value as a boolean token, if it is one.
///
/// Numeric spellings of zero and one (`"1.0"`, `"0"`) count as tokens.
pub fn boolean_token(s: &str) -> Option<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_TOKENS.contains(&lower.as_str()) {
        return Some(true);
    }
    if BOOLEAN_FALSE_TOKENS.contains(&lower.as_str()) {
        return Some(false);
    }
    match parse_number(&lower) {
        Some(v) if v == 1.0 => Some(true),
        Some(v) if v == 0.0 => Some(false),
        _ => None,
    }
}

// =============================================================================
// Date/Time Parsing
// =============================================================================

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%b-%Y", "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a text value as a timestamp under any of the supported formats.
///
/// Plain dates resolve to midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc())
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile of an ascending slice with linear interpolation at `p * (n - 1)`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Median of an ascending slice (mean of the middle pair for even lengths).
pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// Copy and sort values ascending.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// IQR fences `[Q1 - k * IQR, Q3 + k * IQR]` plus the IQR itself.
pub fn iqr_bounds(sorted: &[f64], multiplier: f64) -> Option<(f64, f64, f64)> {
    let q1 = quantile(sorted, 0.25)?;
    let q3 = quantile(sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr, iqr))
}

/// Pearson correlation over paired observations.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

// =============================================================================
// Frequency Utilities
// =============================================================================

/// Count values, most frequent first; ties keep first-seen order.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value; ties go to the first seen.
pub fn mode_of<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

// =============================================================================
// Text Utilities
// =============================================================================

/// Render a number for a text column: integral values without a fraction.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Title-case a value: a letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            result.push(c);
            prev_is_alpha = false;
        }
    }
    result
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
    }

    #[test]
    fn test_is_missing_marker() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("   "));
        assert!(is_missing_marker("N/A"));
        assert!(is_missing_marker(" null "));
        assert!(is_missing_marker("NaN"));
        assert!(!is_missing_marker("0"));
        assert!(!is_missing_marker("unknown"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_number("+.5"), Some(0.5));
        assert_eq!(parse_number("7."), Some(7.0));
        assert_eq!(parse_number("1,234"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("--1"), None);
        assert_eq!(parse_number("1e5"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_boolean_token() {
        assert_eq!(boolean_token("Yes"), Some(true));
        assert_eq!(boolean_token("FALSE"), Some(false));
        assert_eq!(boolean_token("1.0"), Some(true));
        assert_eq!(boolean_token("0"), Some(false));
        assert_eq!(boolean_token("2"), None);
        assert_eq!(boolean_token("maybe"), None);
    }

    #[test]
    fn test_parse_datetime() {
        let day = parse_datetime("2024-03-01").unwrap();
        assert_eq!(day.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 00:00");
        assert!(parse_datetime("03/15/2024").is_some());
        assert!(parse_datetime("2024-03-01 14:30:00").is_some());
        assert!(parse_datetime("2024-03-01T14:30:00Z").is_some());
        assert!(parse_datetime("2024-03-01 14:30:00.250").is_some());
        assert!(parse_datetime("2024").is_none());
        assert!(parse_datetime("12").is_none());
        assert!(parse_datetime("hello").is_none());
    }

    #[test]
    fn test_quantiles_and_median() {
        let sorted = sorted_values(&[5.0, 1.0, 100.0, 3.0, 2.0, 4.0]);
        assert_eq!(quantile(&sorted, 0.25), Some(2.25));
        assert_eq!(quantile(&sorted, 0.75), Some(4.75));
        assert_eq!(median(&sorted), Some(3.5));
        assert_eq!(median(&[10.0, 20.0, 40.0]), Some(20.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_iqr_bounds() {
        let sorted = sorted_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        let (lower, upper, iqr) = iqr_bounds(&sorted, 1.5).unwrap();
        assert_eq!(iqr, 2.5);
        assert_eq!(lower, -1.5);
        assert_eq!(upper, 8.5);
    }

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
        assert_eq!(sample_std(&[2.0, 4.0, 6.0]), Some(2.0));
        assert_eq!(sample_std(&[2.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_pearson() {
        let perfect = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        assert!((pearson(&perfect).unwrap() - 1.0).abs() < 1e-12);
        let flat = [(1.0, 5.0), (2.0, 5.0)];
        assert_eq!(pearson(&flat), None);
    }

    #[test]
    fn test_value_counts_ties_keep_first_seen() {
        let counts = value_counts(["b", "a", "a", "b", "c"]);
        assert_eq!(
            counts,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
        assert_eq!(mode_of(["x", "y", "y"]), Some("y".to_string()));
        assert_eq!(mode_of(std::iter::empty()), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("MALE"), "Male");
        assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(8.25), "8.25");
    }
}
