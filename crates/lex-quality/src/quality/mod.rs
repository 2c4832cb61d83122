//! Data quality analysis module.
//!
//! This module detects per-column quality issues such as missing values,
//! outliers, stray whitespace, inconsistent casing, high cardinality,
//! constant columns and numbers stored as text.

mod detector;

pub use detector::IssueDetector;
pub(crate) use detector::{CheckInput, casing_groups};
