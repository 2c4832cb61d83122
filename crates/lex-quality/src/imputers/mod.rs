//! Imputation module for handling missing values.
//!
//! Median for numeric columns, mode for categorical/boolean columns and
//! forward fill for datetime columns.

mod statistical;

pub use statistical::StatisticalImputer;
