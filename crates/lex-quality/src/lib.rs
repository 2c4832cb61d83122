//! Data Quality Profiling & Cleaning-Plan Library
//!
//! Profiles arbitrary tables, ranks their data-quality defects, suggests
//! column roles and proposes a reviewable cleaning plan, built with Rust and
//! Polars.
//!
//! # Overview
//!
//! - **Profiling**: semantic type inference, descriptive statistics and
//!   issue detection per column ([`DataProfiler`])
//! - **Role Suggestion**: id / target / time / feature roles from a
//!   versioned rule table ([`RoleSuggester`])
//! - **Cleaning Plan**: ordered, deduplicated actions with safe/unsafe
//!   flags ([`CleaningPlanBuilder`])
//! - **Cleaning**: applies a selected subset to a copy of the table and
//!   writes an audit log ([`CleaningExecutor`])
//!
//! Every stage is a pure function of its input. Nothing mutates the
//! caller's table; cleaning always returns a new one.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_quality::{
//!     CleaningExecutor, CleaningPlanBuilder, DataProfiler, QualityConfig, RoleSuggester,
//! };
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! let config = QualityConfig::default();
//! let profile = DataProfiler::profile_dataset(&df, &config)?;
//! let roles = RoleSuggester::suggest(&profile);
//! let plan = CleaningPlanBuilder::build(&profile, &config);
//!
//! let outcome = CleaningExecutor::execute(&df, &plan, &plan.safe_selection());
//! println!("{}", outcome.log.to_text());
//! ```
//!
//! Or keep everything together in a [`CleaningSession`]:
//!
//! ```rust,ignore
//! let mut session = CleaningSession::new(df, QualityConfig::default())?;
//! session.select(ActionKey::new(ActionKind::ImputeMissing, Some("age")))?;
//! let outcome = session.execute();
//! session.refresh(outcome.table)?;
//! ```
//!
//! # Configuration
//!
//! Use [`QualityConfig`] to adjust thresholds:
//!
//! ```rust,ignore
//! use lex_quality::config::*;
//!
//! let config = QualityConfig::builder()
//!     .high_cardinality_ratio(0.6)        // Flag categoricals above 60% unique
//!     .missing_severity(10.0, 40.0)       // medium above 10%, high above 40%
//!     .iqr_multiplier(3.0)                // Only far-out outliers
//!     .casing_style(CasingStyle::Title)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod filters;
mod imputers;
pub mod insights;
pub mod planner;
pub mod profiler;
mod quality;
pub mod reporting;
pub mod roles;
pub mod session;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    ActionStatus, CleaningExecutor, CleaningLog, CleaningLogEntry, CleaningOutcome,
};
pub use config::{CasingStyle, ConfigValidationError, QualityConfig, QualityConfigBuilder};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use filters::{ColumnFilterOption, FilterOption, FilterSet, apply_filters, filter_options};
pub use insights::{MappedStatistics, mapped_statistics};
pub use planner::{
    ActionKey, ActionKind, ActionRecord, ActionSelection, CleaningAction, CleaningPlan,
    CleaningPlanBuilder, ImputeMethod, PlannedAction,
};
pub use profiler::DataProfiler;
pub use reporting::{QualityReport, ReportGenerator};
pub use roles::{RULESET_VERSION, Role, RoleEvidence, RoleSuggester, RoleSuggestion};
pub use session::CleaningSession;
pub use types::{
    ColumnProfile, ColumnStatistics, DatasetProfile, Issue, IssueKind, SemanticType, Severity,
};

static_assertions::assert_impl_all!(DatasetProfile: Send, Sync);
static_assertions::assert_impl_all!(RoleSuggestion: Send, Sync);
static_assertions::assert_impl_all!(CleaningPlan: Send, Sync);
static_assertions::assert_impl_all!(CleaningLog: Send, Sync);
