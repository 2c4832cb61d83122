//! Report rendering.
//!
//! Text renderings of a profile, role suggestion and cleaning plan for
//! terminals, and a [`QualityReport`] bundling them for JSON output.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_quality::reporting::ReportGenerator;
//!
//! print!("{}", ReportGenerator::render_issue_table(&profile));
//! let report = ReportGenerator::build_report(Some("data.csv"), &profile, &roles, &plan, None);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod generator;

pub use generator::{QualityReport, ReportGenerator};
