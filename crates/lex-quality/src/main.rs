//! CLI entry point for the data quality engine.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_quality::{
    CasingStyle, CleaningExecutor, CleaningLog, CleaningPlan, CleaningPlanBuilder, DataProfiler,
    QualityConfig, ReportGenerator, RoleSuggester,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Which planned actions to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliApply {
    /// Profile and plan only
    None,
    /// Execute the actions marked safe
    Safe,
    /// Execute every planned action
    All,
}

/// CLI-compatible casing style enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCasingStyle {
    /// Most frequent spelling in each group
    Dominant,
    /// Title Case
    Title,
}

impl From<CliCasingStyle> for CasingStyle {
    fn from(cli: CliCasingStyle) -> Self {
        match cli {
            CliCasingStyle::Dominant => CasingStyle::Dominant,
            CliCasingStyle::Title => CasingStyle::Title,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Data quality profiling and cleaning-plan engine",
    long_about = "Profiles a CSV file, ranks its data-quality issues, suggests column roles \
                  and proposes a cleaning plan.\n\n\
                  EXAMPLES:\n  \
                  # Profile and print the plan\n  \
                  lex-quality -i data.csv\n\n  \
                  # Apply the safe actions and write the cleaned table\n  \
                  lex-quality -i data.csv --apply safe -o cleaned.csv\n\n  \
                  # Everything as JSON\n  \
                  lex-quality -i data.csv --apply all --json | jq .plan_records"
)]
struct Args {
    /// Path to the CSV file to profile
    #[arg(short, long)]
    input: String,

    /// Which planned actions to execute
    #[arg(long, value_enum, default_value = "none")]
    apply: CliApply,

    /// Write the cleaned table to this CSV path (requires --apply)
    #[arg(short, long)]
    output: Option<String>,

    /// Output a JSON report to stdout instead of text
    ///
    /// Disables all logging so stdout only carries the report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// IQR fence multiplier for outlier detection
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Distinct ratio above which a categorical column is high-cardinality
    #[arg(long, default_value = "0.5")]
    high_cardinality_ratio: f64,

    /// Casing style for standardize_casing actions
    #[arg(long, value_enum, default_value = "dominant")]
    casing: CliCasingStyle,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled entirely.
fn init_logging(level: &str, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }
    if args.output.is_some() && args.apply == CliApply::None {
        return Err(anyhow!("--output requires --apply safe or --apply all"));
    }

    let config = QualityConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .high_cardinality_ratio(args.high_cardinality_ratio)
        .casing_style(args.casing.into())
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let df = load_csv(&args.input)?;
    info!("Dataset loaded: {:?}", df.shape());

    let profile = DataProfiler::profile_dataset(&df, &config)?;
    let roles = RoleSuggester::suggest(&profile);
    let plan = CleaningPlanBuilder::build(&profile, &config);

    let outcome = match args.apply {
        CliApply::None => None,
        CliApply::Safe => Some(CleaningExecutor::execute(&df, &plan, &plan.safe_selection())),
        CliApply::All => Some(CleaningExecutor::execute(&df, &plan, &plan.full_selection())),
    };

    if let (Some(path), Some(outcome)) = (&args.output, &outcome) {
        let mut cleaned = outcome.table.clone();
        write_csv(&mut cleaned, path)?;
        info!("Cleaned table written to: {}", path);
    }

    let log = outcome.as_ref().map(|o| &o.log);
    if args.json {
        let report = ReportGenerator::build_report(Some(&args.input), &profile, &roles, &plan, log);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&args, &ReportSections {
            issues: ReportGenerator::render_issue_table(&profile),
            columns: ReportGenerator::render_columns(&profile),
            roles: ReportGenerator::render_roles(&roles),
            plan: &plan,
            log,
        });
    }

    Ok(())
}

struct ReportSections<'a> {
    issues: String,
    columns: String,
    roles: String,
    plan: &'a CleaningPlan,
    log: Option<&'a CleaningLog>,
}

/// Print the human-readable report.
///
/// Uses `println!` rather than logging: this is the primary output.
fn print_summary(args: &Args, sections: &ReportSections<'_>) {
    println!("\n{}", "=".repeat(80));
    println!("DATA QUALITY REPORT: {}", args.input);
    println!("{}\n", "=".repeat(80));

    println!("ISSUES");
    println!("{}", "-".repeat(40));
    print!("{}", sections.issues);
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    print!("{}", sections.columns);
    println!();

    println!("ROLES");
    println!("{}", "-".repeat(40));
    print!("{}", sections.roles);
    println!();

    println!("PLAN");
    println!("{}", "-".repeat(40));
    print!("{}", ReportGenerator::render_plan(sections.plan));
    println!();

    match sections.log {
        Some(log) => {
            println!("CLEANING LOG");
            println!("{}", "-".repeat(40));
            if log.is_empty() {
                println!("No actions selected.");
            } else {
                println!("{}", log.to_text());
            }
            if let Some(path) = &args.output {
                println!("\nCleaned table: {path}");
            }
        }
        None => println!("Use --apply safe|all to execute the plan"),
    }
    println!("{}", "=".repeat(80));
}

/// Load a CSV, retrying without quote handling if the first pass fails.
fn load_csv(path: &str) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| {
            error!("Could not parse {}: {}", path, e);
            e.into()
        })
}

fn write_csv(df: &mut DataFrame, path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
