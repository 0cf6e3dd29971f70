//! CLI command implementations
//!
//! This module contains all CLI command implementations and the exit-code
//! mapping they share.

pub mod convert;
pub mod generate;
pub mod ingest;
pub mod init;
pub mod locate;
pub mod report;
pub mod run;
pub mod status;
pub mod validate;

use crate::adapters::store::{create_student_store, StudentStore};
use crate::config::{load_config_or_default, RosterConfig};
use crate::core::summary::PipelineReport;
use crate::domain::RosterError;
use std::sync::Arc;

/// Exit code for a completed run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when some rows were dropped or lost
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code for configuration or argument errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the store cannot be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the process exit code
pub fn exit_code_for(error: &RosterError) -> i32 {
    match error {
        RosterError::Configuration(_) | RosterError::InvalidArgument(_) => EXIT_CONFIG,
        RosterError::Connection(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}

/// Exit code for a finished stage
pub fn report_exit_code(report: &PipelineReport) -> i32 {
    if report.is_successful() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL
    }
}

/// Logs and prints a failure, returning its exit code
pub(crate) fn fail(error: &RosterError, context: &str) -> i32 {
    crate::log_error_with_context!(error, context);
    eprintln!("❌ {context}");
    eprintln!("   Error: {error}");
    if let Some(path) = error.partial_output() {
        eprintln!("   Partial output kept at: {}", path.display());
    }
    exit_code_for(error)
}

/// Loads configuration, falling back to defaults when the file is absent
pub(crate) fn load(config_path: &str) -> Result<RosterConfig, i32> {
    load_config_or_default(config_path).map_err(|e| fail(&e, "Failed to load configuration"))
}

/// Builds the configured store and checks it is reachable
///
/// The schema is created unless `dry_run` is set.
pub(crate) async fn connect_store(
    config: &RosterConfig,
    dry_run: bool,
) -> Result<Arc<dyn StudentStore>, i32> {
    let store = create_student_store(config)
        .await
        .map_err(|e| fail(&e, "Failed to create store"))?;

    store.test_connection().await.map_err(|e| {
        fail(&e, "Failed to connect to store");
        EXIT_CONNECTION
    })?;

    if !dry_run {
        store
            .ensure_schema()
            .await
            .map_err(|e| fail(&e, "Failed to prepare store schema"))?;
    }

    Ok(store)
}

/// Prints a stage report
pub(crate) fn print_report(report: &PipelineReport) {
    println!();
    println!("📊 {} summary:", capitalize(&report.operation.to_string()));
    println!("  Rows processed: {}", report.rows_processed);
    println!("  Rows written: {}", report.rows_persisted);
    if report.rows_failed > 0 {
        println!("  Rows rejected: {}", report.rows_failed);
    }
    if report.fields_defaulted > 0 {
        println!("  Rows with defaulted fields: {}", report.fields_defaulted);
    }
    if report.batches_written + report.batches_failed > 0 {
        println!(
            "  Batches: {} written, {} failed ({} rows lost)",
            report.batches_written, report.batches_failed, report.rows_lost
        );
    }
    if let Some(ref path) = report.output_path {
        println!("  Output: {}", path.display());
    }
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());

    if report.dry_run {
        println!("  🔍 Dry run: nothing was written to the store");
    }

    let shown: Vec<_> = report.diagnostics.iter().take(10).collect();
    if !shown.is_empty() && !report.is_successful() {
        println!();
        println!("⚠️  Problems encountered:");
        for diagnostic in shown {
            println!("  - [{}] {}", diagnostic.position, diagnostic.message);
        }
        let hidden = report.diagnostics.len().saturating_sub(10) as u64 + report.diagnostics_truncated;
        if hidden > 0 {
            println!("  ... and {hidden} more");
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::Operation;
    use test_case::test_case;

    #[test_case(RosterError::Configuration("x".into()), EXIT_CONFIG ; "configuration")]
    #[test_case(RosterError::InvalidArgument("x".into()), EXIT_CONFIG ; "argument")]
    #[test_case(RosterError::Connection("x".into()), EXIT_CONNECTION ; "connection")]
    #[test_case(RosterError::InvalidInput("x".into()), EXIT_FATAL ; "input")]
    #[test_case(RosterError::Spreadsheet("x".into()), EXIT_FATAL ; "spreadsheet")]
    fn test_exit_code_for(error: RosterError, expected: i32) {
        assert_eq!(exit_code_for(&error), expected);
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = PipelineReport::new(Operation::Ingest);
        assert_eq!(report_exit_code(&report), EXIT_SUCCESS);

        report.record_rejected(2, "bad line");
        assert_eq!(report_exit_code(&report), EXIT_PARTIAL);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ingest"), "Ingest");
        assert_eq!(capitalize(""), "");
    }
}
