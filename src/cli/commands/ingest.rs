//! Ingest command implementation
//!
//! Loads a CSV file into the configured store in batches.

use super::{connect_store, fail, load, print_report, report_exit_code, EXIT_CONFIG};
use crate::config::RosterConfig;
use crate::core::ingest::Ingestor;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// CSV file to ingest
    pub input: PathBuf,

    /// Dry run mode - form batches without writing to the store
    #[arg(long)]
    pub dry_run: bool,

    /// Override rows per store write
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Applies `--dry-run` and `--batch-size` to a loaded configuration
///
/// Returns the exit code when the result no longer validates.
pub(crate) fn apply_overrides(
    config: &mut RosterConfig,
    dry_run: bool,
    batch_size: Option<usize>,
) -> Result<(), i32> {
    if dry_run {
        tracing::info!("Enabling dry-run mode from CLI");
        config.application.dry_run = true;
    }
    if let Some(size) = batch_size {
        tracing::info!(batch_size = size, "Overriding batch size from CLI");
        config.ingestion.batch_size = size;
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration validation failed");
        eprintln!("Configuration validation failed: {e}");
        return Err(EXIT_CONFIG);
    }
    Ok(())
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting ingest command");

        let mut config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Err(code) = apply_overrides(&mut config, self.dry_run, self.batch_size) {
            return Ok(code);
        }

        let dry_run = config.application.dry_run;
        if dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the store");
            println!();
        }

        let store = match connect_store(&config, dry_run).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        println!(
            "🚀 Ingesting {} into {} (batch size {})...",
            self.input.display(),
            store.backend_name(),
            config.ingestion.batch_size
        );

        let ingestor = Ingestor::new(store, &config.ingestion, dry_run);
        match ingestor.ingest(&self.input).await {
            Ok(report) => {
                print_report(&report);
                Ok(report_exit_code(&report))
            }
            Err(e) => Ok(fail(&e, "Ingestion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_applied() {
        let mut config = RosterConfig::default();
        apply_overrides(&mut config, true, Some(250)).unwrap();
        assert!(config.application.dry_run);
        assert_eq!(config.ingestion.batch_size, 250);
    }

    #[test]
    fn test_invalid_batch_size_rejected() {
        let mut config = RosterConfig::default();
        assert_eq!(apply_overrides(&mut config, false, Some(0)), Err(EXIT_CONFIG));
    }

    #[tokio::test]
    async fn test_ingest_with_bad_lines_is_partial() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.csv");
        std::fs::write(
            &input,
            "studentId,firstName,lastName,DOB,class,score\n\
             1,Jo,Smith,2001-05-01,Class2,60\n\
             2,broken\n",
        )
        .unwrap();

        let args = IngestArgs {
            input,
            dry_run: false,
            batch_size: None,
        };
        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 1);
    }
}
