//! Run command implementation
//!
//! Chains generate, convert and ingest against one configuration and one
//! store, so the in-process store can be used end to end.

use super::ingest::apply_overrides;
use super::{connect_store, fail, load, print_report, report_exit_code, EXIT_FATAL, EXIT_PARTIAL};
use crate::core::convert::Converter;
use crate::core::files::{FileCategory, OutputLayout};
use crate::core::generate::RecordGenerator;
use crate::core::ingest::Ingestor;
use crate::domain::RosterError;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of rows to generate
    #[arg(short = 'n', long)]
    pub count: u64,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dry run mode - form batches without writing to the store
    #[arg(long)]
    pub dry_run: bool,

    /// Override rows per store write
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(count = self.count, "Starting pipeline run");

        let mut config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Err(code) = apply_overrides(&mut config, self.dry_run, self.batch_size) {
            return Ok(code);
        }
        if let Some(seed) = self.seed {
            config.generation.seed = Some(seed);
        }
        let dry_run = config.application.dry_run;

        // Connect first so a bad store fails before any files are written
        let store = match connect_store(&config, dry_run).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let layout = OutputLayout::new(&config.storage);
        let mut exit_code = 0;

        println!("🚀 [1/3] Generating {} rows...", self.count);
        let generator = RecordGenerator::new(config.generation.clone(), layout.clone());
        let count = self.count;
        let generated = match tokio::task::spawn_blocking(move || generator.generate(count)).await? {
            Ok(report) => report,
            Err(e) => return Ok(fail(&e, "Generation failed")),
        };
        print_report(&generated);
        exit_code = exit_code.max(report_exit_code(&generated));

        let Some(workbook) = generated.output_path.clone() else {
            let e = RosterError::Output {
                path: layout.dir(FileCategory::Excel),
                message: "generator reported no output file".to_string(),
            };
            fail(&e, "Generation failed");
            return Ok(EXIT_FATAL);
        };

        println!();
        println!("🚀 [2/3] Converting {}...", workbook.display());
        let converter = Converter::new(config.conversion.clone(), layout);
        let name = workbook
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let source = workbook.clone();
        let converted = match tokio::task::spawn_blocking(move || {
            converter.convert(&source, name.as_deref())
        })
        .await?
        {
            Ok(report) => report,
            Err(e) => return Ok(fail(&e, "Conversion failed")),
        };
        print_report(&converted);
        exit_code = exit_code.max(report_exit_code(&converted));

        let Some(csv_path) = converted.output_path.clone() else {
            tracing::error!("Converter reported no output file");
            return Ok(EXIT_FATAL);
        };

        println!();
        println!("🚀 [3/3] Ingesting {} into {}...", csv_path.display(), store.backend_name());
        let ingestor = Ingestor::new(store.clone(), &config.ingestion, dry_run);
        let ingested = match ingestor.ingest(&csv_path).await {
            Ok(report) => report,
            Err(e) => return Ok(fail(&e, "Ingestion failed")),
        };
        print_report(&ingested);
        exit_code = exit_code.max(report_exit_code(&ingested));

        if let Ok(total) = store.count().await {
            println!();
            println!("📦 Store now holds {total} rows");
        }

        if exit_code == 0 {
            println!("✅ Pipeline completed successfully!");
        } else if exit_code == EXIT_PARTIAL {
            println!("⚠️  Pipeline completed with failures");
        }
        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_end_to_end_with_memory_store() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("rosterflow.toml");
        std::fs::write(
            &config_path,
            format!(
                "[storage]\nroot_path = \"{}\"\n",
                temp.path().join("data").to_string_lossy().replace('\\', "/")
            ),
        )
        .unwrap();

        let args = RunArgs {
            count: 25,
            seed: Some(3),
            dry_run: false,
            batch_size: Some(10),
        };
        let code = args.execute(&config_path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 0);

        let csv_dir = temp.path().join("data").join("csv");
        let csv_files: Vec<_> = std::fs::read_dir(csv_dir).unwrap().collect();
        assert_eq!(csv_files.len(), 1);
    }
}
