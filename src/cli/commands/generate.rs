//! Generate command implementation
//!
//! Writes a workbook of synthetic student rows.

use super::{fail, load, print_report, report_exit_code};
use crate::core::files::OutputLayout;
use crate::core::generate::RecordGenerator;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of rows to generate
    #[arg(short = 'n', long)]
    pub count: u64,

    /// Output workbook (default: timestamped file in the excel folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(count = self.count, "Starting generate command");

        let mut config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Some(seed) = self.seed {
            config.generation.seed = Some(seed);
        }

        let generator =
            RecordGenerator::new(config.generation.clone(), OutputLayout::new(&config.storage));
        let count = self.count;
        let output = self.output.clone();

        println!("🚀 Generating {count} rows...");
        let result = tokio::task::spawn_blocking(move || match output {
            Some(path) => generator.generate_to(count, path),
            None => generator.generate(count),
        })
        .await?;

        match result {
            Ok(report) => {
                print_report(&report);
                Ok(report_exit_code(&report))
            }
            Err(e) => Ok(fail(&e, "Generation failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_to_explicit_path() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.xlsx");
        let args = GenerateArgs {
            count: 5,
            output: Some(output.clone()),
            seed: Some(1),
        };

        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_zero_count_is_argument_error() {
        let temp = TempDir::new().unwrap();
        let args = GenerateArgs {
            count: 0,
            output: Some(temp.path().join("out.xlsx")),
            seed: None,
        };

        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();

        assert_eq!(code, 2);
    }
}
