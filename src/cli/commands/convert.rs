//! Convert command implementation
//!
//! Streams a workbook's first sheet into a CSV file.

use super::{fail, load, print_report, report_exit_code};
use crate::core::convert::Converter;
use crate::core::files::OutputLayout;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Workbook to convert
    pub input: PathBuf,

    /// Output CSV path (default: derived name in the csv folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name to derive the output file from (default: the input file name)
    #[arg(long)]
    pub name: Option<String>,
}

impl ConvertArgs {
    fn original_name(&self) -> Option<String> {
        self.name.clone().or_else(|| {
            self.input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
    }

    /// Execute the convert command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting convert command");

        let config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let converter =
            Converter::new(config.conversion.clone(), OutputLayout::new(&config.storage));
        let input = self.input.clone();
        let output = self.output.clone();
        let name = self.original_name();

        println!("🚀 Converting {}...", input.display());
        let result = tokio::task::spawn_blocking(move || match output {
            Some(path) => converter.convert_to(&input, &path),
            None => converter.convert(&input, name.as_deref()),
        })
        .await?;

        match result {
            Ok(report) => {
                print_report(&report);
                Ok(report_exit_code(&report))
            }
            Err(e) => Ok(fail(&e, "Conversion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_name_defaults_to_input_file_name() {
        let args = ConvertArgs {
            input: PathBuf::from("/tmp/in/students_1.xlsx"),
            output: None,
            name: None,
        };
        assert_eq!(args.original_name().as_deref(), Some("students_1.xlsx"));

        let named = ConvertArgs {
            name: Some("upload.xls".to_string()),
            ..args
        };
        assert_eq!(named.original_name().as_deref(), Some("upload.xls"));
    }

    #[tokio::test]
    async fn test_missing_workbook_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let args = ConvertArgs {
            input: temp.path().join("absent.xlsx"),
            output: Some(temp.path().join("out.csv")),
            name: None,
        };

        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 5);
    }
}
