//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Rosterflow configuration file.

use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Unlike the pipeline commands, the file must exist.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Output Root: {}", config.storage.root_path);
        println!(
            "  Folders: excel={}, csv={}, reports={}",
            config.storage.excel_folder, config.storage.csv_folder, config.storage.reports_folder
        );
        println!("  Max Generated Rows: {}", config.generation.max_records);
        println!("  Conversion Flush Interval: {}", config.conversion.flush_interval);
        println!("  Batch Size: {}", config.ingestion.batch_size);
        println!("  Batch Timeout: {}s", config.ingestion.batch_timeout_seconds);

        match config.database_target {
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        pg_config
                            .connection_string
                            .expose_secret()
                            .as_ref()
                            .split('@')
                            .next_back()
                            .unwrap_or("***")
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
            DatabaseTarget::Memory => {
                println!("  Database Target: memory (rows are kept for this process only)");
            }
        }

        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let args = ValidateArgs {};
        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_invalid_value_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rosterflow.toml");
        std::fs::write(&path, "[ingestion]\nbatch_size = 0\n").unwrap();

        let code = ValidateArgs {}.execute(&path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_minimal_file_is_valid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rosterflow.toml");
        std::fs::write(&path, "[application]\nlog_level = \"debug\"\n").unwrap();

        let code = ValidateArgs {}.execute(&path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 0);
    }
}
