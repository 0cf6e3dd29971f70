//! Status command implementation
//!
//! Shows the configured store, its row count and the output directories.

use super::{connect_store, fail, load, EXIT_FATAL};
use crate::core::files::{FileCategory, OutputLayout};
use clap::Args;
use std::path::Path;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Skip listing output directories
    #[arg(long)]
    pub store_only: bool,
}

/// Number of regular files in `dir`, or `None` if it does not exist
fn file_count(dir: &Path) -> Option<usize> {
    let entries = std::fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count(),
    )
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking pipeline status");

        println!("📊 Rosterflow Status");
        println!();

        let config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        // Status never writes, so the schema is left alone
        let store = match connect_store(&config, true).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let count = match store.count().await {
            Ok(c) => c,
            Err(e) => {
                fail(&e, "Failed to count stored rows");
                return Ok(EXIT_FATAL);
            }
        };

        println!("  Store: {}", store.backend_name());
        println!("  Stored rows: {count}");

        if !self.store_only {
            let layout = OutputLayout::new(&config.storage);
            println!();
            println!("{:<10} {:<50} {:<10}", "Category", "Directory", "Files");
            println!("{}", "-".repeat(72));
            for (label, category) in [
                ("excel", FileCategory::Excel),
                ("csv", FileCategory::Csv),
                ("reports", FileCategory::Reports),
            ] {
                let dir = layout.dir(category);
                let files = file_count(&dir)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "missing".to_string());
                println!("{:<10} {:<50} {:<10}", label, dir.display(), files);
            }
        }

        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_count() {
        let temp = TempDir::new().unwrap();
        assert_eq!(file_count(&temp.path().join("absent")), None);

        std::fs::write(temp.path().join("a.csv"), "x").unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        assert_eq!(file_count(temp.path()), Some(1));
    }

    #[tokio::test]
    async fn test_status_with_memory_store() {
        let temp = TempDir::new().unwrap();
        let args = StatusArgs { store_only: true };
        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
