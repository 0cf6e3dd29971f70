//! Locate command implementation
//!
//! Resolves a file name inside one of the output directories. Any directory
//! part of the name is ignored, so only files under the storage root can be
//! located.

use super::{fail, load, EXIT_PARTIAL};
use crate::core::files::{FileCategory, OutputLayout};
use clap::Args;

/// Arguments for the locate command
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Output category (excel, csv, reports)
    pub category: String,

    /// File name to resolve
    pub name: String,
}

impl LocateArgs {
    /// Execute the locate command
    ///
    /// Exits with 1 when the resolved file does not exist.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let category: FileCategory = match self.category.parse() {
            Ok(c) => c,
            Err(e) => return Ok(fail(&e, "Unknown category")),
        };

        let layout = OutputLayout::new(&config.storage);
        let path = match layout.resolve(category, &self.name) {
            Ok(p) => p,
            Err(e) => return Ok(fail(&e, "Cannot resolve file name")),
        };

        tracing::debug!(path = %path.display(), "Resolved file");
        if path.is_file() {
            println!("{}", path.display());
            Ok(0)
        } else {
            eprintln!("❌ Not found: {}", path.display());
            Ok(EXIT_PARTIAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(temp: &TempDir) -> String {
        let path = temp.path().join("rosterflow.toml");
        std::fs::write(
            &path,
            format!(
                "[storage]\nroot_path = \"{}\"\n",
                temp.path().to_string_lossy().replace('\\', "/")
            ),
        )
        .unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_locate_existing_file_ignores_directories() {
        let temp = TempDir::new().unwrap();
        let config = config_for(&temp);
        std::fs::create_dir_all(temp.path().join("csv")).unwrap();
        std::fs::write(temp.path().join("csv").join("students.csv"), "x").unwrap();

        let args = LocateArgs {
            category: "csv".to_string(),
            name: "../../elsewhere/students.csv".to_string(),
        };
        assert_eq!(args.execute(&config).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_locate_missing_and_invalid() {
        let temp = TempDir::new().unwrap();
        let config = config_for(&temp);

        let missing = LocateArgs {
            category: "reports".to_string(),
            name: "absent.csv".to_string(),
        };
        assert_eq!(missing.execute(&config).await.unwrap(), 1);

        let bad_category = LocateArgs {
            category: "pdf".to_string(),
            name: "a.pdf".to_string(),
        };
        assert_eq!(bad_category.execute(&config).await.unwrap(), 2);

        let empty_name = LocateArgs {
            category: "csv".to_string(),
            name: "dir/".to_string(),
        };
        assert_eq!(empty_name.execute(&config).await.unwrap(), 2);
    }
}
