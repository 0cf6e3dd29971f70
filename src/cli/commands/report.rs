//! Report command implementation
//!
//! Prints one page of stored rows, or exports every matching row to CSV.

use super::{connect_store, fail, load, report_exit_code};
use crate::adapters::store::StudentFilter;
use crate::core::files::OutputLayout;
use crate::core::report::Reporter;
use clap::Args;

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Only the student with this id
    #[arg(long)]
    pub student_id: Option<i64>,

    /// Only students in this class
    #[arg(long = "class")]
    pub class_name: Option<String>,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value_t = 20)]
    pub size: u32,

    /// Export all matching rows to a CSV file in the reports folder
    #[arg(long)]
    pub export: bool,

    /// Print the page as JSON
    #[arg(long, conflicts_with = "export")]
    pub json: bool,
}

impl ReportArgs {
    fn filter(&self) -> StudentFilter {
        StudentFilter {
            student_id: self.student_id,
            class_name: self.class_name.clone(),
        }
    }

    /// Execute the report command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(export = self.export, "Starting report command");

        let config = match load(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let store = match connect_store(&config, true).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let reporter = Reporter::new(store, OutputLayout::new(&config.storage));
        let filter = self.filter();

        if self.export {
            return match reporter.export_csv(&filter).await {
                Ok(report) => {
                    println!("✅ Exported {} rows", report.rows_persisted);
                    if let Some(ref path) = report.output_path {
                        println!("   File: {}", path.display());
                    }
                    Ok(report_exit_code(&report))
                }
                Err(e) => Ok(fail(&e, "Export failed")),
            };
        }

        let page = match reporter.page(&filter, self.page, self.size).await {
            Ok(p) => p,
            Err(e) => return Ok(fail(&e, "Failed to read page")),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&page)?);
            return Ok(0);
        }

        println!(
            "Page {} of {} ({} matching rows)",
            page.page + 1,
            page.total_pages().max(1),
            page.total
        );
        println!();
        println!(
            "{:<10} {:<15} {:<15} {:<12} {:<10} {:<6}",
            "ID", "First Name", "Last Name", "DOB", "Class", "Score"
        );
        println!("{}", "-".repeat(72));
        for row in &page.items {
            println!(
                "{:<10} {:<15} {:<15} {:<12} {:<10} {:<6}",
                row.id().map(|id| id.to_string()).unwrap_or_default(),
                row.first_name(),
                row.last_name(),
                row.dob_iso(),
                row.class_name(),
                row.score()
            );
        }
        if page.has_next() {
            println!();
            println!("More rows: --page {}", page.page + 1);
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_args() {
        let args = ReportArgs {
            student_id: Some(4),
            class_name: Some("Class3".to_string()),
            page: 0,
            size: 20,
            export: false,
            json: false,
        };
        let filter = args.filter();
        assert_eq!(filter.student_id, Some(4));
        assert_eq!(filter.class_name.as_deref(), Some("Class3"));
    }

    #[tokio::test]
    async fn test_oversized_page_is_argument_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let args = ReportArgs {
            student_id: None,
            class_name: None,
            page: 0,
            size: 1_000_000,
            export: false,
            json: false,
        };
        let code = args
            .execute(&temp.path().join("absent.toml").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
