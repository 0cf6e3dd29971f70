//! Reporting over stored rows
//!
//! Paged lookups and CSV exports read the store page by page, so an export
//! never holds more than one page in memory.

use crate::adapters::store::{Page, PageRequest, StudentFilter, StudentStore};
use crate::core::files::{timestamped_name, FileCategory, OutputLayout};
use crate::core::summary::{Operation, PipelineReport};
use crate::domain::{Result, RosterError, Row};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Header of exported report files
pub const REPORT_HEADER: [&str; 6] = ["Student ID", "First Name", "Last Name", "DOB", "Class", "Score"];

/// Rows fetched per store call during export
pub const EXPORT_PAGE_SIZE: u32 = 1_000;

/// Read-side access to stored students
pub struct Reporter {
    store: Arc<dyn StudentStore>,
    layout: OutputLayout,
    export_page_size: u32,
}

impl Reporter {
    pub fn new(store: Arc<dyn StudentStore>, layout: OutputLayout) -> Self {
        Self {
            store,
            layout,
            export_page_size: EXPORT_PAGE_SIZE,
        }
    }

    pub fn with_export_page_size(mut self, size: u32) -> Self {
        self.export_page_size = size;
        self
    }

    /// One page of rows matching `filter`
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidArgument`] for an out-of-range page size,
    /// or the store's error.
    pub async fn page(&self, filter: &StudentFilter, page: u32, size: u32) -> Result<Page<Row>> {
        let request = PageRequest::new(page, size)?;
        self.store.scan(filter, request).await
    }

    /// Exports every matching row to a timestamped file in the reports directory
    pub async fn export_csv(&self, filter: &StudentFilter) -> Result<PipelineReport> {
        let dir = self.layout.ensure_dir(FileCategory::Reports)?;
        let destination = dir.join(timestamped_name("students_report", "csv"));
        self.export_csv_to(filter, &destination).await
    }

    /// Exports every matching row to `destination`
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Output`] if the file cannot be written, or the
    /// store's error if a page cannot be read. The partial file is kept.
    pub async fn export_csv_to(&self, filter: &StudentFilter, destination: &Path) -> Result<PipelineReport> {
        let start = Instant::now();
        crate::log_stage_start!(Operation::Report, destination.display());

        let mut writer = csv::Writer::from_path(destination)
            .map_err(|e| RosterError::output(destination, e))?;
        writer
            .write_record(REPORT_HEADER)
            .map_err(|e| RosterError::output(destination, e))?;

        let mut report = PipelineReport::new(Operation::Report);
        let mut request = PageRequest::new(0, self.export_page_size)?;

        loop {
            let page = self.store.scan(filter, request).await?;
            for row in &page.items {
                writer
                    .write_record(row.to_record())
                    .map_err(|e| RosterError::output(destination, e))?;
                report.rows_processed += 1;
                report.rows_persisted += 1;
            }
            tracing::debug!(page = page.page, rows = page.items.len(), total = page.total, "Exported page");

            if !page.has_next() || page.items.is_empty() {
                break;
            }
            request = request.next();
        }

        writer
            .flush()
            .map_err(|e| RosterError::output(destination, e))?;

        let report = report
            .with_output(destination)
            .with_duration(start.elapsed());
        report.log_summary();
        Ok(report)
    }
}
