//! CSV ingestion into the student store
//!
//! Lines are read one at a time, mapped through the schema chosen from the
//! header, adjusted by the ingestion score delta and written in batches.
//! Bad lines and failed batches are counted and skipped; only problems that
//! prevent reading the file at all are returned as errors.

pub mod batch;
pub mod schema;

use crate::adapters::store::StudentStore;
use crate::config::IngestionConfig;
use crate::core::progress::{ProgressObserver, TracingProgress};
use crate::core::summary::{Operation, PipelineReport};
use crate::domain::row::INGESTION_SCORE_DELTA;
use crate::domain::{Result, RosterError};
use batch::{BatchConfig, BatchWriter};
use chrono::{Local, NaiveDate};
use csv::{ReaderBuilder, Trim};
use schema::CsvSchema;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Loads CSV files into a [`StudentStore`]
pub struct Ingestor {
    store: Arc<dyn StudentStore>,
    batch_config: BatchConfig,
    reference_date: NaiveDate,
    progress: Arc<dyn ProgressObserver>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn StudentStore>, config: &IngestionConfig, dry_run: bool) -> Self {
        Self {
            store,
            batch_config: BatchConfig::from_config(config, dry_run),
            reference_date: Local::now().date_naive(),
            progress: Arc::new(TracingProgress::every(config.progress_interval)),
        }
    }

    /// Date whose year legacy ages are counted back from
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Ingests every data line of `source`
    ///
    /// `rows_persisted` in the returned report is the number of rows the
    /// store accepted.
    ///
    /// # Errors
    ///
    /// - [`RosterError::InvalidInput`] if the file cannot be opened, is empty,
    ///   or its header matches neither schema
    /// - [`RosterError::Io`] if reading fails part way through
    pub async fn ingest(&self, source: &Path) -> Result<PipelineReport> {
        let start = Instant::now();
        crate::log_stage_start!(Operation::Ingest, source.display());

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_path(source)
            .map_err(|e| {
                RosterError::InvalidInput(format!("Cannot open {}: {}", source.display(), e))
            })?;
        let mut records = reader.records();

        let header = match records.next() {
            Some(Ok(header)) => header,
            Some(Err(e)) => {
                return Err(RosterError::InvalidInput(format!(
                    "Cannot read header of {}: {}",
                    source.display(),
                    e
                )))
            }
            None => {
                return Err(RosterError::InvalidInput(format!(
                    "{} is empty",
                    source.display()
                )))
            }
        };
        let schema = CsvSchema::detect(header.len())?;
        tracing::info!(schema = %schema, columns = header.len(), "Detected CSV schema");

        let mut report = PipelineReport::new(Operation::Ingest);
        report.dry_run = self.batch_config.dry_run;
        let mut writer = BatchWriter::new(self.store.clone(), self.batch_config.clone());

        for (line, result) in (2u64..).zip(records) {
            report.rows_processed += 1;

            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    writer.finish(&mut report).await;
                    tracing::error!(
                        line,
                        rows_persisted = report.rows_persisted,
                        error = %e,
                        "Ingestion aborted"
                    );
                    return Err(RosterError::Io(format!(
                        "read failed at line {} of {}: {}",
                        line,
                        source.display(),
                        e
                    )));
                }
                Err(e) => {
                    report.record_rejected(line, format!("malformed record: {e}"));
                    continue;
                }
            };

            let fields: Vec<&str> = record.iter().collect();
            match schema.parse(&fields, self.reference_date) {
                Ok(row) => {
                    writer
                        .push(row.with_score_delta(INGESTION_SCORE_DELTA), &mut report)
                        .await;
                }
                Err(e) => {
                    tracing::debug!(line, error = %e, "Line rejected");
                    report.record_rejected(line, e.to_string());
                }
            }

            self.progress.on_row(Operation::Ingest, report.rows_processed);
        }

        writer.finish(&mut report).await;
        self.progress.on_finish(Operation::Ingest, report.rows_processed);

        let report = report.with_duration(start.elapsed());
        report.log_summary();
        Ok(report)
    }
}
