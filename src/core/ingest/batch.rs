//! Batched store writes
//!
//! Rows are buffered until the batch is full and then written in one store
//! call. A failed or timed-out batch is counted as lost and the buffer is
//! cleared so the next batch starts fresh.

use crate::adapters::store::StudentStore;
use crate::config::IngestionConfig;
use crate::core::summary::PipelineReport;
use crate::domain::Row;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for batch writes
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub batch_size: usize,
    /// Upper bound on one store write
    pub timeout: Duration,
    /// Form and count batches without writing them
    pub dry_run: bool,
}

impl BatchConfig {
    pub fn from_config(config: &IngestionConfig, dry_run: bool) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            timeout: Duration::from_secs(config.batch_timeout_seconds),
            dry_run,
        }
    }
}

/// Buffers rows and writes them to a store in fixed-size batches
pub struct BatchWriter {
    store: Arc<dyn StudentStore>,
    config: BatchConfig,
    buffer: Vec<Row>,
    batch_number: u64,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn StudentStore>, config: BatchConfig) -> Self {
        let buffer = Vec::with_capacity(config.batch_size);
        Self {
            store,
            config,
            buffer,
            batch_number: 0,
        }
    }

    /// Adds a row, writing the batch once it is full
    pub async fn push(&mut self, row: Row, report: &mut PipelineReport) {
        self.buffer.push(row);
        if self.buffer.len() >= self.config.batch_size {
            self.write_batch(report).await;
        }
    }

    /// Writes the final partial batch, if any
    pub async fn finish(mut self, report: &mut PipelineReport) {
        if !self.buffer.is_empty() {
            self.write_batch(report).await;
        }
    }

    async fn write_batch(&mut self, report: &mut PipelineReport) {
        self.batch_number += 1;
        let rows = self.buffer.len();
        crate::log_batch_processing!(self.batch_number, rows);

        if self.config.dry_run {
            tracing::info!(
                batch = self.batch_number,
                rows,
                "DRY RUN: Would insert batch into {}",
                self.store.backend_name()
            );
            report.record_batch_written(0, 0);
            self.buffer.clear();
            return;
        }

        let outcome =
            tokio::time::timeout(self.config.timeout, self.store.insert_batch(&self.buffer)).await;

        match outcome {
            Ok(Ok(persisted)) => {
                if persisted < rows {
                    tracing::warn!(
                        batch = self.batch_number,
                        attempted = rows,
                        persisted,
                        "Store persisted fewer rows than sent"
                    );
                }
                report.record_batch_written(persisted as u64, rows as u64);
            }
            Ok(Err(e)) => {
                tracing::error!(batch = self.batch_number, rows, error = %e, "Batch write failed");
                report.record_batch_failed(self.batch_number, rows as u64, e.to_string());
            }
            Err(_) => {
                tracing::error!(
                    batch = self.batch_number,
                    rows,
                    timeout_secs = self.config.timeout.as_secs(),
                    "Batch write timed out"
                );
                report.record_batch_failed(
                    self.batch_number,
                    rows as u64,
                    format!("timed out after {}s", self.config.timeout.as_secs()),
                );
            }
        }

        self.buffer.clear();
    }
}
