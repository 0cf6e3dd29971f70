//! Pipeline reports
//!
//! Every engine returns a [`PipelineReport`] instead of updating shared
//! counters. Partial success is expressed through the failure and loss
//! counts, never by failing the whole call.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on diagnostics kept per report
pub const MAX_DIAGNOSTICS: usize = 100;

/// Pipeline stage that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    Convert,
    Ingest,
    Report,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Generate => "generate",
            Operation::Convert => "convert",
            Operation::Ingest => "ingest",
            Operation::Report => "report",
        };
        f.write_str(name)
    }
}

/// Kind of absorbed problem recorded in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Row dropped because it could not be normalized
    RowRejected,
    /// Row kept, but one of its fields was defaulted
    FieldDefaulted,
    /// A whole batch could not be written
    BatchFailed,
}

/// One absorbed problem, with the source position it came from
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// 1-based data row or line number (batch number for batch failures)
    pub position: u64,

    pub message: String,
}

/// Result of one generate/convert/ingest call
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub operation: Operation,

    /// Data rows (or lines) read from the source
    pub rows_processed: u64,

    /// Rows dropped because they could not be decoded
    pub rows_failed: u64,

    /// Rows that reached a failed batch write
    pub rows_lost: u64,

    /// Rows written to the sink (file or store)
    pub rows_persisted: u64,

    /// Rows kept with at least one defaulted field
    pub fields_defaulted: u64,

    pub batches_written: u64,

    pub batches_failed: u64,

    /// Output file, when the stage writes one
    pub output_path: Option<PathBuf>,

    pub duration: Duration,

    /// Whether store writes were skipped
    pub dry_run: bool,

    /// First [`MAX_DIAGNOSTICS`] problems encountered
    pub diagnostics: Vec<Diagnostic>,

    /// Problems beyond the diagnostics cap
    pub diagnostics_truncated: u64,
}

impl PipelineReport {
    /// Create a new empty report
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            rows_processed: 0,
            rows_failed: 0,
            rows_lost: 0,
            rows_persisted: 0,
            fields_defaulted: 0,
            batches_written: 0,
            batches_failed: 0,
            output_path: None,
            duration: Duration::from_secs(0),
            dry_run: false,
            diagnostics: Vec::new(),
            diagnostics_truncated: 0,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the output path
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Record a dropped row
    pub fn record_rejected(&mut self, position: u64, message: impl Into<String>) {
        self.rows_failed += 1;
        self.push_diagnostic(DiagnosticKind::RowRejected, position, message.into());
    }

    /// Record a kept row whose field fell back to a default
    pub fn record_defaulted(&mut self, position: u64, message: impl Into<String>) {
        self.fields_defaulted += 1;
        self.push_diagnostic(DiagnosticKind::FieldDefaulted, position, message.into());
    }

    /// Record a written batch
    pub fn record_batch_written(&mut self, persisted: u64, attempted: u64) {
        self.batches_written += 1;
        self.rows_persisted += persisted;
        self.rows_lost += attempted.saturating_sub(persisted);
    }

    /// Record a batch that could not be written
    pub fn record_batch_failed(&mut self, batch_number: u64, rows: u64, message: impl Into<String>) {
        self.batches_failed += 1;
        self.rows_lost += rows;
        self.push_diagnostic(DiagnosticKind::BatchFailed, batch_number, message.into());
    }

    fn push_diagnostic(&mut self, kind: DiagnosticKind, position: u64, message: String) {
        if self.diagnostics.len() < MAX_DIAGNOSTICS {
            self.diagnostics.push(Diagnostic {
                kind,
                position,
                message,
            });
        } else {
            self.diagnostics_truncated += 1;
        }
    }

    /// True when nothing was dropped or lost
    pub fn is_successful(&self) -> bool {
        self.rows_failed == 0 && self.rows_lost == 0 && self.batches_failed == 0
    }

    /// Persisted rows as a percentage of processed rows
    pub fn success_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            return 100.0;
        }
        (self.rows_persisted as f64 / self.rows_processed as f64) * 100.0
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            operation = %self.operation,
            rows_processed = self.rows_processed,
            rows_persisted = self.rows_persisted,
            rows_failed = self.rows_failed,
            rows_lost = self.rows_lost,
            fields_defaulted = self.fields_defaulted,
            batches_written = self.batches_written,
            batches_failed = self.batches_failed,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            output = ?self.output_path,
            "Pipeline stage completed"
        );

        if !self.is_successful() {
            tracing::warn!(
                diagnostics = self.diagnostics.len(),
                truncated = self.diagnostics_truncated,
                "Pipeline stage completed with errors"
            );
            for diagnostic in self.diagnostics.iter().filter(|d| d.kind != DiagnosticKind::FieldDefaulted) {
                tracing::warn!(
                    kind = ?diagnostic.kind,
                    position = diagnostic.position,
                    message = %diagnostic.message,
                    "Pipeline diagnostic"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = PipelineReport::new(Operation::Ingest);

        assert_eq!(report.operation, Operation::Ingest);
        assert_eq!(report.rows_processed, 0);
        assert_eq!(report.rows_persisted, 0);
        assert!(report.output_path.is_none());
        assert!(report.is_successful());
    }

    #[test]
    fn test_success_rate() {
        let mut report = PipelineReport::new(Operation::Ingest);
        report.rows_processed = 200;
        report.rows_persisted = 150;

        assert_eq!(report.success_rate(), 75.0);

        report.rows_processed = 0;
        assert_eq!(report.success_rate(), 100.0);
    }

    #[test]
    fn test_batch_accounting() {
        let mut report = PipelineReport::new(Operation::Ingest);
        report.record_batch_written(1000, 1000);
        report.record_batch_failed(2, 1000, "timeout");
        report.record_batch_written(998, 1000);

        assert_eq!(report.rows_persisted, 1998);
        assert_eq!(report.rows_lost, 1002);
        assert_eq!(report.batches_written, 2);
        assert_eq!(report.batches_failed, 1);
        assert!(!report.is_successful());
    }

    #[test]
    fn test_diagnostics_are_capped() {
        let mut report = PipelineReport::new(Operation::Convert);
        for i in 0..(MAX_DIAGNOSTICS as u64 + 5) {
            report.record_rejected(i, "bad row");
        }

        assert_eq!(report.rows_failed, MAX_DIAGNOSTICS as u64 + 5);
        assert_eq!(report.diagnostics.len(), MAX_DIAGNOSTICS);
        assert_eq!(report.diagnostics_truncated, 5);
    }

    #[test]
    fn test_defaulted_fields_do_not_fail_report() {
        let mut report = PipelineReport::new(Operation::Convert);
        report.record_defaulted(3, "DOB defaulted");

        assert_eq!(report.fields_defaulted, 1);
        assert!(report.is_successful());
    }

    #[test]
    fn test_report_serializes() {
        let report = PipelineReport::new(Operation::Generate).with_output("/tmp/a.xlsx");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operation"], "generate");
        assert_eq!(json["output_path"], "/tmp/a.xlsx");
    }
}
