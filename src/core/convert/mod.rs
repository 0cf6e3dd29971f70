//! Workbook to CSV conversion
//!
//! Reads the first worksheet forward-only, normalizes each data row, adds
//! the conversion score delta and writes the CSV line immediately. Memory
//! use does not grow with the number of rows.

pub mod reader;

use crate::config::ConversionConfig;
use crate::core::decode::{decode_date, decode_id, decode_score, decode_text};
use crate::core::files::{FileCategory, OutputLayout};
use crate::core::progress::{ProgressObserver, TracingProgress};
use crate::core::summary::{Operation, PipelineReport};
use crate::domain::row::{CONVERSION_SCORE_DELTA, HEADER};
use crate::domain::{Result, RosterError, Row, RowDecodeError};
use calamine::{open_workbook, Reader, Xlsx};
use chrono::{Local, NaiveDate};
use regex::Regex;
use reader::{CellSource, RowAssembler, SheetRow, XlsxCells};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Output file name for a converted workbook
///
/// A trailing `.xls` or `.xlsx` (any case) becomes `.csv`; other names get
/// `.csv` appended. `None` or a blank name falls back to `default_basename`.
pub fn converted_file_name(original_name: Option<&str>, default_basename: &str) -> String {
    let name = original_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(default_basename);

    match Regex::new(r"(?i)\.xlsx?$") {
        Ok(re) if re.is_match(name) => re.replace(name, ".csv").into_owned(),
        _ => format!("{name}.csv"),
    }
}

/// Converts workbooks into the CSV output folder
pub struct Converter {
    config: ConversionConfig,
    layout: OutputLayout,
    reference_date: NaiveDate,
    progress: Arc<dyn ProgressObserver>,
}

impl Converter {
    /// The reference date used for unreadable birth dates is today's date,
    /// fixed when the converter is created
    pub fn new(config: ConversionConfig, layout: OutputLayout) -> Self {
        let progress = Arc::new(TracingProgress::every(config.flush_interval));
        Self {
            config,
            layout,
            reference_date: Local::now().date_naive(),
            progress,
        }
    }

    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Converts `source` into the CSV folder
    ///
    /// The output name is derived from `original_name` (see
    /// [`converted_file_name`]); any directory part of it is dropped.
    ///
    /// # Errors
    ///
    /// - [`RosterError::InvalidInput`] if `source` is not a readable workbook
    ///   or has no worksheet
    /// - [`RosterError::Output`] if the CSV cannot be written
    /// - [`RosterError::Spreadsheet`] if the workbook becomes unreadable part
    ///   way through; rows converted so far stay in the output file
    pub fn convert(&self, source: &Path, original_name: Option<&str>) -> Result<PipelineReport> {
        let destination = destination_for(&self.layout, &self.config, original_name)?;
        self.layout.ensure_dir(FileCategory::Csv)?;
        self.convert_to(source, &destination)
    }

    /// Converts `source` into an explicit destination path
    pub fn convert_to(&self, source: &Path, destination: &Path) -> Result<PipelineReport> {
        let start = Instant::now();
        crate::log_stage_start!(Operation::Convert, source.display());

        let mut workbook: Xlsx<BufReader<File>> = open_workbook(source).map_err(|e| {
            RosterError::InvalidInput(format!(
                "Cannot open {} as a workbook: {}",
                source.display(),
                e
            ))
        })?;

        let sheet = workbook.sheet_names().first().cloned().ok_or_else(|| {
            RosterError::InvalidInput(format!("{} contains no worksheets", source.display()))
        })?;

        let mut cells = workbook.worksheet_cells_reader(&sheet).map_err(|e| {
            RosterError::InvalidInput(format!("Cannot read worksheet '{}': {}", sheet, e))
        })?;

        let report = self
            .convert_cells(XlsxCells(move || cells.next_cell()), destination)?
            .with_duration(start.elapsed());
        report.log_summary();
        Ok(report)
    }

    /// Converts an already-open cell stream
    pub fn convert_cells<S: CellSource>(&self, cells: S, destination: &Path) -> Result<PipelineReport> {
        let mut writer = csv::Writer::from_path(destination)
            .map_err(|e| RosterError::output(destination, e))?;
        writer
            .write_record(HEADER)
            .map_err(|e| RosterError::output(destination, e))?;

        let mut rows = RowAssembler::new(cells);
        let mut report = PipelineReport::new(Operation::Convert).with_output(destination);

        loop {
            let sheet_row = match rows.next_row() {
                Ok(Some(sheet_row)) => sheet_row,
                Ok(None) => break,
                Err(e) => {
                    return Err(abort(writer, destination, &report, e));
                }
            };

            if sheet_row.index == 0 || sheet_row.is_blank() {
                continue;
            }

            report.rows_processed += 1;
            match self.decode_row(&sheet_row, &mut report) {
                Ok(row) => {
                    let row = row.with_score_delta(CONVERSION_SCORE_DELTA);
                    writer
                        .write_record(row.to_record())
                        .map_err(|e| RosterError::output(destination, e))?;
                    report.rows_persisted += 1;
                }
                Err(e) => {
                    tracing::debug!(row = sheet_row.index, error = %e, "Row rejected");
                    report.record_rejected(u64::from(sheet_row.index), e.to_string());
                }
            }

            if report.rows_processed % self.config.flush_interval.max(1) == 0 {
                writer
                    .flush()
                    .map_err(|e| RosterError::output(destination, e))?;
            }
            self.progress.on_row(Operation::Convert, report.rows_processed);
        }

        writer
            .flush()
            .map_err(|e| RosterError::output(destination, e))?;
        self.progress.on_finish(Operation::Convert, report.rows_processed);
        Ok(report)
    }

    fn decode_row(
        &self,
        sheet_row: &SheetRow,
        report: &mut PipelineReport,
    ) -> std::result::Result<Row, RowDecodeError> {
        let id = decode_id(sheet_row.cell(0), sheet_row.index);
        let dob = decode_date(sheet_row.cell(3), self.reference_date);
        let score = decode_score(sheet_row.cell(5), self.config.default_raw_score)?;

        let defaulted: Vec<&str> = [
            ("studentId", id.is_defaulted()),
            ("DOB", dob.is_defaulted()),
            ("score", score.is_defaulted()),
        ]
        .iter()
        .filter(|(_, d)| *d)
        .map(|(name, _)| *name)
        .collect();
        if !defaulted.is_empty() {
            report.record_defaulted(
                u64::from(sheet_row.index),
                format!("defaulted: {}", defaulted.join(", ")),
            );
        }

        Row::builder()
            .id(id.into_inner())
            .first_name(decode_text(sheet_row.cell(1)))
            .last_name(decode_text(sheet_row.cell(2)))
            .date_of_birth(dob.into_inner())
            .class_name(decode_text(sheet_row.cell(4)))
            .score(score.into_inner())
            .build()
            .map_err(RowDecodeError::Malformed)
    }
}

/// Flushes the partial output and turns a mid-stream read failure into an error
fn abort(
    mut writer: csv::Writer<File>,
    destination: &Path,
    report: &PipelineReport,
    cause: RosterError,
) -> RosterError {
    if let Err(flush_err) = writer.flush() {
        tracing::warn!(error = %flush_err, "Failed to flush partial output");
    }
    tracing::error!(
        rows_written = report.rows_persisted,
        output = %destination.display(),
        error = %cause,
        "Conversion aborted"
    );
    RosterError::Spreadsheet(format!(
        "read failed after {} rows (partial output kept at {}): {}",
        report.rows_persisted,
        destination.display(),
        cause
    ))
}

/// Destination a conversion of `original_name` would write to
pub fn destination_for(
    layout: &OutputLayout,
    config: &ConversionConfig,
    original_name: Option<&str>,
) -> Result<PathBuf> {
    layout.resolve(
        FileCategory::Csv,
        &converted_file_name(original_name, &config.default_basename),
    )
}
