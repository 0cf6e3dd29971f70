//! Synthetic record generation
//!
//! Writes `count` random student rows straight to an `.xlsx` workbook. Large
//! runs use the writer's constant-memory mode, which keeps a single row in
//! memory and streams the rest to a temporary file.

use crate::config::{GenerationConfig, MAX_AUTOFIT_THRESHOLD};
use crate::core::files::{timestamped_name, FileCategory, OutputLayout};
use crate::core::progress::{ProgressObserver, TracingProgress};
use crate::core::summary::{Operation, PipelineReport};
use crate::domain::row::HEADER;
use crate::domain::{Result, RosterError, Row};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Mike", "Sarah", "David", "Lisa", "Tom", "Emma", "Alex", "Anna",
];

pub const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];

/// Birth dates as (year, month, day)
pub const BIRTH_DATES: [(i32, u32, u32); 10] = [
    (2000, 1, 15),
    (2001, 3, 22),
    (2002, 7, 8),
    (2003, 11, 30),
    (2004, 5, 12),
    (2005, 9, 18),
    (2006, 12, 3),
    (2007, 4, 25),
    (2008, 8, 14),
    (2009, 10, 7),
];

pub const CLASSES: [&str; 5] = ["Class1", "Class2", "Class3", "Class4", "Class5"];

pub const SHEET_NAME: &str = "Students";

/// Random rows drawn from the fixed pools
pub struct SyntheticRows {
    rng: StdRng,
    birth_dates: Vec<NaiveDate>,
    min_score: u32,
    max_score: u32,
    next_id: i64,
}

impl SyntheticRows {
    pub fn new(config: &GenerationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let birth_dates = BIRTH_DATES
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect();

        Self {
            rng,
            birth_dates,
            min_score: config.min_score.min(config.max_score),
            max_score: config.max_score.max(config.min_score),
            next_id: 1,
        }
    }

    fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
        pool.choose(rng).copied().unwrap_or_default()
    }
}

impl Iterator for SyntheticRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let date_of_birth = *self.birth_dates.choose(&mut self.rng)?;
        let row = Row::builder()
            .id(self.next_id)
            .first_name(Self::pick(&mut self.rng, &FIRST_NAMES))
            .last_name(Self::pick(&mut self.rng, &LAST_NAMES))
            .date_of_birth(date_of_birth)
            .class_name(Self::pick(&mut self.rng, &CLASSES))
            .score(self.rng.gen_range(self.min_score..=self.max_score))
            .build()
            .ok()?;
        self.next_id += 1;
        Some(row)
    }
}

/// Writes synthetic workbooks into the Excel output folder
pub struct RecordGenerator {
    config: GenerationConfig,
    layout: OutputLayout,
    progress: Arc<dyn ProgressObserver>,
}

impl RecordGenerator {
    pub fn new(config: GenerationConfig, layout: OutputLayout) -> Self {
        let progress = Arc::new(TracingProgress::every(config.progress_interval));
        Self {
            config,
            layout,
            progress,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Generates `count` rows into `students_<millis>.xlsx`
    ///
    /// # Errors
    ///
    /// - [`RosterError::InvalidArgument`] if `count` is zero or above
    ///   `generation.max_records`; nothing is written
    /// - [`RosterError::Output`] if the directory or workbook cannot be written
    pub fn generate(&self, count: u64) -> Result<PipelineReport> {
        self.validate_count(count)?;
        let dir = self.layout.ensure_dir(FileCategory::Excel)?;
        let path = dir.join(timestamped_name("students", "xlsx"));
        self.write_workbook(count, path)
    }

    /// Generates `count` rows into an explicit path
    pub fn generate_to(&self, count: u64, path: impl AsRef<Path>) -> Result<PipelineReport> {
        self.validate_count(count)?;
        self.write_workbook(count, path.as_ref().to_path_buf())
    }

    fn validate_count(&self, count: u64) -> Result<()> {
        if count < 1 {
            return Err(RosterError::InvalidArgument(
                "record count must be at least 1".to_string(),
            ));
        }
        if count > self.config.max_records {
            return Err(RosterError::InvalidArgument(format!(
                "record count {} exceeds the maximum of {}",
                count, self.config.max_records
            )));
        }
        Ok(())
    }

    fn write_workbook(&self, count: u64, path: PathBuf) -> Result<PipelineReport> {
        let start = Instant::now();
        let autofit = count <= self.config.autofit_threshold.min(MAX_AUTOFIT_THRESHOLD);
        crate::log_stage_start!(Operation::Generate, path.display());
        tracing::debug!(count, autofit, "Generating workbook");

        let mut workbook = Workbook::new();
        let worksheet = if autofit {
            workbook.add_worksheet()
        } else {
            workbook.add_worksheet_with_constant_memory()
        };
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }

        let mut report = PipelineReport::new(Operation::Generate);
        for (row_number, row) in (1u32..).zip(SyntheticRows::new(&self.config).take(count as usize)) {
            write_row(worksheet, row_number, &row)?;
            report.rows_processed += 1;
            report.rows_persisted += 1;
            self.progress.on_row(Operation::Generate, report.rows_processed);
        }

        if autofit {
            worksheet.autofit();
        }

        workbook
            .save(&path)
            .map_err(|e| RosterError::output(&path, e))?;

        self.progress.on_finish(Operation::Generate, report.rows_processed);
        let report = report.with_output(path).with_duration(start.elapsed());
        report.log_summary();
        Ok(report)
    }
}

fn write_row(worksheet: &mut Worksheet, row_number: u32, row: &Row) -> Result<()> {
    worksheet.write_number(row_number, 0, row.id().unwrap_or_default() as f64)?;
    worksheet.write_string(row_number, 1, row.first_name())?;
    worksheet.write_string(row_number, 2, row.last_name())?;
    worksheet.write_string(row_number, 3, row.dob_iso())?;
    worksheet.write_string(row_number, 4, row.class_name())?;
    worksheet.write_number(row_number, 5, f64::from(row.score()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use tempfile::TempDir;

    fn generator(root: &Path, max_records: u64) -> RecordGenerator {
        let config = GenerationConfig {
            max_records,
            seed: Some(7),
            ..GenerationConfig::default()
        };
        let layout = OutputLayout::new(&StorageConfig {
            root_path: root.to_string_lossy().to_string(),
            ..StorageConfig::default()
        });
        RecordGenerator::new(config, layout)
    }

    #[test]
    fn test_rejects_zero_count_without_creating_files() {
        let temp = TempDir::new().unwrap();
        let result = generator(temp.path(), 100).generate(0);

        assert!(matches!(result, Err(RosterError::InvalidArgument(_))));
        assert!(!temp.path().join("excel").exists());
    }

    #[test]
    fn test_rejects_count_above_maximum() {
        let temp = TempDir::new().unwrap();
        let result = generator(temp.path(), 100).generate(101);
        assert!(matches!(result, Err(RosterError::InvalidArgument(_))));
    }

    #[test]
    fn test_generates_named_workbook() {
        let temp = TempDir::new().unwrap();
        let report = generator(temp.path(), 100).generate(25).unwrap();

        let path = report.output_path.clone().unwrap();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), temp.path().join("excel"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("students_") && name.ends_with(".xlsx"));
        assert_eq!(report.rows_persisted, 25);
    }

    #[test]
    fn test_synthetic_rows_stay_in_pools() {
        let config = GenerationConfig {
            seed: Some(42),
            ..GenerationConfig::default()
        };
        let rows: Vec<Row> = SyntheticRows::new(&config).take(200).collect();

        assert_eq!(rows.len(), 200);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.id(), Some(i as i64 + 1));
            assert!(FIRST_NAMES.contains(&row.first_name()));
            assert!(LAST_NAMES.contains(&row.last_name()));
            assert!(CLASSES.contains(&row.class_name()));
            assert!((55..=75).contains(&row.score()));
        }
    }

    #[test]
    fn test_reversed_score_bounds_are_ordered() {
        let config = GenerationConfig {
            seed: Some(3),
            min_score: 80,
            max_score: 70,
            ..GenerationConfig::default()
        };
        let rows: Vec<Row> = SyntheticRows::new(&config).take(50).collect();

        assert_eq!(rows.len(), 50);
        assert!(rows.iter().all(|row| (70..=80).contains(&row.score())));
    }

    #[test]
    fn test_oversized_autofit_threshold_still_generates() {
        let temp = TempDir::new().unwrap();
        let config = GenerationConfig {
            autofit_threshold: 1_000_000,
            seed: Some(5),
            ..GenerationConfig::default()
        };
        let layout = OutputLayout::new(&StorageConfig {
            root_path: temp.path().to_string_lossy().to_string(),
            ..StorageConfig::default()
        });

        let report = RecordGenerator::new(config, layout)
            .generate(MAX_AUTOFIT_THRESHOLD + 5)
            .unwrap();
        assert_eq!(report.rows_persisted, MAX_AUTOFIT_THRESHOLD + 5);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = GenerationConfig {
            seed: Some(99),
            ..GenerationConfig::default()
        };
        let first: Vec<Row> = SyntheticRows::new(&config).take(20).collect();
        let second: Vec<Row> = SyntheticRows::new(&config).take(20).collect();
        assert_eq!(first, second);
    }
}
