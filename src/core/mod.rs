//! Core business logic for Rosterflow.
//!
//! # Modules
//!
//! - [`generate`] - Synthetic workbook generation
//! - [`convert`] - Streaming workbook to CSV conversion
//! - [`ingest`] - Batched CSV ingestion into a store
//! - [`report`] - Paged reads and CSV exports from a store
//! - [`decode`] - Cell and field normalization shared by the engines
//! - [`files`] - Output directory layout and file naming
//! - [`summary`] - Pipeline reports
//! - [`progress`] - Progress observers
//!
//! # Pipeline
//!
//! 1. **Generate**: write N synthetic rows to a workbook
//! 2. **Convert**: stream the first sheet to CSV, adding 10 to each score
//! 3. **Ingest**: load the CSV into the store in batches, adding 5 to each score
//!
//! # Example
//!
//! ```rust,no_run
//! use rosterflow::config::load_config;
//! use rosterflow::core::convert::Converter;
//! use rosterflow::core::files::OutputLayout;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rosterflow.toml")?;
//! let layout = OutputLayout::new(&config.storage);
//!
//! let converter = Converter::new(config.conversion.clone(), layout);
//! let report = converter.convert(Path::new("students.xlsx"), Some("students.xlsx"))?;
//!
//! println!("Converted {} rows", report.rows_persisted);
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod decode;
pub mod files;
pub mod generate;
pub mod ingest;
pub mod progress;
pub mod report;
pub mod summary;
