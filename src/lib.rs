// Rosterflow - Student Record Pipeline
// Copyright (c) 2025 Rosterflow Contributors
// Licensed under the MIT License

//! # Rosterflow - Student Record Pipeline
//!
//! Rosterflow moves tabular student records through three stages: it
//! generates synthetic workbooks, converts workbooks to CSV, and ingests
//! CSV files into a store.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Generating** `.xlsx` workbooks of synthetic rows with bounded memory
//! - **Converting** a workbook's first sheet to CSV as a forward-only stream
//! - **Ingesting** CSV files into PostgreSQL (or an in-process store) in batches
//! - **Reporting** on stored rows page by page, with CSV export
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline engines (generate, convert, ingest, report)
//! - [`adapters`] - Store backends (PostgreSQL, in-memory)
//! - [`domain`] - The student row, cell values and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rosterflow::adapters::store::create_student_store;
//! use rosterflow::config::load_config;
//! use rosterflow::core::ingest::Ingestor;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("rosterflow.toml")?;
//!     let store = create_student_store(&config).await?;
//!
//!     let ingestor = Ingestor::new(store, &config.ingestion, false);
//!     let report = ingestor.ingest(Path::new("data/csv/students.csv")).await?;
//!
//!     println!("Persisted {} of {} rows", report.rows_persisted, report.rows_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Partial Failure
//!
//! Rows that cannot be decoded and batches that cannot be written are
//! counted in the returned [`core::summary::PipelineReport`] instead of
//! failing the call. Only problems that prevent a stage from starting, or
//! from reading its source at all, are returned as
//! [`domain::RosterError`].
//!
//! ## Logging
//!
//! Rosterflow uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(rows = 1000, "Starting conversion");
//! warn!(line = 42, "Line rejected");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
