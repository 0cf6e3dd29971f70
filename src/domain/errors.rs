//! Domain error types
//!
//! Errors that stop a pipeline from being established at all (bad arguments,
//! unreadable sources, filesystem failures) are [`RosterError`] values and are
//! returned to the caller. Errors local to a single row are [`RowDecodeError`]
//! values; engines tally them and never return them.

use std::path::PathBuf;
use thiserror::Error;

/// Main Rosterflow error type
#[derive(Debug, Error)]
pub enum RosterError {
    /// Caller-supplied parameter out of range; no work was performed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source file unreadable or structurally unrecognizable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A store write for one batch failed
    #[error("Batch write failed for {rows} rows: {reason}")]
    BatchWrite { rows: usize, reason: String },

    /// Filesystem failure while writing an output file
    ///
    /// The path of the (possibly partial) output is kept so it can be inspected.
    #[error("I/O error writing {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    /// Spreadsheet container errors (read or write)
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl RosterError {
    /// Wraps a filesystem error together with the output path it affected
    pub fn output(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        RosterError::Output {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Path of the partial output file, if the error carries one
    pub fn partial_output(&self) -> Option<&PathBuf> {
        match self {
            RosterError::Output { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Reasons a single row or line could not be normalized
///
/// These never escape an engine: the row is skipped (or a field defaulted)
/// and the error is counted in the pipeline report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDecodeError {
    /// Line has fewer columns than the detected schema needs
    #[error("expected at least {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// Numeric field could not be parsed
    #[error("field '{field}' is not a valid integer: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// Score below zero
    #[error("score must not be negative, got {0}")]
    NegativeScore(i64),

    /// Score too large to store once the stage delta is applied
    #[error("score out of range: {0}")]
    ScoreOutOfRange(i64),

    /// Age outside the range that yields a birth year
    #[error("age out of range: {0}")]
    InvalidAge(i64),

    /// Date text matched none of the supported patterns
    #[error("unparseable date: '{0}'")]
    InvalidDate(String),

    /// CSV record could not be read
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RosterError {
    fn from(err: toml::de::Error) -> Self {
        RosterError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        RosterError::Io(format!("CSV error: {err}"))
    }
}

impl From<calamine::XlsxError> for RosterError {
    fn from(err: calamine::XlsxError) -> Self {
        RosterError::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for RosterError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        RosterError::Spreadsheet(err.to_string())
    }
}
