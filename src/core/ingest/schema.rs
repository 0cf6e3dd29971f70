//! Delimited-file schemas accepted by the ingestor
//!
//! The header's column count picks one schema for the whole file. Each
//! schema has a pure mapping from a line's fields to a [`Row`].

use crate::core::decode::{parse_date_text, parse_integer, parse_score_text};
use crate::domain::{Result, RosterError, Row, RowDecodeError};
use chrono::{Datelike, NaiveDate};

/// Column layout of an ingested file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvSchema {
    /// `id, firstName, lastName, dob, className, score`
    Standard,
    /// `id, firstName, lastName, age, email, className, score[, year]`
    Legacy,
}

impl CsvSchema {
    /// Selects the schema from the header's column count
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidInput`] for fewer than six columns.
    pub fn detect(header_columns: usize) -> Result<Self> {
        match header_columns {
            6 => Ok(CsvSchema::Standard),
            n if n >= 7 => Ok(CsvSchema::Legacy),
            n => Err(RosterError::InvalidInput(format!(
                "unrecognized header with {n} columns; expected 6 (standard) or at least 7 (legacy)"
            ))),
        }
    }

    /// Fewest fields a line must have
    pub fn min_columns(&self) -> usize {
        match self {
            CsvSchema::Standard => 6,
            CsvSchema::Legacy => 7,
        }
    }

    /// Maps one line to a row using this schema
    pub fn parse(&self, fields: &[&str], reference_date: NaiveDate) -> std::result::Result<Row, RowDecodeError> {
        match self {
            CsvSchema::Standard => parse_standard(fields),
            CsvSchema::Legacy => parse_legacy(fields, reference_date),
        }
    }
}

impl std::fmt::Display for CsvSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvSchema::Standard => f.write_str("standard"),
            CsvSchema::Legacy => f.write_str("legacy"),
        }
    }
}

fn check_width(fields: &[&str], expected: usize) -> std::result::Result<(), RowDecodeError> {
    if fields.len() < expected {
        return Err(RowDecodeError::ColumnCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// Maps `id, firstName, lastName, dob, className, score`
///
/// The id is validated and then dropped; the store assigns identity.
pub fn parse_standard(fields: &[&str]) -> std::result::Result<Row, RowDecodeError> {
    check_width(fields, 6)?;

    parse_integer("id", fields[0])?;
    let dob_text = fields[3].trim();
    let date_of_birth =
        parse_date_text(dob_text).ok_or_else(|| RowDecodeError::InvalidDate(dob_text.to_string()))?;
    let score = parse_score_text(fields[5])?;

    Row::builder()
        .first_name(fields[1].trim())
        .last_name(fields[2].trim())
        .date_of_birth(date_of_birth)
        .class_name(fields[4].trim())
        .score(score)
        .build()
        .map_err(RowDecodeError::Malformed)
}

/// Maps `id, firstName, lastName, age, email, className, score[, year]`
///
/// The birth date becomes January 1st of the reference year minus `age`.
/// Email and year are ignored.
pub fn parse_legacy(fields: &[&str], reference_date: NaiveDate) -> std::result::Result<Row, RowDecodeError> {
    check_width(fields, 7)?;

    parse_integer("id", fields[0])?;
    let age = parse_integer("age", fields[3])?;
    if age < 0 {
        return Err(RowDecodeError::InvalidAge(age));
    }
    let date_of_birth = i32::try_from(i64::from(reference_date.year()) - age)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or(RowDecodeError::InvalidAge(age))?;
    let score = parse_score_text(fields[6])?;

    Row::builder()
        .first_name(fields[1].trim())
        .last_name(fields[2].trim())
        .date_of_birth(date_of_birth)
        .class_name(fields[5].trim())
        .score(score)
        .build()
        .map_err(RowDecodeError::Malformed)
}
