//! Field decode rules shared by the converter and the ingestor
//!
//! Each row field has an explicit decode function. The fallback order of
//! every function is fixed:
//!
//! - dates: native date cell, then numeric date serial, then text patterns in
//!   [`DATE_PATTERNS`] order, then the caller's reference date
//! - scores: numeric cell, then text with everything but digits and `-`
//!   stripped, then the caller's default; negative values and values above
//!   [`MAX_RAW_SCORE`] are rejected
//! - identity and text fields: native or text cells, numeric cells rendered
//!   as their integer form

use crate::domain::cell::CellValue;
use crate::domain::errors::RowDecodeError;
use chrono::{Duration, NaiveDate};

/// Textual date patterns, tried in order
pub const DATE_PATTERNS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Largest score a stage accepts before applying its delta
///
/// Scores are stored in a signed 32-bit column; the margin below `i32::MAX`
/// covers every stage delta.
pub const MAX_RAW_SCORE: u32 = i32::MAX as u32 - 1_000;

/// Outcome of a decode that may fall back to a default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<T> {
    /// Value read from the source
    Value(T),
    /// Source was absent or unreadable; the documented default was used
    Defaulted(T),
}

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        match self {
            Decoded::Value(v) | Decoded::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Decoded::Defaulted(_))
    }
}

/// Decodes a date of birth cell, falling back to `reference_date`
///
/// Never fails: a malformed or missing date only defaults this field.
pub fn decode_date(cell: &CellValue, reference_date: NaiveDate) -> Decoded<NaiveDate> {
    let parsed = match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Float(serial) => excel_serial_to_date(*serial),
        CellValue::Int(serial) => excel_serial_to_date(*serial as f64),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    };

    match parsed {
        Some(date) => Decoded::Value(date),
        None => Decoded::Defaulted(reference_date),
    }
}

/// Parses date text against [`DATE_PATTERNS`]
///
/// ISO date-time text (`2001-05-01T00:00:00`) is accepted by its date part.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for pattern in DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
            return Some(date);
        }
    }

    // ISO date-time: keep the date part
    match text.split_once(['T', ' ']) {
        Some((date_part, _)) => NaiveDate::parse_from_str(date_part, DATE_PATTERNS[0]).ok(),
        None => None,
    }
}

/// Converts an Excel 1900-system serial to a calendar date
///
/// Serials below 60 predate Excel's phantom 1900-02-29 and use a base one day
/// later than the rest of the range.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let days = serial.trunc() as i64;
    let base = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    base.checked_add_signed(Duration::days(days))
}

/// Decodes a score cell, falling back to `default_raw` when unreadable
///
/// # Errors
///
/// Returns [`RowDecodeError::NegativeScore`] when the source holds a
/// negative number and [`RowDecodeError::ScoreOutOfRange`] when it exceeds
/// [`MAX_RAW_SCORE`]; the row must be dropped.
pub fn decode_score(cell: &CellValue, default_raw: u32) -> Result<Decoded<u32>, RowDecodeError> {
    let raw = match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        CellValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-')
                .collect();
            cleaned.parse::<i64>().ok()
        }
        _ => None,
    };

    match raw {
        Some(value) => check_score_range(value).map(Decoded::Value),
        None => Ok(Decoded::Defaulted(default_raw)),
    }
}

/// Strictly parses score text from a delimited line
///
/// # Errors
///
/// Fails for non-numeric, negative or out-of-range values.
pub fn parse_score_text(text: &str) -> Result<u32, RowDecodeError> {
    check_score_range(parse_integer("score", text)?)
}

fn check_score_range(value: i64) -> Result<u32, RowDecodeError> {
    if value < 0 {
        return Err(RowDecodeError::NegativeScore(value));
    }
    u32::try_from(value)
        .ok()
        .filter(|score| *score <= MAX_RAW_SCORE)
        .ok_or(RowDecodeError::ScoreOutOfRange(value))
}

/// Strictly parses an integer field from a delimited line
pub fn parse_integer(field: &'static str, text: &str) -> Result<i64, RowDecodeError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| RowDecodeError::InvalidNumber {
            field,
            value: text.trim().to_string(),
        })
}

/// Decodes a student id cell, defaulting to the 1-based row index
pub fn decode_id(cell: &CellValue, row_index: u32) -> Decoded<i64> {
    let parsed = match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        CellValue::Text(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(id) => Decoded::Value(id),
        None => Decoded::Defaulted(i64::from(row_index)),
    }
}

/// Decodes a name or class cell
pub fn decode_text(cell: &CellValue) -> String {
    cell.to_text().unwrap_or_default()
}
