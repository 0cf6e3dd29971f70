//! Spreadsheet cell values
//!
//! Spreadsheet cells arrive in several native representations. They are
//! captured as a [`CellValue`] and turned into row fields by the explicit
//! decode functions in [`crate::core::decode`].

use chrono::NaiveDateTime;

/// A single typed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent or blank cell
    #[default]
    Empty,
    /// Integer cell
    Int(i64),
    /// Floating point cell (also used for unformatted date serials)
    Float(f64),
    /// Text cell
    Text(String),
    /// Boolean cell
    Bool(bool),
    /// Cell carrying a native date/time value
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for absent cells and text cells holding only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as text
    ///
    /// Integral floats render without a fractional part so that a numeric cell
    /// in a text column reads the way it was typed.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", *f as i64))
            }
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.date().to_string()),
        }
    }
}
