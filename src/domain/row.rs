//! Student row domain model
//!
//! A [`Row`] is the single record that flows through every pipeline stage.
//! Rows are immutable once built; the per-stage score adjustment returns a new
//! value through [`Row::with_score_delta`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of the spreadsheet and CSV header, in field order
pub const HEADER: [&str; 6] = ["studentId", "firstName", "lastName", "DOB", "class", "score"];

/// Canonical text form of a date of birth
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Score adjustment applied when a spreadsheet is converted to CSV
pub const CONVERSION_SCORE_DELTA: u32 = 10;

/// Score adjustment applied when a CSV file is ingested into the store
pub const INGESTION_SCORE_DELTA: u32 = 5;

/// One normalized student record
///
/// # Examples
///
/// ```
/// use rosterflow::domain::row::Row;
/// use chrono::NaiveDate;
///
/// let row = Row::builder()
///     .id(7)
///     .first_name("Jo")
///     .last_name("Smith")
///     .date_of_birth(NaiveDate::from_ymd_opt(2001, 5, 1).unwrap())
///     .class_name("Class2")
///     .score(60)
///     .build()
///     .unwrap();
///
/// let adjusted = row.with_score_delta(5);
/// assert_eq!(adjusted.score(), 65);
/// assert_eq!(adjusted.dob_iso(), "2001-05-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    class_name: String,
    score: u32,
}

impl Row {
    /// Creates a new builder for constructing a Row
    pub fn builder() -> RowBuilder {
        RowBuilder::default()
    }

    /// Student identity; `None` until a store assigns one
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Date of birth in canonical `yyyy-MM-dd` form
    pub fn dob_iso(&self) -> String {
        self.date_of_birth.format(ISO_DATE_FORMAT).to_string()
    }

    /// Returns a copy of this row with `delta` added to the score
    pub fn with_score_delta(self, delta: u32) -> Self {
        Self {
            score: self.score.saturating_add(delta),
            ..self
        }
    }

    /// Returns a copy of this row without an identity
    pub fn without_id(self) -> Self {
        Self { id: None, ..self }
    }

    /// Returns a copy of this row carrying a store-assigned identity
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Encodes the row as six text fields in [`HEADER`] order
    pub fn to_record(&self) -> [String; 6] {
        [
            self.id.map(|id| id.to_string()).unwrap_or_default(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.dob_iso(),
            self.class_name.clone(),
            self.score.to_string(),
        ]
    }
}

/// Builder for constructing Row instances
#[derive(Debug, Default)]
pub struct RowBuilder {
    id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    class_name: Option<String>,
    score: Option<u32>,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn score(mut self, score: u32) -> Self {
        self.score = Some(score);
        self
    }

    /// Builds the Row
    ///
    /// Names and class default to empty text.
    ///
    /// # Errors
    ///
    /// Returns an error if the date of birth or score is missing
    pub fn build(self) -> Result<Row, String> {
        Ok(Row {
            id: self.id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            date_of_birth: self.date_of_birth.ok_or("date_of_birth is required")?,
            class_name: self.class_name.unwrap_or_default(),
            score: self.score.ok_or("score is required")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::builder()
            .id(1)
            .first_name("Jane")
            .last_name("Brown")
            .date_of_birth(NaiveDate::from_ymd_opt(2003, 11, 30).unwrap())
            .class_name("Class3")
            .score(70)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_date_and_score() {
        let err = Row::builder().first_name("x").score(1).build().unwrap_err();
        assert!(err.contains("date_of_birth"));

        let err = Row::builder()
            .date_of_birth(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
            .build()
            .unwrap_err();
        assert!(err.contains("score"));
    }

    #[test]
    fn test_score_delta_returns_new_row() {
        let original = sample_row();
        let adjusted = original.clone().with_score_delta(CONVERSION_SCORE_DELTA);

        assert_eq!(original.score(), 70);
        assert_eq!(adjusted.score(), 80);
        assert_eq!(adjusted.first_name(), original.first_name());
    }

    #[test]
    fn test_score_delta_saturates() {
        let row = Row::builder()
            .date_of_birth(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
            .score(u32::MAX)
            .build()
            .unwrap();
        assert_eq!(row.with_score_delta(5).score(), u32::MAX);
    }

    #[test]
    fn test_to_record_uses_iso_date() {
        let record = sample_row().to_record();
        assert_eq!(record, ["1", "Jane", "Brown", "2003-11-30", "Class3", "70"]);
    }

    #[test]
    fn test_without_id_encodes_empty_id() {
        let record = sample_row().without_id().to_record();
        assert_eq!(record[0], "");
    }
}
