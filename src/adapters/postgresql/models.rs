//! Column mapping between `students` rows and [`Row`]

use crate::domain::{Result, RosterError, Row};
use chrono::NaiveDate;

/// Column arrays for one `UNNEST` insert
#[derive(Debug, Default)]
pub struct StudentColumns<'a> {
    pub first_names: Vec<&'a str>,
    pub last_names: Vec<&'a str>,
    pub dobs: Vec<NaiveDate>,
    pub class_names: Vec<&'a str>,
    pub scores: Vec<i32>,
}

impl<'a> StudentColumns<'a> {
    /// Splits rows into per-column arrays; ids are not carried
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Database`] if a score does not fit an `INTEGER`.
    pub fn from_rows(rows: &'a [Row]) -> Result<Self> {
        let mut columns = Self {
            first_names: Vec::with_capacity(rows.len()),
            last_names: Vec::with_capacity(rows.len()),
            dobs: Vec::with_capacity(rows.len()),
            class_names: Vec::with_capacity(rows.len()),
            scores: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            let score = i32::try_from(row.score()).map_err(|_| {
                RosterError::Database(format!("score {} exceeds INTEGER range", row.score()))
            })?;
            columns.first_names.push(row.first_name());
            columns.last_names.push(row.last_name());
            columns.dobs.push(row.date_of_birth());
            columns.class_names.push(row.class_name());
            columns.scores.push(score);
        }

        Ok(columns)
    }
}

/// Builds a [`Row`] from a `SELECT student_id, first_name, last_name, dob, class_name, score`
pub fn row_from_pg(pg_row: &tokio_postgres::Row) -> Result<Row> {
    let get_err = |e: tokio_postgres::Error| RosterError::Database(format!("Bad students row: {e}"));

    let student_id: i64 = pg_row.try_get("student_id").map_err(get_err)?;
    let first_name: String = pg_row.try_get("first_name").map_err(get_err)?;
    let last_name: String = pg_row.try_get("last_name").map_err(get_err)?;
    let dob: NaiveDate = pg_row.try_get("dob").map_err(get_err)?;
    let class_name: String = pg_row.try_get("class_name").map_err(get_err)?;
    let score: i32 = pg_row.try_get("score").map_err(get_err)?;

    let score = u32::try_from(score)
        .map_err(|_| RosterError::Database(format!("student {student_id} has negative score {score}")))?;

    Row::builder()
        .id(student_id)
        .first_name(first_name)
        .last_name(last_name)
        .date_of_birth(dob)
        .class_name(class_name)
        .score(score)
        .build()
        .map_err(RosterError::Database)
}
