//! Forward-only row assembly over a worksheet cell stream
//!
//! The workbook reader yields cells one at a time in row-major order. Cells
//! are converted to owned [`CellValue`]s as they arrive and grouped by row
//! index; at most one row plus one look-ahead cell is held.

use crate::domain::cell::CellValue;
use crate::domain::{Result, RosterError};
use calamine::{Cell, DataRef, XlsxError};

/// Columns read from each row; anything to the right is ignored
pub const COLUMNS: usize = 6;

/// One assembled worksheet row
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Zero-based worksheet row index (0 is the header)
    pub index: u32,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn cell(&self, column: usize) -> &CellValue {
        &self.cells[column]
    }

    /// True when no cell holds a value
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// Source of positioned cells
///
/// Implemented for the workbook cell reader; tests feed cells from a vector.
pub trait CellSource {
    /// Next cell as `(row, column, value)`, or `None` at end of sheet
    fn next_cell(&mut self) -> Result<Option<(u32, u32, CellValue)>>;
}

/// Workbook cell reader, wrapped as its `next_cell` method
///
/// calamine does not export the reader type by name, so it is adapted
/// through the method it exposes.
pub struct XlsxCells<F>(pub F);

impl<'a, F> CellSource for XlsxCells<F>
where
    F: FnMut() -> std::result::Result<Option<Cell<DataRef<'a>>>, XlsxError>,
{
    fn next_cell(&mut self) -> Result<Option<(u32, u32, CellValue)>> {
        let cell = (self.0)()
            .map_err(|e| RosterError::Spreadsheet(format!("Failed to read cell: {e}")))?;

        Ok(cell.map(|cell| {
            let (row, col) = cell.get_position();
            (row, col, to_cell_value(cell.get_value()))
        }))
    }
}

/// Copies a borrowed workbook value into an owned cell
pub fn to_cell_value(value: &DataRef<'_>) -> CellValue {
    match value {
        DataRef::Int(i) => CellValue::Int(*i),
        DataRef::Float(f) => CellValue::Float(*f),
        DataRef::String(s) => CellValue::Text(s.clone()),
        DataRef::SharedString(s) => CellValue::Text((*s).to_string()),
        DataRef::Bool(b) => CellValue::Bool(*b),
        DataRef::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        DataRef::DateTimeIso(s) => CellValue::Text(s.clone()),
        _ => CellValue::Empty,
    }
}

/// Groups a cell stream into rows
pub struct RowAssembler<S> {
    source: S,
    pending: Option<(u32, u32, CellValue)>,
}

impl<S: CellSource> RowAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    /// Next row that has at least one cell
    ///
    /// Rows absent from the stream are never produced.
    pub fn next_row(&mut self) -> Result<Option<SheetRow>> {
        let first = match self.pending.take() {
            Some(cell) => cell,
            None => match self.source.next_cell()? {
                Some(cell) => cell,
                None => return Ok(None),
            },
        };

        let index = first.0;
        let mut cells = vec![CellValue::Empty; COLUMNS];
        place(&mut cells, first.1, first.2);

        while let Some((row, col, value)) = self.source.next_cell()? {
            if row != index {
                self.pending = Some((row, col, value));
                break;
            }
            place(&mut cells, col, value);
        }

        Ok(Some(SheetRow { index, cells }))
    }
}

fn place(cells: &mut [CellValue], col: u32, value: CellValue) {
    if let Some(slot) = cells.get_mut(col as usize) {
        *slot = value;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Cell source backed by a queue, failing once `fail_after` cells are read
    pub(crate) struct VecSource {
        cells: VecDeque<(u32, u32, CellValue)>,
        fail_after: Option<usize>,
        read: usize,
    }

    impl VecSource {
        pub(crate) fn new(cells: Vec<(u32, u32, CellValue)>) -> Self {
            Self {
                cells: cells.into(),
                fail_after: None,
                read: 0,
            }
        }

        pub(crate) fn failing_after(mut self, n: usize) -> Self {
            self.fail_after = Some(n);
            self
        }
    }

    impl CellSource for VecSource {
        fn next_cell(&mut self) -> Result<Option<(u32, u32, CellValue)>> {
            if Some(self.read) == self.fail_after {
                return Err(RosterError::Spreadsheet("truncated archive".to_string()));
            }
            self.read += 1;
            Ok(self.cells.pop_front())
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_groups_cells_by_row() {
        let source = VecSource::new(vec![
            (0, 0, text("studentId")),
            (0, 1, text("firstName")),
            (1, 0, CellValue::Float(1.0)),
            (1, 5, CellValue::Float(60.0)),
            (3, 1, text("Jo")),
        ]);
        let mut rows = RowAssembler::new(source);

        let header = rows.next_row().unwrap().unwrap();
        assert_eq!(header.index, 0);
        assert_eq!(header.cell(1), &text("firstName"));

        let first = rows.next_row().unwrap().unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.cell(0), &CellValue::Float(1.0));
        assert_eq!(first.cell(3), &CellValue::Empty);
        assert_eq!(first.cell(5), &CellValue::Float(60.0));

        let third = rows.next_row().unwrap().unwrap();
        assert_eq!(third.index, 3);

        assert!(rows.next_row().unwrap().is_none());
    }

    #[test]
    fn test_ignores_columns_beyond_six() {
        let source = VecSource::new(vec![(1, 0, text("a")), (1, 9, text("extra"))]);
        let row = RowAssembler::new(source).next_row().unwrap().unwrap();
        assert_eq!(row.cells.len(), COLUMNS);
    }

    #[test]
    fn test_blank_row_detection() {
        let source = VecSource::new(vec![(2, 0, text("  ")), (2, 3, CellValue::Empty)]);
        let row = RowAssembler::new(source).next_row().unwrap().unwrap();
        assert!(row.is_blank());
    }

    #[test]
    fn test_source_error_propagates() {
        let source = VecSource::new(vec![(0, 0, text("x")), (1, 0, text("y"))]).failing_after(1);
        let mut rows = RowAssembler::new(source);
        assert!(rows.next_row().is_err());
    }
}
