//! Forward-only row cursor contract and an in-memory implementation

use crate::error::{ReconError, Result};
use crate::schema::ColumnDef;
use crate::value::CellValue;

/// A forward-only, single-pass iterator over one tabular resource.
///
/// The cursor starts before the first row (`row_number() == 0`). Each call to
/// [`RowCursor::next`] moves to the following row and returns `false` once the
/// rows are exhausted. Prior rows are never revisited.
pub trait RowCursor {
    /// Column descriptors, in position order
    fn columns(&self) -> &[ColumnDef];

    /// Advance to the next row
    fn next(&mut self) -> Result<bool>;

    /// Value of the current row at a 1-based column position
    fn value(&self, position: usize) -> Result<CellValue>;

    /// 1-based number of the current row, 0 before the first call to `next`
    fn row_number(&self) -> u64;

    fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// All values of the current row
    fn row_values(&self) -> Result<Vec<CellValue>> {
        (1..=self.column_count()).map(|pos| self.value(pos)).collect()
    }
}

impl<T> RowCursor for &mut T
where
    T: RowCursor + ?Sized,
{
    fn columns(&self) -> &[ColumnDef] {
        (**self).columns()
    }

    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn value(&self, position: usize) -> Result<CellValue> {
        (**self).value(position)
    }

    fn row_number(&self) -> u64 {
        (**self).row_number()
    }
}

impl<T> RowCursor for Box<T>
where
    T: RowCursor + ?Sized,
{
    fn columns(&self) -> &[ColumnDef] {
        self.as_ref().columns()
    }

    fn next(&mut self) -> Result<bool> {
        self.as_mut().next()
    }

    fn value(&self, position: usize) -> Result<CellValue> {
        self.as_ref().value(position)
    }

    fn row_number(&self) -> u64 {
        self.as_ref().row_number()
    }
}

/// Row cursor over rows held in memory
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    columns: Vec<ColumnDef>,
    rows: Vec<Vec<CellValue>>,
    row: u64,
    fail_at: Option<u64>,
    closed: bool,
}

impl MemoryCursor {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            rows,
            row: 0,
            fail_at: None,
            closed: false,
        }
    }

    /// Make the advance onto the given 1-based row fail, as an I/O backed
    /// cursor would when its resource breaks mid-stream.
    pub fn fail_at_row(mut self, row: u64) -> Self {
        self.fail_at = Some(row);
        self
    }

    /// Close the cursor; every later call fails
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ReconError::cursor("The cursor is closed"));
        }
        Ok(())
    }

    fn current(&self) -> Result<&Vec<CellValue>> {
        if self.row == 0 {
            return Err(ReconError::cursor("The cursor is before the first row"));
        }
        self.rows.get(self.row as usize - 1).ok_or_else(|| {
            ReconError::cursor(format!("The cursor is past the last row ({})", self.rows.len()))
        })
    }
}

impl RowCursor for MemoryCursor {
    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn next(&mut self) -> Result<bool> {
        self.ensure_open()?;
        if self.row as usize >= self.rows.len() {
            return Ok(false);
        }
        if self.fail_at == Some(self.row + 1) {
            return Err(ReconError::cursor(format!(
                "Failed to read row {}",
                self.row + 1
            )));
        }
        self.row += 1;
        Ok(true)
    }

    fn value(&self, position: usize) -> Result<CellValue> {
        self.ensure_open()?;
        let row = self.current()?;
        if position == 0 || position > row.len() {
            return Err(ReconError::cursor(format!(
                "Column position ({}) is out of range for row {} with {} values",
                position,
                self.row,
                row.len()
            )));
        }
        Ok(row[position - 1].clone())
    }

    fn row_number(&self) -> u64 {
        self.row
    }
}
