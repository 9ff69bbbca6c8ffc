//! Row cursor over delimited text, backed by the `csv` crate

use crate::cursor::RowCursor;
use crate::error::{ReconError, Result};
use crate::schema::{ColumnDef, ColumnIndex};
use crate::value::{CellValue, DataType};
use csv::{Reader, ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Options used when opening a delimited text resource
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Field content read as null in every column
    pub null_token: Option<String>,
    /// Declared types by position; unlisted positions are text
    pub types: Vec<DataType>,
    /// Declared types by column name, applied after `types`
    pub named_types: IndexMap<String, DataType>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_token: None,
            types: Vec::new(),
            named_types: IndexMap::new(),
        }
    }
}

/// Forward-only cursor over a CSV resource with a header row
pub struct CsvCursor<R: Read> {
    reader: Reader<R>,
    columns: Vec<ColumnDef>,
    record: StringRecord,
    row: u64,
    null_token: Option<String>,
    exhausted: bool,
}

impl CsvCursor<File> {
    /// Open a CSV file
    pub fn open(path: &Path, options: &CsvOptions) -> Result<Self> {
        if !path.is_file() {
            return Err(ReconError::invalid_input(format!(
                "File not found: {}",
                path.display()
            )));
        }
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }
}

impl<R: Read> CsvCursor<R> {
    /// Read the header and resolve declared column types
    pub fn from_reader(input: R, options: &CsvOptions) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let mut columns: Vec<ColumnDef> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let data_type = options.types.get(i).copied().unwrap_or(DataType::Text);
                ColumnDef::new(name.trim(), i + 1, data_type)
            })
            .collect();

        if options.types.len() > columns.len() {
            return Err(ReconError::config(format!(
                "({}) column types were declared but the resource has only ({}) columns",
                options.types.len(),
                columns.len()
            )));
        }

        let index = ColumnIndex::new(&columns);
        for (name, data_type) in &options.named_types {
            let position = index.position(name).ok_or_else(|| {
                ReconError::config(format!(
                    "A type was declared for the column ({}) which does not exist. Expected one of: {}",
                    name,
                    index.known_columns()
                ))
            })?;
            columns[position - 1].data_type = *data_type;
        }

        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
            row: 0,
            null_token: options.null_token.clone(),
            exhausted: false,
        })
    }
}

impl<R: Read> RowCursor for CsvCursor<R> {
    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.reader.read_record(&mut self.record)? {
            self.exhausted = true;
            return Ok(false);
        }
        self.row += 1;
        if self.record.len() != self.columns.len() {
            return Err(ReconError::cursor(format!(
                "Row {} has ({}) fields while the header has ({})",
                self.row,
                self.record.len(),
                self.columns.len()
            )));
        }
        Ok(true)
    }

    fn value(&self, position: usize) -> Result<CellValue> {
        if self.row == 0 || self.exhausted {
            return Err(ReconError::cursor("The cursor is not on a row"));
        }
        let column = position
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or_else(|| {
                ReconError::cursor(format!("Column position ({}) is out of range", position))
            })?;
        let raw = self.record.get(position - 1).unwrap_or("");

        if self.null_token.as_deref() == Some(raw) {
            return Ok(CellValue::Null);
        }

        CellValue::parse_as(raw, column.data_type).map_err(|e| {
            ReconError::cursor(format!(
                "Cell(Row,Col)({},{}) of column ({}): {}",
                self.row, position, column.name, e
            ))
        })
    }

    fn row_number(&self) -> u64 {
        self.row
    }
}
