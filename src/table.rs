//! Tabular file I/O.
//!
//! Supports automatic format detection from the file extension:
//! - Spreadsheets (.xlsx, .xlsm, .xlsb, .xls, .ods) - read; .xlsx - write
//! - Comma-separated text (.csv) - read and write
//! - Tab-separated text (.tsv, .tab, .txt) - read and write
//!
//! Spreadsheets are read from their first worksheet. Cells keep their
//! absolute positions: a sheet whose used area starts at C5 still reports
//! its first data cell at row 4, column 2.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

/// Detected table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Spreadsheet,
    Csv,
    Tsv,
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Spreadsheet => write!(f, "spreadsheet"),
            TableFormat::Csv => write!(f, "CSV"),
            TableFormat::Tsv => write!(f, "TSV"),
        }
    }
}

impl TableFormat {
    fn delimiter(&self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Errors that can occur while reading or writing tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported table file '{0}': expected .xlsx, .xls, .ods, .csv or .tsv")]
    UnknownFormat(String),

    #[error("Writing '{0}' is not supported: spreadsheets can only be written as .xlsx")]
    UnsupportedOutput(String),

    #[error("Workbook has no worksheet")]
    NoWorksheet,

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxError(#[from] XlsxError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Table too large: row {0} is beyond the spreadsheet limit")]
    TooManyRows(usize),
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// True for cells a spreadsheet user would read as "nothing there":
    /// empty, blank text, zero, or false.
    pub fn is_falsy(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Int(i) => *i == 0,
            Cell::Float(f) => *f == 0.0,
            Cell::Bool(b) => !b,
            Cell::Text(s) => s.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerces the cell to an integer.
    ///
    /// Floats are truncated toward zero; text must parse as an integer.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

static EMPTY: Cell = Cell::Empty;

/// A fully loaded table: rows of cells, row 0 being the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns a cell by 0-based position; missing cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Returns the header row, if any.
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finds a header column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header()
            .iter()
            .position(|cell| matches!(cell, Cell::Text(s) if s == name))
    }

    /// Iterates over data rows (everything after the header) with their
    /// 0-based row index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx, row.as_slice()))
    }
}

/// Detects the table format from the file extension.
pub fn detect_table_format<P: AsRef<Path>>(path: P) -> Option<TableFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    match ext.to_lowercase().as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(TableFormat::Spreadsheet),
        "csv" => Some(TableFormat::Csv),
        "tsv" | "tab" | "txt" => Some(TableFormat::Tsv),
        _ => None,
    }
}

fn format_of(path: &Path) -> TableResult<TableFormat> {
    detect_table_format(path).ok_or_else(|| TableError::UnknownFormat(path.display().to_string()))
}

/// Reads a whole table into memory.
pub fn read_table<P: AsRef<Path>>(path: P) -> TableResult<Sheet> {
    let path = path.as_ref();
    match format_of(path)? {
        TableFormat::Spreadsheet => read_spreadsheet(path),
        format => read_delimited(path, format.delimiter()),
    }
}

fn read_spreadsheet(path: &Path) -> TableResult<Sheet> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::NoWorksheet)??;

    // calamine trims leading empty rows/columns; restore absolute positions
    let (first_row, first_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Ok(Sheet::default()),
    };

    let mut rows = vec![Vec::new(); first_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col];
        cells.extend(row.iter().map(Cell::from));
        rows.push(cells);
    }
    Ok(Sheet::new(rows))
}

fn read_delimited(path: &Path, delimiter: u8) -> TableResult<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(Sheet::new(rows))
}

/// Writes a header row followed by data rows, replacing any existing file.
///
/// The whole table is built in memory first and saved in one go.
pub fn write_table<P: AsRef<Path>>(path: P, header: &[&str], rows: &[Vec<Cell>]) -> TableResult<()> {
    let path = path.as_ref();
    let format = format_of(path)?;
    match format {
        TableFormat::Spreadsheet => {
            let is_xlsx = path
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
            if !is_xlsx {
                return Err(TableError::UnsupportedOutput(path.display().to_string()));
            }
            write_xlsx(path, header, rows)
        }
        _ => write_delimited(path, format.delimiter(), header, rows),
    }
}

fn write_xlsx(path: &Path, header: &[&str], rows: &[Vec<Cell>]) -> TableResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| TableError::TooManyRows(idx + 1))?;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Int(i) => {
                    worksheet.write_number(row_num, col, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(row_num, col, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s.as_str())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_delimited(
    path: &Path,
    delimiter: u8,
    header: &[&str],
    rows: &[Vec<Cell>],
) -> TableResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row.iter().map(Cell::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(detect_table_format("a.xlsx"), Some(TableFormat::Spreadsheet));
        assert_eq!(detect_table_format("a.XLSX"), Some(TableFormat::Spreadsheet));
        assert_eq!(detect_table_format("a.ods"), Some(TableFormat::Spreadsheet));
        assert_eq!(detect_table_format("a.csv"), Some(TableFormat::Csv));
        assert_eq!(detect_table_format("a.tsv"), Some(TableFormat::Tsv));
        assert_eq!(detect_table_format("a.fasta"), None);
        assert_eq!(detect_table_format("noext"), None);
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(Cell::Int(12).to_integer(), Some(12));
        assert_eq!(Cell::Float(12.0).to_integer(), Some(12));
        assert_eq!(Cell::Float(12.9).to_integer(), Some(12));
        assert_eq!(Cell::text(" 42 ").to_integer(), Some(42));
        assert_eq!(Cell::text("4x2").to_integer(), None);
        assert_eq!(Cell::text("2.0").to_integer(), None);
        assert_eq!(Cell::Empty.to_integer(), None);
    }

    #[test]
    fn test_cell_falsy() {
        assert!(Cell::Empty.is_falsy());
        assert!(Cell::Int(0).is_falsy());
        assert!(Cell::text("").is_falsy());
        assert!(!Cell::text("0").is_falsy());
        assert!(!Cell::Float(0.5).is_falsy());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Float(3.0).to_string(), "3");
        assert_eq!(Cell::Float(2.5).to_string(), "2.5");
        assert_eq!(Cell::Int(-7).to_string(), "-7");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_sheet_access() {
        let sheet = Sheet::new(vec![
            vec![Cell::text("id"), Cell::text("seq")],
            vec![Cell::text("a"), Cell::text("ACGT")],
            vec![Cell::text("b")],
        ]);
        assert_eq!(sheet.column_index("seq"), Some(1));
        assert_eq!(sheet.column_index("Seq"), None);
        assert_eq!(sheet.cell(2, 1), &Cell::Empty);
        assert_eq!(sheet.cell(9, 9), &Cell::Empty);
        assert_eq!(sheet.data_rows().count(), 2);
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        write_table(
            &path,
            &["id", "n"],
            &[vec![Cell::text("a,b"), Cell::Int(3)], vec![Cell::text("c"), Cell::Empty]],
        )
        .unwrap();

        let sheet = read_table(&path).unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(1, 0), &Cell::text("a,b"));
        assert_eq!(sheet.cell(1, 1).to_integer(), Some(3));
        assert_eq!(sheet.cell(2, 1), &Cell::Empty);
    }

    #[test]
    fn test_xlsx_roundtrip_keeps_positions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.xlsx");
        write_table(
            &path,
            &["id", "start"],
            &[vec![Cell::Empty, Cell::Int(5)], vec![Cell::text("x"), Cell::Float(1.5)]],
        )
        .unwrap();

        let sheet = read_table(&path).unwrap();
        assert_eq!(sheet.cell(0, 0), &Cell::text("id"));
        assert_eq!(sheet.cell(1, 0), &Cell::Empty);
        assert_eq!(sheet.cell(1, 1).to_integer(), Some(5));
        assert_eq!(sheet.cell(2, 0), &Cell::text("x"));
        assert_eq!(sheet.cell(2, 1), &Cell::Float(1.5));
    }

    #[test]
    fn test_unknown_format() {
        let result = read_table("coords.json");
        assert!(matches!(result, Err(TableError::UnknownFormat(_))));

        let dir = TempDir::new().unwrap();
        let result = write_table(dir.path().join("out.ods"), &["a"], &[]);
        assert!(matches!(result, Err(TableError::UnsupportedOutput(_))));
    }
}
