//! Tabular writer for extraction rows.

use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

use crate::model::ExtractionRow;
use crate::table::{write_table, Cell, TableError};

/// Column labels of the retrieval spreadsheet, in order.
pub const HEADER: [&str; 9] = [
    "Sl. No",
    "Input Sequence Identifier",
    "Input Sequence",
    "Length of Input Sequence",
    "Start",
    "End",
    "Sequence from Start and End",
    "Length of Cut Sequence",
    "Resistance",
];

/// Column holding the output identifier.
pub const IDENTIFIER_COLUMN: &str = HEADER[1];
/// Column holding the cut sequence.
pub const CUT_SEQUENCE_COLUMN: &str = HEADER[6];

/// Longest text an `.xlsx` cell can hold, in characters.
pub const XLSX_CELL_LIMIT: usize = 32_767;

/// Errors that can occur while saving extraction rows.
#[derive(Error, Debug)]
#[error("Failed to write '{}': {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: TableError,
}

/// Result type for writer operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Lays out one row in header order.
fn row_cells(row: &ExtractionRow) -> Vec<Cell> {
    vec![
        Cell::Int(row.serial as i64),
        Cell::text(row.output_id.as_str()),
        Cell::text(row.full_sequence.as_str()),
        Cell::Int(row.full_length as i64),
        Cell::Int(row.start),
        Cell::Int(row.end),
        Cell::text(row.cut_sequence.as_str()),
        Cell::Int(row.cut_length as i64),
        Cell::text(row.resistance.as_str()),
    ]
}

/// True when some text in `row` does not fit in an `.xlsx` cell.
fn exceeds_xlsx_cell(row: &ExtractionRow) -> bool {
    [
        &row.output_id,
        &row.full_sequence,
        &row.cut_sequence,
        &row.resistance,
    ]
    .iter()
    .any(|text| text.len() > XLSX_CELL_LIMIT && text.chars().count() > XLSX_CELL_LIMIT)
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

/// Picks the file the rows actually go to.
///
/// An `.xlsx` destination turns into the same name with a `.tsv`
/// extension when a sequence is too long for a spreadsheet cell.
pub fn effective_path(rows: &[ExtractionRow], path: &Path) -> PathBuf {
    if is_xlsx(path) && rows.iter().any(exceeds_xlsx_cell) {
        path.with_extension("tsv")
    } else {
        path.to_path_buf()
    }
}

/// Writes the header and one line per row to `path`, returning the path
/// written.
///
/// The format follows the extension (`.xlsx`, `.csv`, `.tsv`). See
/// [`effective_path`] for sequences longer than [`XLSX_CELL_LIMIT`].
pub fn write_rows<P: AsRef<Path>>(rows: &[ExtractionRow], path: P) -> WriteResult<PathBuf> {
    let requested = path.as_ref();
    let path = effective_path(rows, requested);
    if path != requested {
        warn!(
            "Sequences longer than {} characters do not fit in '{}'; writing '{}' instead.",
            XLSX_CELL_LIMIT,
            requested.display(),
            path.display()
        );
    }

    let cells: Vec<Vec<Cell>> = rows.iter().map(row_cells).collect();
    write_table(&path, &HEADER, &cells).map_err(|source| WriteError {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
