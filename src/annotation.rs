//! Annotation loader.
//!
//! Reads the coordinate table into an [`AnnotationTable`]. Columns are
//! fixed by position (1-based, as a spreadsheet user counts them):
//!
//! | column | content          |
//! |--------|------------------|
//! | 2      | sequence id      |
//! | 3      | start (1-based)  |
//! | 4      | end (inclusive)  |
//! | 13     | resistance label |
//!
//! The first row is a header; data starts on row 2.

use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::model::{AnnotationRecord, AnnotationTable};
use crate::table::{read_table, Cell, Sheet, TableError};

/// 0-based column positions of the required fields.
const ID_COLUMN: usize = 1;
const START_COLUMN: usize = 2;
const END_COLUMN: usize = 3;
const RESISTANCE_COLUMN: usize = 12;

/// How rows with missing required fields are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Rows with an empty (or zero) required field are skipped silently.
    #[default]
    SkipIncomplete,
    /// Every non-blank data row must carry all required fields.
    Strict,
}

/// Errors that can occur while loading annotations.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Error loading data from Excel file: {0}")]
    Table(#[from] TableError),

    #[error("Invalid {column} value '{value}' on row {row}: expected an integer")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Missing {column} on row {row}")]
    MissingField { row: usize, column: &'static str },
}

/// Result type for annotation loading.
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Loads the annotation table from a spreadsheet or delimited file.
///
/// Any coordinate that is present but not an integer aborts the whole load.
pub fn load_annotations<P: AsRef<Path>>(path: P, policy: RowPolicy) -> AnnotationResult<AnnotationTable> {
    let sheet = read_table(path)?;
    build_table(&sheet, policy)
}

/// Builds the annotation table from an already loaded sheet.
pub fn build_table(sheet: &Sheet, policy: RowPolicy) -> AnnotationResult<AnnotationTable> {
    let mut table = AnnotationTable::new();

    for (row_idx, cells) in sheet.data_rows() {
        // Spreadsheet row number as the user sees it
        let row = row_idx + 1;
        if cells.iter().all(Cell::is_empty) {
            continue;
        }

        let id = sheet.cell(row_idx, ID_COLUMN);
        let start = sheet.cell(row_idx, START_COLUMN);
        let end = sheet.cell(row_idx, END_COLUMN);
        let resistance = sheet.cell(row_idx, RESISTANCE_COLUMN);

        let fields = [
            (id, "identifier"),
            (start, "start"),
            (end, "end"),
            (resistance, "resistance"),
        ];
        if let Some(&(_, column)) = fields.iter().find(|(cell, _)| cell.is_falsy()) {
            match policy {
                RowPolicy::SkipIncomplete => {
                    debug!("Skipping row {}: no {}", row, column);
                    continue;
                }
                RowPolicy::Strict => return Err(AnnotationError::MissingField { row, column }),
            }
        }

        let record = AnnotationRecord::new(
            coordinate(start, row, "start")?,
            coordinate(end, row, "end")?,
            resistance.to_string(),
        );
        table.insert(id.to_string(), record);
    }

    debug!(
        "Loaded {} annotations for {} identifiers",
        table.record_count(),
        table.len()
    );
    Ok(table)
}

fn coordinate(cell: &Cell, row: usize, column: &'static str) -> AnnotationResult<i64> {
    cell.to_integer()
        .ok_or_else(|| AnnotationError::InvalidCoordinate {
            row,
            column,
            value: cell.to_string(),
        })
}
