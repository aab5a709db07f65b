//! Spreadsheet to FASTA conversion.
//!
//! Reads the `Input Sequence Identifier` and `Sequence from Start and End`
//! columns of a table (typically a retrieval spreadsheet) and writes one
//! FASTA entry per row. Repeated identifiers are made unique by suffixing
//! `_1`, `_2`, ... on their second and later occurrences.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::fasta::write_fasta_file;
use crate::model::FastaEntry;
use crate::table::{read_table, Cell, Sheet, TableError};
use crate::writer::{CUT_SEQUENCE_COLUMN, IDENTIFIER_COLUMN};

/// Errors that can occur during conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Excel file must contain 'Sequence from Start and End' and 'Input Sequence Identifier' columns.")]
    MissingColumns,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Failed to write FASTA file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Hands out unique identifiers for one conversion run.
///
/// The first occurrence of an identifier is returned unchanged; the n-th
/// repeat gets `_n` appended.
#[derive(Debug, Default)]
pub struct IdentifierCounter {
    seen: HashMap<String, usize>,
}

impl IdentifierCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, id: &str) -> String {
        match self.seen.get_mut(id) {
            Some(count) => {
                *count += 1;
                format!("{}_{}", id, count)
            }
            None => {
                self.seen.insert(id.to_string(), 0);
                id.to_string()
            }
        }
    }
}

/// Builds FASTA entries from a loaded sheet, in row order.
///
/// Fully blank rows are skipped.
pub fn sheet_to_entries(sheet: &Sheet) -> ConvertResult<Vec<FastaEntry>> {
    let (Some(id_col), Some(seq_col)) = (
        sheet.column_index(IDENTIFIER_COLUMN),
        sheet.column_index(CUT_SEQUENCE_COLUMN),
    ) else {
        return Err(ConvertError::MissingColumns);
    };

    let mut counter = IdentifierCounter::new();
    let entries = sheet
        .data_rows()
        .filter(|(_, cells)| !cells.iter().all(Cell::is_empty))
        .map(|(row, _)| {
            let id = sheet.cell(row, id_col).to_string();
            let sequence = sheet.cell(row, seq_col).to_string();
            FastaEntry::new(counter.unique(&id), sequence)
        })
        .collect();
    Ok(entries)
}

/// Default FASTA path for a table: same location, `.fasta` extension.
pub fn default_output_path<P: AsRef<Path>>(source: P) -> PathBuf {
    source.as_ref().with_extension("fasta")
}

/// Converts a table into a FASTA file and returns the path written.
///
/// The table is validated and fully read before the output is created.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> ConvertResult<PathBuf> {
    let destination = destination.as_ref();
    let sheet = read_table(source)?;
    let entries = sheet_to_entries(&sheet)?;

    write_fasta_file(destination, &entries).map_err(|source| ConvertError::Write {
        path: destination.to_path_buf(),
        source,
    })?;
    info!(
        "FASTA file '{}' generated successfully ({} sequences).",
        destination.display(),
        entries.len()
    );
    Ok(destination.to_path_buf())
}
