//! Sequence extraction.
//!
//! Joins the records of a FASTA file with the annotation table by
//! identifier and cuts out every annotated region, one output row per
//! (record, annotation) pair.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::annotation::{load_annotations, AnnotationError, RowPolicy};
use crate::fasta::{read_fasta_file, FastaError};
use crate::model::{AnnotationTable, Extraction, ExtractionRow, LookupGap, SequenceRecord};
use crate::writer::{write_rows, WriteError, XLSX_CELL_LIMIT};

/// Where the retrieval spreadsheet is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputLocation {
    /// Same directory as the input FASTA file
    #[default]
    BesideInput,
    /// A fixed directory
    Directory(PathBuf),
}

impl OutputLocation {
    /// Full output path for a given input FASTA file and derived suffix.
    pub fn resolve(&self, fasta: &Path, suffix: &str) -> PathBuf {
        let name = output_file_name(suffix);
        match self {
            OutputLocation::BesideInput => fasta
                .parent()
                .map(|dir| dir.join(&name))
                .unwrap_or_else(|| PathBuf::from(&name)),
            OutputLocation::Directory(dir) => dir.join(name),
        }
    }
}

/// Name of the retrieval spreadsheet for a suffix: `{suffix}_AMR.xlsx`.
pub fn output_file_name(suffix: &str) -> String {
    format!("{}_AMR.xlsx", suffix)
}

/// Derives the isolate suffix from the FASTA file name.
///
/// Takes the base name without extension, keeps what follows the last
/// `-`, then what follows the last `_`, and strips surrounding brackets:
/// `isolate-42_[S7].fasta` gives `S7`.
pub fn derive_suffix<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let after_dash = stem.rsplit('-').next().unwrap_or(stem);
    let after_underscore = after_dash.rsplit('_').next().unwrap_or(after_dash);
    after_underscore
        .trim_matches(|c: char| c == '[' || c == ']')
        .to_string()
}

/// Returns the characters from `start` through `end`, 1-based inclusive.
///
/// An `end` past the sequence is truncated to the sequence; `start > end`
/// gives an empty string. Coordinates below 1 are clamped to the start.
pub fn cut_sequence(sequence: &str, start: i64, end: i64) -> &str {
    // Zero or negative coordinates clamp to the first base; they never
    // count back from the end of the sequence.
    let from = usize::try_from(start.saturating_sub(1)).unwrap_or(0);
    let to = usize::try_from(end).unwrap_or(0);
    if from >= to {
        return "";
    }

    if sequence.is_ascii() {
        let len = sequence.len();
        return &sequence[from.min(len)..to.min(len)];
    }

    let byte_offset = |n: usize| {
        sequence
            .char_indices()
            .nth(n)
            .map(|(offset, _)| offset)
            .unwrap_or(sequence.len())
    };
    &sequence[byte_offset(from)..byte_offset(to)]
}

/// Joins sequence records with their annotations.
///
/// Row order follows the records, then each record's annotations in table
/// order. `serial` is the record's 1-based position in `records`. Records
/// without annotations produce no rows and one [`LookupGap`].
pub fn extract(records: &[SequenceRecord], table: &AnnotationTable, suffix: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (idx, record) in records.iter().enumerate() {
        let Some(annotations) = table.get(&record.id) else {
            let gap = LookupGap {
                id: record.id.clone(),
            };
            warn!("{}", gap);
            extraction.gaps.push(gap);
            continue;
        };

        let full_length = record.len();
        let output_id = format!("{}_{}", record.id, suffix);
        for annotation in annotations {
            let cut = cut_sequence(&record.sequence, annotation.start, annotation.end);
            extraction.rows.push(ExtractionRow {
                serial: idx + 1,
                output_id: output_id.clone(),
                full_sequence: record.sequence.clone(),
                full_length,
                start: annotation.start,
                end: annotation.end,
                cut_sequence: cut.to_string(),
                cut_length: cut.chars().count(),
                resistance: annotation.resistance.clone(),
            });
        }
    }

    extraction
}

/// Errors that abort a retrieval run.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for retrieval runs.
pub type RetrievalResult<T> = Result<T, RetrievalError>;

/// Summary of a completed retrieval run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalReport {
    /// File actually written; see [`crate::writer::effective_path`].
    pub output: PathBuf,
    pub records: usize,
    pub rows: usize,
    pub gaps: Vec<LookupGap>,
    /// Set when the rows went somewhere other than the requested file.
    pub notice: Option<String>,
}

/// Runs the full retrieval: load annotations, read the FASTA file,
/// extract, and write the `{suffix}_AMR.xlsx` spreadsheet.
///
/// Both inputs are fully read before the output file is created, so a
/// failing input never leaves a partial output behind.
pub fn retrieve<P: AsRef<Path>, Q: AsRef<Path>>(
    fasta: P,
    start_end_table: Q,
    location: &OutputLocation,
    policy: RowPolicy,
) -> RetrievalResult<RetrievalReport> {
    let fasta = fasta.as_ref();
    let suffix = derive_suffix(fasta);
    let output = location.resolve(fasta, &suffix);

    let table = load_annotations(start_end_table, policy)?;
    let records = read_fasta_file(fasta)?;
    info!(
        "Read {} sequences and {} annotations",
        records.len(),
        table.record_count()
    );

    let extraction = extract(&records, &table, &suffix);
    let written = write_rows(&extraction.rows, &output)?;
    info!(
        "Output file '{}' has been generated successfully.",
        written.display()
    );

    let notice = (written != output).then(|| {
        format!(
            "Sequences longer than {} characters do not fit in an XLSX cell; wrote '{}' instead of '{}'.",
            XLSX_CELL_LIMIT,
            written.display(),
            output.display()
        )
    });

    Ok(RetrievalReport {
        output: written,
        records: records.len(),
        rows: extraction.rows.len(),
        gaps: extraction.gaps,
        notice,
    })
}
