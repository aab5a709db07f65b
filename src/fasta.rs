//! FASTA reading and writing.
//!
//! The reader handles both single-line and multi-line sequences; the
//! writer emits one header line and one unwrapped sequence line per entry.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::model::{FastaEntry, SequenceRecord};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read FASTA file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Reads every record of a FASTA file into memory.
///
/// # Examples
///
/// ```no_run
/// use amrseq::fasta::read_fasta_file;
///
/// let records = read_fasta_file("isolate-42_[S7].fasta").unwrap();
/// println!("Loaded {} sequences", records.len());
/// ```
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Vec<SequenceRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    parse_fasta(reader)
}

/// Parses FASTA content from a reader.
///
/// Records with an empty sequence are kept. An input without any header
/// yields no records.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_seq = String::new();
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = current_id.take() {
                records.push(SequenceRecord::new(id, std::mem::take(&mut current_seq)));
            }

            // Identifier is everything before the first whitespace
            let id = header.split_whitespace().next().unwrap_or(header);
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current_id = Some(id.to_string());
        } else {
            if current_id.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }

            if line.bytes().all(|b| !b.is_ascii_whitespace()) {
                current_seq.push_str(line);
            } else {
                current_seq.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
    }

    // Don't forget the last sequence
    if let Some(id) = current_id {
        records.push(SequenceRecord::new(id, current_seq));
    }

    Ok(records)
}

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<SequenceRecord>> {
    parse_fasta(content.as_bytes())
}

/// Writes entries as `>id` / sequence line pairs, without line wrapping.
pub fn write_fasta<W: Write>(mut writer: W, entries: &[FastaEntry]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(writer, ">{}", entry.id)?;
        writeln!(writer, "{}", entry.sequence)?;
    }
    writer.flush()
}

/// Creates (or truncates) `path` and writes the entries to it.
pub fn write_fasta_file<P: AsRef<Path>>(path: P, entries: &[FastaEntry]) -> std::io::Result<()> {
    let file = File::create(path)?;
    write_fasta(BufWriter::new(file), entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let content = ">seq1\nACGT\n>seq2\nTGCA\n";
        let records = parse_fasta_str(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "seq1");
        assert_eq!(records[0].sequence, "ACGT");
        assert_eq!(records[1].id, "seq2");
        assert_eq!(records[1].sequence, "TGCA");
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let content = ">seq1\nACGT\nTGCA\nAAAA\n";
        let records = parse_fasta_str(content).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "ACGTTGCAAAAA");
    }

    #[test]
    fn test_parse_with_description() {
        let content = ">NODE_1_length_5 cov=12.4\nACGTA\n";
        let records = parse_fasta_str(content).unwrap();

        assert_eq!(records[0].id, "NODE_1_length_5");
    }

    #[test]
    fn test_empty_sequence_is_kept() {
        let content = ">empty\n>seq2\nTGCA\n";
        let records = parse_fasta_str(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "empty");
        assert!(records[0].is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta_str("").unwrap().is_empty());
        assert!(parse_fasta_str("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_sequence_without_header() {
        let content = "ACGT\n>seq1\nTGCA\n";
        let result = parse_fasta_str(content);
        assert!(matches!(result, Err(FastaError::SequenceWithoutHeader(1))));
    }

    #[test]
    fn test_empty_identifier() {
        let result = parse_fasta_str(">\nACGT\n");
        assert!(matches!(result, Err(FastaError::InvalidFormat(_))));
    }

    #[test]
    fn test_case_preservation() {
        let records = parse_fasta_str(">seq1\nacgtN\n").unwrap();
        assert_eq!(records[0].sequence, "acgtN");
    }

    #[test]
    fn test_write_fasta() {
        let entries = vec![
            FastaEntry::new("X", "ACGT"),
            FastaEntry::new("X_1", "GG"),
            FastaEntry::new("empty", ""),
        ];
        let mut out = Vec::new();
        write_fasta(&mut out, &entries).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">X\nACGT\n>X_1\nGG\n>empty\n\n"
        );
    }

    #[test]
    fn test_long_sequence_is_not_wrapped() {
        let long = "A".repeat(500);
        let mut out = Vec::new();
        write_fasta(&mut out, &[FastaEntry::new("long", long.clone())]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some(long.as_str()));
    }
}
