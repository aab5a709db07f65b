//! Data model for the retrieval and conversion tools.
//!
//! This module contains all data structures for representing:
//! - Annotations (coordinate triples keyed by sequence identifier)
//! - Sequence records and extraction rows
//! - FASTA entries produced by the reverse converter
//! - The interactive application state
//!
//! Pipeline types are plain data: nothing in here touches the terminal,
//! and nothing in the pipeline touches `AppState`.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::annotation::RowPolicy;
use crate::extract::OutputLocation;

/// A region of interest inside a named sequence.
///
/// Coordinates are 1-based and inclusive, exactly as they appear in the
/// annotation spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub start: i64,
    pub end: i64,
    pub resistance: String,
}

impl AnnotationRecord {
    pub fn new(start: i64, end: i64, resistance: impl Into<String>) -> Self {
        Self {
            start,
            end,
            resistance: resistance.into(),
        }
    }
}

/// Annotations grouped by sequence identifier.
///
/// Each identifier keeps its records in the order the rows were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    records: HashMap<String, Vec<AnnotationRecord>>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record under `identifier`, after any existing ones.
    pub fn insert(&mut self, identifier: impl Into<String>, record: AnnotationRecord) {
        self.records.entry(identifier.into()).or_default().push(record);
    }

    /// Returns the records for an identifier (exact, case-sensitive match).
    pub fn get(&self, identifier: &str) -> Option<&[AnnotationRecord]> {
        self.records.get(identifier).map(Vec::as_slice)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.records.contains_key(identifier)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of annotation records across all identifiers.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// A single entry of the input sequence file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The sequence identifier (from FASTA header, without '>')
    pub id: String,
    /// The sequence data, alphabet unconstrained
    pub sequence: String,
}

impl SequenceRecord {
    /// Creates a new sequence record.
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Returns the length of the sequence in characters.
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// One output row of the extractor: a record joined with one of its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRow {
    /// 1-based position of the source record in the sequence file
    pub serial: usize,
    pub output_id: String,
    pub full_sequence: String,
    pub full_length: usize,
    pub start: i64,
    pub end: i64,
    pub cut_sequence: String,
    pub cut_length: usize,
    pub resistance: String,
}

/// A sequence record that had no annotation to join with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupGap {
    pub id: String,
}

impl fmt::Display for LookupGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No start and end values found for {}. Skipping.",
            self.id
        )
    }
}

/// Result of joining sequence records with an annotation table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub rows: Vec<ExtractionRow>,
    /// Non-fatal: records without annotations, in file order
    pub gaps: Vec<LookupGap>,
}

/// A FASTA record produced by the reverse converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    pub id: String,
    pub sequence: String,
}

impl FastaEntry {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

/// The two tools offered by the interactive front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// FASTA + coordinate table -> AMR spreadsheet
    #[default]
    Retrieve,
    /// Spreadsheet -> FASTA
    Convert,
}

impl Tool {
    pub fn title(&self) -> &'static str {
        match self {
            Tool::Retrieve => "Retrieve AMR Sequences",
            Tool::Convert => "Table to FASTA",
        }
    }

    /// Labels for the primary and secondary input fields.
    pub fn field_labels(&self) -> [&'static str; 2] {
        match self {
            Tool::Retrieve => ["Input FASTA File", "Excel File"],
            Tool::Convert => ["Input Excel File", "Output FASTA File (optional)"],
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Tool::Retrieve => Tool::Convert,
            Tool::Convert => Tool::Retrieve,
        }
    }
}

/// Which input field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Primary,
    Secondary,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Primary => Field::Secondary,
            Field::Secondary => Field::Primary,
        }
    }
}

/// A unit of work handed to the worker thread.
///
/// Holds plain paths only, so it can be moved across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Retrieve {
        fasta: PathBuf,
        table: PathBuf,
        destination: OutputLocation,
        policy: RowPolicy,
    },
    Convert {
        source: PathBuf,
        destination: Option<PathBuf>,
    },
}

/// What the worker thread reports back when a job is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub message: String,
    pub warnings: Vec<String>,
    pub failed: bool,
}

/// The application context for the interactive front end.
#[derive(Debug)]
pub struct AppState {
    /// Currently selected tool
    pub tool: Tool,
    /// Input fields for the retrieval tool: FASTA path, table path
    pub retrieve_fields: [String; 2],
    /// Input fields for the converter: table path, output path
    pub convert_fields: [String; 2],
    /// Field with keyboard focus
    pub focus: Field,
    /// Where retrieval output goes
    pub output: OutputLocation,
    /// Row policy for the annotation loader
    pub policy: RowPolicy,
    /// Set while a job is running on the worker thread
    pub running_since: Option<Instant>,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether the last job failed
    pub last_failed: bool,
    /// Warnings from the last job
    pub warnings: Vec<String>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(output: OutputLocation, policy: RowPolicy) -> Self {
        Self {
            tool: Tool::default(),
            retrieve_fields: [String::new(), String::new()],
            convert_fields: [String::new(), String::new()],
            focus: Field::default(),
            output,
            policy,
            running_since: None,
            status_message: None,
            last_failed: false,
            warnings: Vec::new(),
            should_quit: false,
        }
    }

    fn fields(&self) -> &[String; 2] {
        match self.tool {
            Tool::Retrieve => &self.retrieve_fields,
            Tool::Convert => &self.convert_fields,
        }
    }

    fn fields_mut(&mut self) -> &mut [String; 2] {
        match self.tool {
            Tool::Retrieve => &mut self.retrieve_fields,
            Tool::Convert => &mut self.convert_fields,
        }
    }

    /// Returns the text of a field of the current tool.
    pub fn field(&self, field: Field) -> &str {
        let idx = field as usize;
        &self.fields()[idx]
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Moves focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    /// Switches between the two tools. Ignored while a job runs.
    pub fn switch_tool(&mut self) {
        if self.is_running() {
            return;
        }
        self.tool = self.tool.toggled();
        self.focus = Field::Primary;
        self.status_message = None;
        self.warnings.clear();
    }

    /// Handles a character typed into the focused field.
    pub fn input_char(&mut self, c: char) {
        if self.is_running() {
            return;
        }
        let idx = self.focus as usize;
        self.fields_mut()[idx].push(c);
    }

    /// Handles backspace in the focused field.
    pub fn backspace(&mut self) {
        if self.is_running() {
            return;
        }
        let idx = self.focus as usize;
        self.fields_mut()[idx].pop();
    }

    /// Builds a job from the current fields and marks the state as running.
    ///
    /// Returns `None` (and sets a status message) if a job is already
    /// running or a required field is empty.
    pub fn start_job(&mut self) -> Option<Job> {
        if self.is_running() {
            return None;
        }
        let [primary, secondary] = self.fields().clone();
        let primary = primary.trim().to_string();
        let secondary = secondary.trim().to_string();

        let job = match self.tool {
            Tool::Retrieve => {
                if primary.is_empty() || secondary.is_empty() {
                    self.status_message =
                        Some("Please select both the FASTA file and the Excel file.".to_string());
                    self.last_failed = true;
                    return None;
                }
                Job::Retrieve {
                    fasta: PathBuf::from(primary),
                    table: PathBuf::from(secondary),
                    destination: self.output.clone(),
                    policy: self.policy,
                }
            }
            Tool::Convert => {
                if primary.is_empty() {
                    self.status_message = Some("Please select an Excel file.".to_string());
                    self.last_failed = true;
                    return None;
                }
                Job::Convert {
                    source: PathBuf::from(primary),
                    destination: (!secondary.is_empty()).then(|| PathBuf::from(secondary)),
                }
            }
        };

        self.running_since = Some(Instant::now());
        self.status_message = None;
        self.last_failed = false;
        self.warnings.clear();
        Some(job)
    }

    /// Records the outcome of a finished job.
    pub fn finish_job(&mut self, outcome: JobOutcome, elapsed: Duration) {
        self.running_since = None;
        self.last_failed = outcome.failed;
        self.warnings = outcome.warnings;
        self.status_message = Some(format!(
            "{}\n{}",
            outcome.message,
            completion_message(self.tool, elapsed)
        ));
    }
}

/// Formats the elapsed-time line shown after a run.
pub fn completion_message(tool: Tool, elapsed: Duration) -> String {
    let what = match tool {
        Tool::Retrieve => "Sequence Retrieval",
        Tool::Convert => "Conversion",
    };
    format!(
        "{} Complete. Time taken: {:.2} seconds",
        what,
        elapsed.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = AnnotationTable::new();
        table.insert("S1", AnnotationRecord::new(7, 10, "blaZ"));
        table.insert("S2", AnnotationRecord::new(1, 3, "tetA"));
        table.insert("S1", AnnotationRecord::new(2, 5, "ampC"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.record_count(), 3);
        let s1 = table.get("S1").unwrap();
        assert_eq!(s1[0].resistance, "blaZ");
        assert_eq!(s1[1].resistance, "ampC");
        assert!(table.get("s1").is_none());
    }

    #[test]
    fn test_sequence_length_counts_chars() {
        let record = SequenceRecord::new("seq1", "ACGT");
        assert_eq!(record.len(), 4);
        assert!(!record.is_empty());
        assert!(SequenceRecord::new("empty", "").is_empty());
    }

    #[test]
    fn test_lookup_gap_message() {
        let gap = LookupGap { id: "contig_7".to_string() };
        assert_eq!(
            gap.to_string(),
            "No start and end values found for contig_7. Skipping."
        );
    }

    #[test]
    fn test_editing_fields() {
        let mut state = AppState::new(OutputLocation::BesideInput, RowPolicy::default());
        for c in "a.fa".chars() {
            state.input_char(c);
        }
        state.toggle_focus();
        for c in "b.xlsx".chars() {
            state.input_char(c);
        }
        state.backspace();

        assert_eq!(state.field(Field::Primary), "a.fa");
        assert_eq!(state.field(Field::Secondary), "b.xls");

        // Each tool keeps its own fields
        state.switch_tool();
        assert_eq!(state.field(Field::Primary), "");
        assert_eq!(state.focus, Field::Primary);
    }

    #[test]
    fn test_start_job_requires_inputs() {
        let mut state = AppState::new(OutputLocation::BesideInput, RowPolicy::default());
        assert!(state.start_job().is_none());
        assert!(state.last_failed);
        assert!(!state.is_running());

        state.retrieve_fields = ["in.fasta".to_string(), "coords.xlsx".to_string()];
        let job = state.start_job().unwrap();
        assert!(state.is_running());
        assert_eq!(
            job,
            Job::Retrieve {
                fasta: PathBuf::from("in.fasta"),
                table: PathBuf::from("coords.xlsx"),
                destination: OutputLocation::BesideInput,
                policy: RowPolicy::default(),
            }
        );

        // No second job while one is running, and no editing
        assert!(state.start_job().is_none());
        state.input_char('x');
        assert_eq!(state.field(Field::Primary), "in.fasta");
    }

    #[test]
    fn test_convert_job_optional_output() {
        let mut state = AppState::new(OutputLocation::BesideInput, RowPolicy::default());
        state.switch_tool();
        state.convert_fields[0] = "amr.xlsx".to_string();
        let job = state.start_job().unwrap();
        assert_eq!(
            job,
            Job::Convert {
                source: PathBuf::from("amr.xlsx"),
                destination: None,
            }
        );
    }

    #[test]
    fn test_finish_job() {
        let mut state = AppState::new(OutputLocation::BesideInput, RowPolicy::default());
        state.retrieve_fields = ["in.fasta".to_string(), "coords.xlsx".to_string()];
        state.start_job().unwrap();
        state.finish_job(
            JobOutcome {
                message: "done".to_string(),
                warnings: vec!["gap".to_string()],
                failed: false,
            },
            Duration::from_millis(1234),
        );
        assert!(!state.is_running());
        assert_eq!(state.warnings, vec!["gap".to_string()]);
        assert_eq!(
            state.status_message.as_deref(),
            Some("done\nSequence Retrieval Complete. Time taken: 1.23 seconds")
        );
    }
}
