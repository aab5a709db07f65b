//! # amrseq - AMR sequence retrieval
//!
//! Cuts antimicrobial-resistance regions out of FASTA sequences using
//! coordinates from a spreadsheet, and turns such spreadsheets back into
//! FASTA.
//!
//! ## Architecture
//!
//! The pipeline is a straight batch transform over in-memory data:
//! - `annotation`: coordinate table -> `AnnotationTable`
//! - `extract`: FASTA records x annotations -> extraction rows
//! - `writer`: extraction rows -> `{suffix}_AMR.xlsx`
//! - `convert`: spreadsheet -> FASTA, with unique identifiers
//! - `fasta`, `table`: file formats
//! - `model`: shared data structures and the interactive app state
//!
//! The interactive front end (`event`, `ui`, `controller`) and the
//! command-line helpers (`cli`) only call into the pipeline; pipeline
//! functions take plain paths and data and return results.

pub mod annotation;
pub mod cli;
pub mod controller;
pub mod convert;
pub mod event;
pub mod extract;
pub mod fasta;
pub mod model;
pub mod table;
pub mod ui;
pub mod writer;
