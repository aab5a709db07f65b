//! Convert an Excel sheet of cut sequences into FASTA.
//!
//! ## Usage
//!
//! ```bash
//! table_to_fasta <input_excel> [output_fasta]
//! ```
//!
//! Without an output path, the FASTA file is written next to the input
//! with a `.fasta` extension.

#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use amrseq::cli::{init_logging, parse_args, require_file};
use amrseq::convert::{convert, default_output_path};

/// Convert the 'Input Sequence Identifier' and 'Sequence from Start and End'
/// columns of a table into FASTA
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Excel (or CSV/TSV) file to convert
    input_table: PathBuf,

    /// Output FASTA file (default: input name with .fasta extension)
    output_fasta: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: Args = parse_args();
    init_logging();

    require_file(&args.input_table, "The file");

    let output = args
        .output_fasta
        .unwrap_or_else(|| default_output_path(&args.input_table));
    match convert(&args.input_table, &output) {
        Ok(path) => println!("FASTA file '{}' generated successfully.", path.display()),
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}
