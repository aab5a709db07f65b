//! Retrieve AMR subsequences from a FASTA file.
//!
//! ## Usage
//!
//! ```bash
//! amr_retrieval <input_fasta> <start_end_xlsx>
//! amr_retrieval sequences.fasta start_end_data.xlsx --output-dir results/
//! ```
//!
//! Writes `{suffix}_AMR.xlsx`, where the suffix comes from the FASTA file
//! name (`isolate-42_[S7].fasta` gives `S7_AMR.xlsx`).

#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use amrseq::annotation::RowPolicy;
use amrseq::cli::{init_logging, parse_args, require_file};
use amrseq::extract::{retrieve, OutputLocation};
use amrseq::model::{completion_message, Tool};

/// Extract annotated regions from FASTA sequences into an Excel sheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA file with the sequences to cut
    input_fasta: PathBuf,

    /// Table with identifier (column 2), start (3), end (4) and resistance (13)
    start_end_table: PathBuf,

    /// Directory for the output file (default: next to the input FASTA)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Fail on rows with missing fields instead of skipping them
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args: Args = parse_args();
    init_logging();

    require_file(&args.input_fasta, "Input FASTA file");
    require_file(&args.start_end_table, "Excel file");

    let location = args
        .output_dir
        .map(OutputLocation::Directory)
        .unwrap_or_default();
    let policy = if args.strict {
        RowPolicy::Strict
    } else {
        RowPolicy::SkipIncomplete
    };

    let start = Instant::now();
    match retrieve(&args.input_fasta, &args.start_end_table, &location, policy) {
        Ok(report) => {
            if let Some(notice) = &report.notice {
                println!("Warning: {}", notice);
            }
            println!(
                "Output file '{}' has been generated successfully.",
                report.output.display()
            );
            if !report.gaps.is_empty() {
                println!(
                    "{} of {} sequences had no start and end values.",
                    report.gaps.len(),
                    report.records
                );
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }
    println!("{}", completion_message(Tool::Retrieve, start.elapsed()));

    Ok(())
}
