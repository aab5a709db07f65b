//! amrseq - interactive front end for the AMR sequence tools.
//!
//! ## Usage
//!
//! ```bash
//! amrseq
//! amrseq --fasta isolate_S7.fasta --table coords.xlsx --output-dir ~/Downloads
//! ```
//!
//! ## Keys
//!
//! - `Tab`: next field
//! - `Enter`: run the selected tool
//! - `F2`: switch between retrieval and FASTA conversion
//! - `Esc`: quit
//!
//! Logs go to `amrseq-<random>.log` in the system temp directory, since
//! the terminal is taken by the interface.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::{Env, Target};

use amrseq::annotation::RowPolicy;
use amrseq::controller::run_app;
use amrseq::extract::OutputLocation;
use amrseq::model::AppState;
use amrseq::ui::glyphs;

/// amrseq - retrieve AMR sequences and convert tables to FASTA
///
/// Opens an interactive form. The command-line programs `amr_retrieval`
/// and `table_to_fasta` do the same without an interface.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Preset input FASTA file
    #[arg(long)]
    fasta: Option<PathBuf>,

    /// Preset start/end table
    #[arg(long)]
    table: Option<PathBuf>,

    /// Directory for retrieval output (default: next to the input FASTA)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Fail on annotation rows with missing fields instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Use Unicode symbols in the interface
    #[arg(long)]
    fancy: bool,
}

/// Sends log output to a fresh file in the temp directory.
fn init_file_logging() -> Option<PathBuf> {
    let name = format!("amrseq-{:08x}.log", rand::random::<u32>());
    let path = std::env::temp_dir().join(name);
    let file = File::create(&path).ok()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Some(path)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = init_file_logging();

    let output = args
        .output_dir
        .map(OutputLocation::Directory)
        .unwrap_or_default();
    let policy = if args.strict {
        RowPolicy::Strict
    } else {
        RowPolicy::SkipIncomplete
    };

    let mut state = AppState::new(output, policy);
    if let Some(fasta) = args.fasta {
        state.retrieve_fields[0] = fasta.display().to_string();
    }
    if let Some(table) = args.table {
        state.retrieve_fields[1] = table.display().to_string();
    }

    run_app(state, glyphs::select(args.fancy))?;

    if let Some(path) = log_path {
        eprintln!("Log written to {}", path.display());
    }
    Ok(())
}
