//! Shared plumbing for the command-line programs.

use std::path::Path;
use std::process;

use clap::Parser;
use env_logger::Env;

/// Exit code for usage errors and missing input files.
pub const EXIT_USAGE: i32 = 1;

/// Initialises logging to stderr; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Parses arguments, exiting with [`EXIT_USAGE`] on bad usage.
///
/// `--help` and `--version` still exit successfully.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    }
}

/// Exits with [`EXIT_USAGE`] unless `path` is an existing file.
pub fn require_file(path: &Path, what: &str) {
    if !path.is_file() {
        eprintln!("Error: {} '{}' does not exist.", what, path.display());
        process::exit(EXIT_USAGE);
    }
}
