//! Application controller.
//!
//! This module orchestrates the interactive front end:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - Running jobs on a worker thread and collecting their outcome
//!
//! The UI thread never blocks on a job: the worker sends its
//! [`JobOutcome`] over a channel, which is polled once per tick.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::convert::{convert, default_output_path};
use crate::event::{apply_action, handle_event, poll_event};
use crate::extract::retrieve;
use crate::model::{AppState, Job, JobOutcome};
use crate::ui::glyphs::Glyphs;
use crate::ui::render;

impl Job {
    /// Runs the job to completion on the calling thread.
    pub fn run(self) -> JobOutcome {
        match self {
            Job::Retrieve {
                fasta,
                table,
                destination,
                policy,
            } => match retrieve(&fasta, &table, &destination, policy) {
                Ok(report) => {
                    let mut warnings: Vec<String> = report.notice.into_iter().collect();
                    warnings.extend(report.gaps.iter().map(ToString::to_string));
                    JobOutcome {
                        message: format!(
                            "Output file '{}' has been generated successfully ({} rows).",
                            report.output.display(),
                            report.rows
                        ),
                        warnings,
                        failed: false,
                    }
                }
                Err(e) => failure(e),
            },
            Job::Convert {
                source,
                destination,
            } => {
                let destination = destination.unwrap_or_else(|| default_output_path(&source));
                match convert(&source, &destination) {
                    Ok(path) => JobOutcome {
                        message: format!("FASTA file '{}' generated successfully.", path.display()),
                        warnings: Vec::new(),
                        failed: false,
                    },
                    Err(e) => failure(e),
                }
            }
        }
    }
}

fn failure(e: impl std::fmt::Display) -> JobOutcome {
    error!("{}", e);
    JobOutcome {
        message: format!("Error: {}", e),
        warnings: Vec::new(),
        failed: true,
    }
}

/// Starts a job on a worker thread; the outcome arrives on the returned channel.
pub fn spawn_job(job: Job) -> Receiver<JobOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        info!("Starting {:?}", job);
        // The receiver may be gone if the user quit meanwhile
        let _ = tx.send(job.run());
    });
    rx
}

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Glyph set for rendering
    glyphs: Glyphs,
    /// Outcome channel of the running job
    pending: Option<Receiver<JobOutcome>>,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState, glyphs: Glyphs) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            glyphs,
            pending: None,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|frame| {
                render(frame, &self.state, &self.glyphs);
            })?;

            self.collect_outcome();

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event);
                if let Some(job) = apply_action(&mut self.state, action) {
                    self.pending = Some(spawn_job(job));
                }

                if self.state.should_quit {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Picks up the outcome of the running job, if it has finished.
    fn collect_outcome(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => JobOutcome {
                message: "Error: the job stopped unexpectedly.".to_string(),
                warnings: Vec::new(),
                failed: true,
            },
        };

        let elapsed = self
            .state
            .running_since
            .map(|start| start.elapsed())
            .unwrap_or_default();
        self.state.finish_job(outcome, elapsed);
        self.pending = None;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Convenience function to run the interactive front end.
pub fn run_app(state: AppState, glyphs: Glyphs) -> Result<()> {
    let mut app = App::new(state, glyphs)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RowPolicy;
    use crate::extract::OutputLocation;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_convert_job_on_worker() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("amr.csv");
        std::fs::write(
            &source,
            "Input Sequence Identifier,Sequence from Start and End\nA,CG\nA,TT\n",
        )
        .unwrap();

        let rx = spawn_job(Job::Convert {
            source: source.clone(),
            destination: None,
        });
        let outcome = rx.recv().unwrap();
        assert!(!outcome.failed, "{}", outcome.message);

        let written = std::fs::read_to_string(dir.path().join("amr.fasta")).unwrap();
        assert_eq!(written, ">A\nCG\n>A_1\nTT\n");
    }

    #[test]
    fn test_retrieve_job_reports_gaps() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("isolate_K1.fasta");
        std::fs::write(&fasta, ">S1\nACGTACGTAC\n>S2\nAAAA\n").unwrap();
        let table = dir.path().join("coords.csv");
        std::fs::write(&table, "n,id,start,end,,,,,,,,,res\n1,S1,2,5,,,,,,,,,ampC\n").unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let outcome = Job::Retrieve {
            fasta,
            table,
            destination: OutputLocation::Directory(out_dir.clone()),
            policy: RowPolicy::default(),
        }
        .run();

        assert!(!outcome.failed, "{}", outcome.message);
        assert_eq!(
            outcome.warnings,
            vec!["No start and end values found for S2. Skipping.".to_string()]
        );
        assert!(out_dir.join("K1_AMR.xlsx").exists());
    }

    #[test]
    fn test_retrieve_job_warns_about_tsv_fallback() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("isolate_K1.fasta");
        std::fs::write(&fasta, format!(">S1\n{}\n", "ACGT".repeat(9_000))).unwrap();
        let table = dir.path().join("coords.csv");
        std::fs::write(&table, "n,id,start,end,,,,,,,,,res\n1,S1,2,5,,,,,,,,,ampC\n").unwrap();

        let outcome = Job::Retrieve {
            fasta,
            table,
            destination: OutputLocation::BesideInput,
            policy: RowPolicy::default(),
        }
        .run();

        assert!(!outcome.failed, "{}", outcome.message);
        assert!(outcome.message.contains("K1_AMR.tsv"), "{}", outcome.message);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("32767"));
    }

    #[test]
    fn test_failed_job() {
        let outcome = Job::Convert {
            source: PathBuf::from("/nonexistent/table.xlsx"),
            destination: None,
        }
        .run();
        assert!(outcome.failed);
        assert!(outcome.message.starts_with("Error: "));
    }
}
