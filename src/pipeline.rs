//! Staged bounded-concurrency pipeline orchestration.
//!
//! The pipeline runs three stages over bounded crossbeam channels:
//!
//! ```text
//! paths -> [Read] -> SourceUnit -> [Transform] -> Vec<TestStub> -> [Emit]
//! ```
//!
//! Each stage is a pool of worker threads sized by the configured degree of
//! parallelism. The queues between stages are bounded at the same degree,
//! so a slow downstream stage backpressures upstream workers instead of
//! letting items pile up in memory. Completion propagates by sender drop:
//! when intake finishes enqueueing it drops its sender, each stage's
//! workers exit once their input is drained and disconnected, and their own
//! senders drop in turn. [`generate`] returns only after the Emit stage has
//! drained.
//!
//! Failure isolation: a read failure degrades to absent text, a parse
//! failure to an empty stub list, a write failure to a logged error — none
//! of them aborts the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::Serialize;
use tracing::error;

use crate::extract::extract;
use crate::stub::{synthesize, TestStub};
use crate::writer::write_stub;

/// Degree of parallelism used when the configured value is zero.
pub const DEFAULT_PARALLELISM: usize = 10;

/// Validated pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    output_dir: PathBuf,
    parallelism: usize,
}

impl PipelineConfig {
    /// Create a configuration. A `parallelism` of zero is replaced by
    /// [`DEFAULT_PARALLELISM`]. The output directory must exist before the
    /// pipeline runs; creating it is the caller's job.
    pub fn new(output_dir: impl Into<PathBuf>, parallelism: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            parallelism: if parallelism == 0 {
                DEFAULT_PARALLELISM
            } else {
                parallelism
            },
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

/// A source file and its contents. `text` is `None` when the read failed;
/// downstream stages degrade to producing no stubs for the unit.
#[derive(Debug)]
struct SourceUnit {
    path: PathBuf,
    text: Option<String>,
}

/// Tallies for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Input paths accepted by intake.
    pub files: usize,
    /// Files whose contents could not be read.
    pub read_failures: usize,
    /// Files whose contents could not be parsed.
    pub parse_failures: usize,
    /// Stub files successfully written.
    pub stubs_written: usize,
    /// Stub files that failed to write.
    pub write_failures: usize,
}

/// Run the pipeline over `paths` to completion.
///
/// Returns once every stage has drained, with per-worker tallies merged
/// into a [`RunSummary`]. Output ordering across files is unspecified;
/// every successfully parsed class produces its stub exactly once.
pub fn generate(paths: Vec<PathBuf>, config: &PipelineConfig) -> RunSummary {
    let parallelism = config.parallelism;

    let (path_tx, path_rx) = bounded::<PathBuf>(parallelism);
    let (unit_tx, unit_rx) = bounded::<SourceUnit>(parallelism);
    let (stubs_tx, stubs_rx) = bounded::<Vec<TestStub>>(parallelism);

    let mut summary = RunSummary {
        files: paths.len(),
        ..Default::default()
    };

    thread::scope(|scope| {
        let read_workers: Vec<_> = (0..parallelism)
            .map(|_| {
                let rx = path_rx.clone();
                let tx = unit_tx.clone();
                scope.spawn(move || read_worker(rx, tx))
            })
            .collect();

        let transform_workers: Vec<_> = (0..parallelism)
            .map(|_| {
                let rx = unit_rx.clone();
                let tx = stubs_tx.clone();
                scope.spawn(move || transform_worker(rx, tx))
            })
            .collect();

        let output_dir = config.output_dir();
        let emit_workers: Vec<_> = (0..parallelism)
            .map(|_| {
                let rx = stubs_rx.clone();
                scope.spawn(move || emit_worker(rx, output_dir))
            })
            .collect();

        // The parent keeps no receivers or inter-stage senders; workers
        // hold the only clones, so their exit disconnects the next stage.
        drop(path_rx);
        drop(unit_tx);
        drop(unit_rx);
        drop(stubs_tx);
        drop(stubs_rx);

        // Intake: enqueue everything, then signal "no more input" by
        // dropping the sender.
        for path in paths {
            if path_tx.send(path).is_err() {
                break;
            }
        }
        drop(path_tx);

        for handle in read_workers {
            summary.read_failures += handle.join().unwrap_or(0);
        }
        for handle in transform_workers {
            summary.parse_failures += handle.join().unwrap_or(0);
        }
        for handle in emit_workers {
            let (written, failed) = handle.join().unwrap_or((0, 0));
            summary.stubs_written += written;
            summary.write_failures += failed;
        }
    });

    summary
}

/// Read stage: `path -> text-or-absent`. A read failure yields absent text
/// rather than an error. Returns this worker's read-failure tally.
fn read_worker(rx: Receiver<PathBuf>, tx: Sender<SourceUnit>) -> usize {
    let mut failures = 0;
    for path in rx {
        let text = fs::read_to_string(&path).ok();
        if text.is_none() {
            failures += 1;
        }
        if tx.send(SourceUnit { path, text }).is_err() {
            break;
        }
    }
    failures
}

/// Transform stage: extraction and synthesis composed as two pure
/// functions. Absent text and parse failures both yield an empty stub
/// list. Returns this worker's parse-failure tally.
fn transform_worker(rx: Receiver<SourceUnit>, tx: Sender<Vec<TestStub>>) -> usize {
    let mut parse_failures = 0;
    for unit in rx {
        let stubs = match unit.text {
            None => Vec::new(),
            Some(text) => {
                let model = extract(&unit.path, &text);
                if model.parse_error.is_some() {
                    parse_failures += 1;
                }
                model
                    .namespaces
                    .iter()
                    .flat_map(|ns| ns.classes.iter().map(|class| synthesize(&ns.name, class)))
                    .collect()
            }
        };
        if tx.send(stubs).is_err() {
            break;
        }
    }
    parse_failures
}

/// Emit stage: renders and writes every stub in the list. Writes block
/// until the bytes are on disk, so the run is only reported complete once
/// all artifacts are flushed. Returns `(written, failed)` tallies.
fn emit_worker(rx: Receiver<Vec<TestStub>>, output_dir: &Path) -> (usize, usize) {
    let mut written = 0;
    let mut failed = 0;
    for stubs in rx {
        for stub in stubs {
            match write_stub(output_dir, &stub) {
                Ok(_) => written += 1,
                Err(e) => {
                    error!("{e}");
                    failed += 1;
                }
            }
        }
    }
    (written, failed)
}
