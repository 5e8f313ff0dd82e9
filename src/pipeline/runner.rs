//! Pipeline Runner
//!
//! Drives scanner → invoker → writer over every discovered file, one file at
//! a time, pausing for a fixed delay after each file whatever its outcome.
//!
//! Phases: Idle → Scanning → (ProcessingFile → Delaying)* → Done.
//! There is no failed state for a run: a file whose generation fails is
//! logged and skipped, and only a scan or write failure stops the run.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::job::PipelineJob;
use super::paths::derive_output_path;
use super::scanner::{FileScanner, ScanError};
use super::writer::{OutputWriter, WriteError};
use crate::ai::invoker::TransformInvoker;

/// Pause after each file, for the remote service's request-rate expectations
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Errors that halt a whole run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Scanning,
    ProcessingFile,
    Delaying,
    Done,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files the scan matched
    pub discovered: usize,

    /// Output paths, in the order they were written
    pub written: Vec<PathBuf>,

    pub failed_invocations: usize,
    pub unreadable: usize,

    /// Files whose output path could not be derived
    pub unmappable: usize,
}

impl RunSummary {
    pub fn skipped(&self) -> usize {
        self.failed_invocations + self.unreadable + self.unmappable
    }
}

/// Sequential scan-and-transform driver
pub struct PipelineRunner<I: TransformInvoker> {
    invoker: I,
    writer: OutputWriter,
    delay: Duration,
    phase: RunPhase,
}

impl<I: TransformInvoker> PipelineRunner<I> {
    pub fn new(invoker: I) -> Self {
        Self {
            invoker,
            writer: OutputWriter::new(),
            delay: DEFAULT_DELAY,
            phase: RunPhase::Idle,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!(from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
    }

    /// Run `job` once over its whole input tree
    pub async fn run(&mut self, job: &PipelineJob) -> Result<RunSummary, PipelineError> {
        self.enter(RunPhase::Scanning);

        let outcome = FileScanner::new(job.predicate.clone()).scan(&job.input_root)?;
        let output_root = job.output_root(&outcome.root);
        let total = outcome.files.len();

        info!(
            job = job.name,
            root = %outcome.root.display(),
            files = total,
            "Discovered {} matching files",
            total
        );

        let mut summary = RunSummary {
            discovered: total,
            ..Default::default()
        };

        for (index, source) in outcome.files.iter().enumerate() {
            self.enter(RunPhase::ProcessingFile);
            info!("[{}/{}] Processing: {}", index + 1, total, source.display());

            self.process_file(job, &outcome.root, &output_root, source, &mut summary)
                .await?;

            self.enter(RunPhase::Delaying);
            tokio::time::sleep(self.delay).await;
        }

        self.enter(RunPhase::Done);

        info!(
            job = job.name,
            written = summary.written.len(),
            skipped = summary.skipped(),
            "Run complete"
        );

        Ok(summary)
    }

    async fn process_file(
        &self,
        job: &PipelineJob,
        input_root: &Path,
        output_root: &Path,
        source: &Path,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let output = match derive_output_path(source, input_root, output_root, &job.rule) {
            Ok(path) => path,
            Err(e) => {
                warn!(file = %source.display(), "Skipping: {}", e);
                summary.unmappable += 1;
                return Ok(());
            }
        };

        let content = match tokio::fs::read_to_string(source).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %source.display(), "Skipping unreadable file: {}", e);
                summary.unreadable += 1;
                return Ok(());
            }
        };

        let artifact = match self.invoker.invoke(&job.template, &content).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(
                    file = %source.display(),
                    template = job.template.name,
                    "Generation failed, skipping: {}",
                    e
                );
                summary.failed_invocations += 1;
                return Ok(());
            }
        };

        if let Some(label) = job.echo_label {
            let file_name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("\n=== {} for {} ===", label, file_name);
            println!("{}", artifact);
        }

        let cleaned = job.post_process.apply(&artifact);
        self.writer.write(&output, &cleaned).await?;

        info!("Generated: {}", output.display());
        summary.written.push(output);

        Ok(())
    }
}
