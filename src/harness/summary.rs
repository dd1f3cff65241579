//! Run summary accumulation and the aggregate report.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::errors::{HarnessError, HarnessResult};
use super::example::{Decision, ExecutionResult};
use super::log_writer::create_unique;

/// Bucket a file's outcome was counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

/// Counters and failed files for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Failed examples in encounter order
    pub failed_files: Vec<PathBuf>,
    pub compiler: PathBuf,
    written: Option<PathBuf>,
}

impl RunSummary {
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            passed: 0,
            failed: 0,
            skipped: 0,
            failed_files: Vec::new(),
            compiler: compiler.into(),
            written: None,
        }
    }

    /// Count one file. `result` is only consulted for [`Decision::Run`].
    pub fn accumulate(&mut self, path: &Path, decision: Decision, result: Option<&ExecutionResult>) -> Outcome {
        if decision.is_skip() {
            self.skipped += 1;
            return Outcome::Skipped;
        }
        match result {
            Some(result) if result.succeeded() => {
                self.passed += 1;
                Outcome::Passed
            }
            _ => {
                self.failed += 1;
                self.failed_files.push(path.to_path_buf());
                Outcome::Failed
            }
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// True when nothing that ran failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Path of the report, once written.
    pub fn report_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    /// Write the report into `results_dir`, named by the run's start time.
    ///
    /// The report is written once; later calls return the first path.
    pub fn finalize(&mut self, results_dir: &Path, started_at: NaiveDateTime) -> HarnessResult<PathBuf> {
        if let Some(path) = &self.written {
            return Ok(path.clone());
        }

        fs::create_dir_all(results_dir).map_err(|e| HarnessError::io(results_dir, e))?;
        let contents = self.render(started_at);
        let stamp = started_at.format("%Y%m%d_%H%M%S").to_string();
        let path = create_unique(
            results_dir,
            |attempt| match attempt {
                0 => format!("test_examples_summary_{stamp}.md"),
                n => format!("test_examples_summary_{stamp}_{n}.md"),
            },
            &contents,
        )
        .map_err(|e| HarnessError::io(results_dir, e))?;

        tracing::info!(summary = %path.display(), "wrote run summary");
        self.written = Some(path.clone());
        Ok(path)
    }

    /// Render the Markdown report.
    pub fn render(&self, started_at: NaiveDateTime) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Example run summary - {}\n", started_at.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "- intertonc: `{}`", self.compiler.display());
        let _ = writeln!(out, "- Passed: {}", self.passed);
        let _ = writeln!(out, "- Failed: {}", self.failed);
        let _ = writeln!(out, "- Skipped: {}", self.skipped);
        if !self.failed_files.is_empty() {
            out.push_str("\n## Failed files\n");
            for path in &self.failed_files {
                let _ = writeln!(out, "- `{}`", path.display());
            }
        }
        out
    }
}
