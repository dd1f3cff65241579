//! Progress reporting.
//!
//! ## ExampleReporter Trait
//!
//! The session reports through the `ExampleReporter` trait so that execution stays separate from
//! presentation. The console reporter below is the default; tests plug in recording reporters.

use std::path::Path;
use std::time::Instant;

use super::example::{Decision, ExampleFile, ExecutionResult};
use super::resolver::RuntimeConfig;
use super::summary::RunSummary;

/// Receives harness events in the order they happen.
pub trait ExampleReporter {
    /// Called once the compiler and runtimes are resolved
    fn on_prepared(&mut self, _compiler: &Path, _runtimes: &RuntimeConfig) {}

    /// Called when a file is counted as skipped
    fn on_skip(&mut self, file: &ExampleFile, decision: Decision);

    /// Called right before the compiler is invoked (sequential runs only)
    fn on_run_start(&mut self, _file: &ExampleFile, _invocation: &str) {}

    /// Called when an invocation finished and its log was written
    fn on_run_complete(&mut self, file: &ExampleFile, result: &ExecutionResult, log: Option<&Path>);

    /// Called once the run is over; `report` is `None` when the summary file could not be written
    fn on_summary(&mut self, summary: &RunSummary, report: Option<&Path>);
}

/// Default console reporter
pub struct ConsoleReporter {
    pub verbose: bool,
    started: Instant,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            started: Instant::now(),
        }
    }
}

impl ExampleReporter for ConsoleReporter {
    fn on_prepared(&mut self, compiler: &Path, runtimes: &RuntimeConfig) {
        println!("Using intertonc: {}", compiler.display());
        if self.verbose {
            for (kind, loc) in runtimes.iter() {
                println!("  {} = {}", kind.env_var(), loc.path.display());
            }
        }
    }

    fn on_skip(&mut self, file: &ExampleFile, decision: Decision) {
        // Companion files are noise unless asked for.
        if decision == Decision::SkipExtension && !self.verbose {
            return;
        }
        println!("\x1b[33mSKIP\x1b[0m {} ({})", file.path.display(), decision);
    }

    fn on_run_start(&mut self, _file: &ExampleFile, invocation: &str) {
        if self.verbose {
            println!("Running: {}", invocation);
        }
    }

    fn on_run_complete(&mut self, file: &ExampleFile, result: &ExecutionResult, log: Option<&Path>) {
        let status = if result.succeeded() {
            "\x1b[32mPASS\x1b[0m"
        } else if result.launch_failed {
            "\x1b[31mERROR\x1b[0m"
        } else if result.timed_out {
            "\x1b[31mTIMEOUT\x1b[0m"
        } else {
            "\x1b[31mFAIL\x1b[0m"
        };

        if self.verbose {
            println!(
                "{} {} ({:.0}ms)",
                status,
                file.path.display(),
                result.duration.as_millis()
            );
        } else {
            println!("{} {}", status, file.path.display());
        }
        if let Some(log) = log {
            println!("     log: {}", log.display());
        }
    }

    fn on_summary(&mut self, summary: &RunSummary, report: Option<&Path>) {
        println!();
        let mut parts = vec![format!("\x1b[32m{} passed\x1b[0m", summary.passed)];
        if summary.failed > 0 {
            parts.push(format!("\x1b[31m{} failed\x1b[0m", summary.failed));
        }
        parts.push(format!("\x1b[33m{} skipped\x1b[0m", summary.skipped));
        println!(
            "====== {} in {:.2}s ======",
            parts.join(", "),
            self.started.elapsed().as_secs_f64()
        );

        if !summary.failed_files.is_empty() {
            println!("Failed files:");
            for path in &summary.failed_files {
                println!("  - {}", path.display());
            }
        }
        match report {
            Some(report) => println!("Summary saved: {}", report.display()),
            None => println!("\x1b[33mSummary not written\x1b[0m"),
        }
    }
}
