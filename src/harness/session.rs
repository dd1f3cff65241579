//! One harness invocation, from resolution to the accumulated summary.
//!
//! [`Session::prepare`] does everything that may abort the run (config validation, corpus lookup, compiler
//! resolution). Once a session exists, [`Session::run`] never fails: per-file problems become recorded outcomes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, mpsc};
use std::thread;

use chrono::{Local, NaiveDateTime};

use super::config::HarnessConfig;
use super::driver::ExampleExecutor;
use super::errors::{HarnessError, HarnessResult};
use super::example::{Decision, ExampleFile, ExecutionResult};
use super::log_writer::LogWriter;
use super::report::ExampleReporter;
use super::resolver::{RuntimeConfig, RuntimeResolver};
use super::scanner;
use super::summary::RunSummary;
use super::walker::CorpusWalker;

/// A classified file, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExample {
    pub file: ExampleFile,
    pub decision: Decision,
}

/// Resolved inputs of one run.
#[derive(Debug, Clone)]
pub struct Session {
    config: HarnessConfig,
    compiler: PathBuf,
    runtimes: RuntimeConfig,
    walker: CorpusWalker,
}

impl Session {
    /// Validate `config`, locate the corpus and the compiler, and resolve runtimes.
    ///
    /// ## Errors
    ///
    /// Returns an error (and nothing is executed) if:
    /// - the configuration is invalid
    /// - the examples directory does not exist
    /// - the compiler cannot be found
    pub fn prepare(config: HarnessConfig, resolver: RuntimeResolver) -> HarnessResult<Self> {
        config.validate()?;

        let corpus_root = config.corpus_root();
        if !corpus_root.is_dir() {
            return Err(HarnessError::CorpusNotFound(corpus_root));
        }

        let compiler = resolver
            .resolve_compiler_path(config.project_root(), config.compiler_override.as_deref())
            .ok_or_else(|| HarnessError::CompilerNotFound {
                root: config.project_root().to_path_buf(),
            })?;
        tracing::info!(compiler = %compiler.display(), "resolved compiler");

        let runtimes = resolver.resolve_all();
        let walker = CorpusWalker::new(&corpus_root, &config.module_dirs);

        Ok(Self {
            config,
            compiler,
            runtimes,
            walker,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    pub fn runtimes(&self) -> &RuntimeConfig {
        &self.runtimes
    }

    pub fn walker(&self) -> &CorpusWalker {
        &self.walker
    }

    /// Log writer matching the configured layout.
    pub fn log_writer(&self) -> LogWriter {
        match &self.config.log_dir {
            Some(log_root) => LogWriter::mirrored(self.walker.root(), log_root),
            None => LogWriter::beside_sources(),
        }
    }

    /// Snapshot and classify the whole corpus before anything runs.
    pub fn plan(&self) -> Vec<PlannedExample> {
        plan_corpus(&self.walker, &self.runtimes)
    }

    /// Execute every admitted example and accumulate the outcomes.
    pub fn run(
        &self,
        executor: &dyn ExampleExecutor,
        logs: &LogWriter,
        reporter: &mut dyn ExampleReporter,
    ) -> RunSummary {
        reporter.on_prepared(&self.compiler, &self.runtimes);
        let plan = self.plan();
        tracing::info!(files = plan.len(), jobs = self.config.jobs, "corpus planned");

        if self.config.jobs <= 1 {
            run_sequential(&plan, &self.compiler, executor, logs, reporter)
        } else {
            run_pool(&plan, &self.compiler, self.config.jobs, executor, logs, reporter)
        }
    }
}

/// Enumerate and classify every file under `walker`, in enumeration order.
pub fn plan_corpus(walker: &CorpusWalker, runtimes: &RuntimeConfig) -> Vec<PlannedExample> {
    walker
        .enumerate()
        .map(|file| {
            let decision = scanner::classify(&file, runtimes);
            PlannedExample { file, decision }
        })
        .collect()
}

fn run_sequential(
    plan: &[PlannedExample],
    compiler: &Path,
    executor: &dyn ExampleExecutor,
    logs: &LogWriter,
    reporter: &mut dyn ExampleReporter,
) -> RunSummary {
    let mut summary = RunSummary::new(compiler);

    for entry in plan {
        if entry.decision.is_skip() {
            reporter.on_skip(&entry.file, entry.decision);
            summary.accumulate(&entry.file.path, entry.decision, None);
            continue;
        }

        reporter.on_run_start(&entry.file, &executor.invocation(&entry.file.path));
        let (result, log) = execute_and_log(&entry.file, executor, logs);
        reporter.on_run_complete(&entry.file, &result, log.as_deref());
        summary.accumulate(&entry.file.path, entry.decision, Some(&result));
    }

    summary
}

/// Bounded worker pool. Logs are written under one lock; outcomes are accumulated in enumeration order once
/// every worker is done, so the failed list never depends on completion order.
fn run_pool(
    plan: &[PlannedExample],
    compiler: &Path,
    jobs: usize,
    executor: &dyn ExampleExecutor,
    logs: &LogWriter,
    reporter: &mut dyn ExampleReporter,
) -> RunSummary {
    for entry in plan.iter().filter(|e| e.decision.is_skip()) {
        reporter.on_skip(&entry.file, entry.decision);
    }

    let admitted: Vec<usize> = (0..plan.len()).filter(|&i| plan[i].decision.is_run()).collect();
    let mut results: Vec<Option<ExecutionResult>> = vec![None; plan.len()];
    let next = AtomicUsize::new(0);
    let log_lock = Mutex::new(());

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, ExecutionResult, Option<PathBuf>)>();

        for _ in 0..jobs.min(admitted.len()) {
            let tx = tx.clone();
            let (admitted, next, log_lock) = (&admitted, &next, &log_lock);
            scope.spawn(move || {
                while let Some(&index) = admitted.get(next.fetch_add(1, Ordering::Relaxed)) {
                    let file = &plan[index].file;
                    let started_at = Local::now().naive_local();
                    let result = executor.execute(&file.path);
                    let log = {
                        let _guard = log_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                        write_log(file, executor, logs, &result, started_at)
                    };
                    if tx.send((index, result, log)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for (index, result, log) in rx {
            reporter.on_run_complete(&plan[index].file, &result, log.as_deref());
            results[index] = Some(result);
        }
    });

    let mut summary = RunSummary::new(compiler);
    for (entry, result) in plan.iter().zip(&results) {
        summary.accumulate(&entry.file.path, entry.decision, result.as_ref());
    }
    summary
}

fn execute_and_log(
    file: &ExampleFile,
    executor: &dyn ExampleExecutor,
    logs: &LogWriter,
) -> (ExecutionResult, Option<PathBuf>) {
    let started_at = Local::now().naive_local();
    let result = executor.execute(&file.path);
    let log = write_log(file, executor, logs, &result, started_at);
    (result, log)
}

/// A log that cannot be written is reported and dropped; the outcome still counts.
///
/// `started_at` is when the compiler was launched; it stamps both the log name and its "Started at" line.
fn write_log(
    file: &ExampleFile,
    executor: &dyn ExampleExecutor,
    logs: &LogWriter,
    result: &ExecutionResult,
    started_at: NaiveDateTime,
) -> Option<PathBuf> {
    let invocation = executor.invocation(&file.path);
    match logs.write(file, &invocation, result, started_at) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::warn!(file = %file.path.display(), error = %err, "failed to write run log");
            None
        }
    }
}
