//! Example runner commands.
//!
//! Thin layer between the CLI and [`crate::harness`]: builds the session, picks the reporter, persists the
//! summary and maps the outcome to an exit code.

use chrono::Local;
use interton_runtimes::RuntimeKind;

use super::{CliResult, ExitCode};
use crate::harness::resolver::RuntimeSource;
use crate::harness::{
    CompilerDriver, ConsoleReporter, CorpusWalker, Decision, ExampleReporter, HarnessConfig, HarnessError,
    RunSummary, RuntimeResolver, Session, plan_corpus,
};

/// Run the corpus with the process environment and the console reporter.
pub fn run_examples(config: HarnessConfig, verbose: bool) -> CliResult<ExitCode> {
    let mut reporter = ConsoleReporter::new(verbose);
    run_examples_with(config, RuntimeResolver::from_env(), &mut reporter)
}

/// Run the corpus with an explicit resolver and reporter.
///
/// Returns [`ExitCode::SUCCESS`] or [`ExitCode::EXAMPLES_FAILED`]; problems that stop the run before any
/// example executes (compiler or corpus missing) come back as errors with [`ExitCode::FAILURE`]. A summary
/// that cannot be written is only warned about: the exit code still reflects the examples.
pub fn run_examples_with(
    config: HarnessConfig,
    resolver: RuntimeResolver,
    reporter: &mut dyn ExampleReporter,
) -> CliResult<ExitCode> {
    let started_at = Local::now().naive_local();
    let session = Session::prepare(config, resolver)?;

    let driver = CompilerDriver::new(session.compiler(), session.runtimes()).with_timeout(session.config().timeout);
    let mut summary = session.run(&driver, &session.log_writer(), reporter);

    let results_root = session.config().results_root();
    let report = match summary.finalize(&results_root, started_at) {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::warn!(results = %results_root.display(), error = %err, "failed to write summary");
            eprintln!("Warning: {err}");
            None
        }
    };
    reporter.on_summary(&summary, report.as_deref());

    Ok(exit_code_for(&summary))
}

/// Map a finished run to the process exit code.
pub fn exit_code_for(summary: &RunSummary) -> ExitCode {
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::EXAMPLES_FAILED
    }
}

/// Print what a run would do, without touching the compiler or the filesystem.
pub fn plan_examples(config: &HarnessConfig, verbose: bool) -> CliResult<ExitCode> {
    config.validate()?;
    let corpus_root = config.corpus_root();
    if !corpus_root.is_dir() {
        return Err(HarnessError::CorpusNotFound(corpus_root).into());
    }

    let runtimes = RuntimeResolver::from_env().resolve_all();
    let walker = CorpusWalker::new(&corpus_root, &config.module_dirs);
    let plan = plan_corpus(&walker, &runtimes);

    let mut to_run = 0;
    for entry in &plan {
        match entry.decision {
            Decision::Run => {
                to_run += 1;
                println!("RUN   {}", entry.file.path.display());
            }
            Decision::SkipExtension if !verbose => {}
            decision => println!("SKIP  {} ({})", entry.file.path.display(), decision),
        }
    }
    println!();
    println!("{} to run, {} skipped", to_run, plan.len() - to_run);
    Ok(ExitCode::SUCCESS)
}

/// Print every optional runtime with its variable and resolved location.
pub fn list_runtimes() -> CliResult<ExitCode> {
    let runtimes = RuntimeResolver::from_env().resolve_all();
    for kind in RuntimeKind::ALL {
        let location = match runtimes.get(kind) {
            Some(loc) => match loc.source {
                RuntimeSource::Preset => format!("{} (from {})", loc.path.display(), kind.env_var()),
                RuntimeSource::Probed => format!("{} (found on PATH)", loc.path.display()),
            },
            None => "missing".to_string(),
        };
        println!("{:<11} {:<16} {}", kind.as_str(), kind.env_var(), location);
    }
    Ok(ExitCode::SUCCESS)
}
