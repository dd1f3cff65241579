//! CLI module for the example harness
//!
//! ## Commands
//!
//! - `run` - Run every example through `intertonc --run` (also the default when no subcommand is given)
//! - `plan` - Print the run/skip decision for every file without executing anything
//! - `runtimes` - Print the resolved optional runtimes
//!
//! ## Modules
//!
//! - `example_runner` - Command implementations on top of [`crate::harness`]
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod example_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::harness::config::DEFAULT_MODULE_DIR;
use crate::harness::{HarnessConfig, HarnessError};
use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// The harness itself could not run (compiler or corpus missing)
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The harness ran and at least one example failed
    pub const EXAMPLES_FAILED: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        CliError::failure(format!("Error: {err}"))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run the Interton example corpus through intertonc
#[derive(Parser, Debug)]
#[command(name = "interton-examples")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Run the Interton example corpus through intertonc", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for the default `run` action
    #[command(flatten)]
    pub run: RunArgs,

    /// Verbose output (also raises the default log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every example and write logs plus a summary
    Run(RunArgs),

    /// Print the decision for every file without running anything
    Plan(CorpusArgs),

    /// Print the resolved optional runtimes
    Runtimes,
}

/// Where the corpus and the compiler live.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Project root; compiler build outputs are searched relative to it
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Examples directory (default: <root>/examples)
    #[arg(long, value_name = "DIR")]
    pub examples: Option<PathBuf>,

    /// Module directory to skip, relative to the examples directory (repeatable)
    #[arg(long = "skip-dir", value_name = "DIR", default_value = DEFAULT_MODULE_DIR)]
    pub skip_dirs: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Path to the intertonc binary
    #[arg(long, value_name = "PATH", env = "INTERTONC_PATH")]
    pub compiler: Option<PathBuf>,

    /// Summary directory (default: <root>/test_results)
    #[arg(long = "results-dir", value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Write per-example logs under DIR instead of beside each source
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Kill an example after SECS seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of examples executed at once
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,
}

impl CorpusArgs {
    /// Discovery-only config (no compiler, results or timeout settings).
    pub fn to_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new(&self.root).with_module_dirs(self.skip_dirs.clone());
        if let Some(examples) = &self.examples {
            config = config.with_examples_dir(examples);
        }
        config
    }
}

impl RunArgs {
    pub fn to_config(&self) -> HarnessConfig {
        let mut config = self.corpus.to_config().with_jobs(self.jobs);
        if let Some(compiler) = &self.compiler {
            config = config.with_compiler(compiler);
        }
        if let Some(dir) = &self.results_dir {
            config = config.with_results_dir(dir);
        }
        if let Some(dir) = &self.log_dir {
            config = config.with_log_dir(dir);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run(cli: Cli) {
    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Run(args)) => example_runner::run_examples(args.to_config(), cli.verbose),
        Some(Command::Plan(args)) => example_runner::plan_examples(&args.to_config(), cli.verbose),
        Some(Command::Runtimes) => example_runner::list_runtimes(),
        None => example_runner::run_examples(cli.run.to_config(), cli.verbose),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default_action() {
        let cli = Cli::try_parse_from(["interton-examples", "--jobs", "4", "--root", "/work"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.jobs, 4);
        assert_eq!(cli.run.corpus.root, PathBuf::from("/work"));
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from([
            "interton-examples",
            "run",
            "--compiler",
            "/opt/intertonc",
            "--timeout",
            "30",
            "--log-dir",
            "logs",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        if let Some(Command::Run(args)) = cli.command {
            let config = args.to_config();
            assert_eq!(config.compiler_override, Some(PathBuf::from("/opt/intertonc")));
            assert_eq!(config.timeout, Some(Duration::from_secs(30)));
            assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
            assert_eq!(config.jobs, 1);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_skip_dir_default_and_override() {
        let cli = Cli::try_parse_from(["interton-examples", "plan"]).unwrap();
        if let Some(Command::Plan(args)) = cli.command {
            assert_eq!(args.skip_dirs, vec![PathBuf::from("basic/modules")]);
        } else {
            panic!("Expected Plan command");
        }

        let cli =
            Cli::try_parse_from(["interton-examples", "plan", "--skip-dir", "a", "--skip-dir", "b/c"]).unwrap();
        if let Some(Command::Plan(args)) = cli.command {
            assert_eq!(args.skip_dirs, vec![PathBuf::from("a"), PathBuf::from("b/c")]);
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_runtimes() {
        let cli = Cli::try_parse_from(["interton-examples", "runtimes"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Runtimes)));
    }

    #[test]
    fn test_cli_rejects_non_numeric_jobs() {
        assert!(Cli::try_parse_from(["interton-examples", "run", "--jobs", "many"]).is_err());
    }

    #[test]
    fn test_zero_jobs_is_rejected_by_config() {
        let cli = Cli::try_parse_from(["interton-examples", "run", "--jobs", "0"]).unwrap();
        let Some(Command::Run(args)) = cli.command else {
            panic!("Expected Run command");
        };
        assert!(matches!(args.to_config().validate(), Err(HarnessError::InvalidConfig(_))));
    }

    #[test]
    fn test_harness_error_maps_to_failure() {
        let err: CliError = HarnessError::CorpusNotFound(PathBuf::from("/nope")).into();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("/nope"));
    }
}
