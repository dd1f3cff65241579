//! Per-file data model: the example being considered, the decision taken for it, and what running it produced.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use interton_runtimes::RuntimeKind;

/// Terminal decision for one file in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the file to the compiler
    Run,
    /// Not an Interton source file
    SkipExtension,
    /// Lives in a module directory (imported by other examples, no entry point)
    SkipModuleDir,
    /// Needs a runtime that is not available on this host; the first missing one is recorded
    SkipMissingRuntime(RuntimeKind),
}

impl Decision {
    pub fn is_run(self) -> bool {
        matches!(self, Decision::Run)
    }

    pub fn is_skip(self) -> bool {
        !self.is_run()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Run => write!(f, "run"),
            Decision::SkipExtension => write!(f, "not a source file"),
            Decision::SkipModuleDir => write!(f, "module directory"),
            Decision::SkipMissingRuntime(kind) => write!(f, "missing {} ({})", kind, kind.env_var()),
        }
    }
}

/// A file discovered in the corpus.
///
/// `exclusion` is set when a static path rule already decided the file; content is only read for files that
/// survive those rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleFile {
    pub path: PathBuf,
    /// Lower-cased extension without the dot
    pub extension: Option<String>,
    pub exclusion: Option<Decision>,
}

impl ExampleFile {
    pub fn new(path: PathBuf, exclusion: Option<Decision>) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        Self {
            path,
            extension,
            exclusion,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension, used as the log file prefix.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "example".to_string())
    }

    /// Read the file as text, replacing invalid UTF-8 sequences.
    ///
    /// Only used for marker scanning; the compiler always receives the path, never this text.
    pub fn read_lossy(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// What one compiler invocation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code; `None` when no exit status was observed (never started, killed by a signal, lost)
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The process could not be started at all
    pub launch_failed: bool,
    /// The process was killed after exceeding the configured timeout
    pub timed_out: bool,
    /// The process started but waiting for it failed, so its exit status is unknown
    pub wait_failed: bool,
    pub duration: Duration,
}

impl ExecutionResult {
    /// Synthetic result for a process that never started.
    pub fn launch_failure(error: impl fmt::Display) -> Self {
        Self {
            stderr: error.to_string(),
            launch_failed: true,
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        !self.launch_failed && !self.timed_out && !self.wait_failed && self.exit_code == Some(0)
    }
}
