//! Harness configuration.
//!
//! Every CLI flag collapses into one [`HarnessConfig`]. Defaults reproduce the layout of an Interton checkout:
//! examples under `<root>/examples`, summaries under `<root>/test_results`, logs beside the sources.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::errors::{HarnessError, HarnessResult};

/// Module directory skipped by default, relative to the examples root.
pub const DEFAULT_MODULE_DIR: &str = "basic/modules";

/// Directory name of the examples tree inside the project root.
pub const DEFAULT_EXAMPLES_DIR: &str = "examples";

/// Directory name of the summary output inside the project root.
pub const DEFAULT_RESULTS_DIR: &str = "test_results";

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Project root; build-output candidates for the compiler are relative to it
    pub project_root: PathBuf,
    /// Examples tree (default: `<project_root>/examples`)
    pub examples_dir: Option<PathBuf>,
    /// Explicit compiler location, tried before any probing
    pub compiler_override: Option<PathBuf>,
    /// Where the run summary goes (default: `<project_root>/test_results`)
    pub results_dir: Option<PathBuf>,
    /// Separate root for per-file logs; `None` writes logs beside each source
    pub log_dir: Option<PathBuf>,
    /// Module directories, relative to the examples tree
    pub module_dirs: Vec<PathBuf>,
    /// Per-example deadline; `None` waits for the compiler to exit
    pub timeout: Option<Duration>,
    /// Number of examples executed at once
    pub jobs: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            examples_dir: None,
            compiler_override: None,
            results_dir: None,
            log_dir: None,
            module_dirs: vec![PathBuf::from(DEFAULT_MODULE_DIR)],
            timeout: None,
            jobs: 1,
        }
    }
}

impl HarnessConfig {
    /// Create a config for the given project root with default settings
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    pub fn with_examples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.examples_dir = Some(dir.into());
        self
    }

    pub fn with_compiler(mut self, path: impl Into<PathBuf>) -> Self {
        self.compiler_override = Some(path.into());
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Replace the module directory list (relative to the examples tree)
    pub fn with_module_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.module_dirs = dirs;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// The examples tree this run walks.
    pub fn corpus_root(&self) -> PathBuf {
        self.examples_dir
            .clone()
            .unwrap_or_else(|| self.project_root.join(DEFAULT_EXAMPLES_DIR))
    }

    /// The directory that receives the run summary.
    pub fn results_root(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| self.project_root.join(DEFAULT_RESULTS_DIR))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Reject settings the run cannot honor.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.jobs == 0 {
            return Err(HarnessError::InvalidConfig("--jobs must be at least 1".to_string()));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(HarnessError::InvalidConfig("--timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}
