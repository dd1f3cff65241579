//! Shared fixtures: scratch projects with a fake `intertonc` and a recording reporter.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use interton_examples::harness::{Decision, ExampleFile, ExampleReporter, ExecutionResult, RunSummary};
use tempfile::TempDir;

/// A scratch Interton checkout: `<root>/examples` plus a compiler under `<root>/bin`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("examples")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn examples(&self) -> PathBuf {
        self.root().join("examples")
    }

    pub fn results(&self) -> PathBuf {
        self.root().join("test_results")
    }

    /// Write a corpus file relative to the examples directory.
    pub fn example(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.examples().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Install a `/bin/sh` script as the compiler and return its path.
    #[cfg(unix)]
    pub fn compiler(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join("bin").join("intertonc");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Every file in `dir` (non-recursive), sorted by name.
    pub fn files_in(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Generated logs next to the examples (recursive).
    pub fn logs_beside_sources(&self) -> Vec<PathBuf> {
        let mut logs = Vec::new();
        let mut stack = vec![self.examples()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|e| e == "txt") {
                    logs.push(path);
                }
            }
        }
        logs.sort();
        logs
    }
}

/// Reporter that keeps every event for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub skipped: Vec<(PathBuf, Decision)>,
    pub completed: Vec<(PathBuf, ExecutionResult, Option<PathBuf>)>,
    pub summary: Option<RunSummary>,
    pub report: Option<PathBuf>,
}

impl RecordingReporter {
    pub fn counts(&self) -> (usize, usize, usize) {
        let summary = self.summary.as_ref().expect("summary was reported");
        (summary.passed, summary.failed, summary.skipped)
    }
}

impl ExampleReporter for RecordingReporter {
    fn on_skip(&mut self, file: &ExampleFile, decision: Decision) {
        self.skipped.push((file.path.clone(), decision));
    }

    fn on_run_complete(&mut self, file: &ExampleFile, result: &ExecutionResult, log: Option<&Path>) {
        self.completed
            .push((file.path.clone(), result.clone(), log.map(Path::to_path_buf)));
    }

    fn on_summary(&mut self, summary: &RunSummary, report: Option<&Path>) {
        self.summary = Some(summary.clone());
        self.report = report.map(Path::to_path_buf);
    }
}
