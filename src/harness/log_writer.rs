//! Per-example run logs.
//!
//! One log per executed (or launch-failed) example, named `<stem>_<YYYY-MM-DD>_<HH-MM-SS>[_N][_ERROR].txt`.
//! Logs go beside the source by default, which is why the walker drops files matching that name pattern, or
//! into a separate tree that mirrors the corpus layout.
//!
//! Files are created with create-new semantics. When two logs for the same stem land in the same directory
//! within one second, the later one gets a `_1`, `_2`, ... disambiguator instead of overwriting the first.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::errors::{HarnessError, HarnessResult};
use super::example::{ExampleFile, ExecutionResult};

const RULE: &str = "==================================================";

/// Upper bound on disambiguation attempts before giving up on a name.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

#[derive(Debug, Clone)]
enum LogLayout {
    BesideSource,
    Mirrored { corpus_root: PathBuf, log_root: PathBuf },
}

/// Persists run logs.
#[derive(Debug, Clone)]
pub struct LogWriter {
    layout: LogLayout,
}

impl LogWriter {
    /// Write each log into its example's directory.
    pub fn beside_sources() -> Self {
        Self {
            layout: LogLayout::BesideSource,
        }
    }

    /// Write logs under `log_root`, mirroring each example's path relative to `corpus_root`.
    pub fn mirrored(corpus_root: impl Into<PathBuf>, log_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: LogLayout::Mirrored {
                corpus_root: corpus_root.into(),
                log_root: log_root.into(),
            },
        }
    }

    /// Directory the log for `source` will be written to.
    pub fn target_dir(&self, source: &Path) -> PathBuf {
        let beside = || source.parent().map(Path::to_path_buf).unwrap_or_default();
        match &self.layout {
            LogLayout::BesideSource => beside(),
            LogLayout::Mirrored { corpus_root, log_root } => match source.strip_prefix(corpus_root) {
                Ok(rel) => rel.parent().map_or_else(|| log_root.clone(), |p| log_root.join(p)),
                Err(_) => beside(),
            },
        }
    }

    /// Persist the log for one execution and return its path.
    pub fn write(
        &self,
        file: &ExampleFile,
        invocation: &str,
        result: &ExecutionResult,
        timestamp: NaiveDateTime,
    ) -> HarnessResult<PathBuf> {
        let dir = self.target_dir(&file.path);
        fs::create_dir_all(&dir).map_err(|e| HarnessError::io(&dir, e))?;

        let stem = file.stem();
        let contents = render_log(invocation, result, timestamp);
        let path = create_unique(
            &dir,
            |attempt| log_file_name(&stem, timestamp, attempt, result.launch_failed),
            &contents,
        )
        .map_err(|e| HarnessError::io(&dir, e))?;

        tracing::debug!(log = %path.display(), "wrote run log");
        Ok(path)
    }
}

/// Build a log file name; `attempt` > 0 adds the disambiguator.
pub fn log_file_name(stem: &str, timestamp: NaiveDateTime, attempt: u32, launch_failed: bool) -> String {
    let mut name = format!("{}_{}", stem, timestamp.format("%Y-%m-%d_%H-%M-%S"));
    if attempt > 0 {
        let _ = write!(name, "_{attempt}");
    }
    if launch_failed {
        name.push_str("_ERROR");
    }
    name.push_str(".txt");
    name
}

/// Render the log body.
pub fn render_log(invocation: &str, result: &ExecutionResult, timestamp: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Command:\n{invocation}\n");
    let _ = writeln!(out, "Started at: {}\n", timestamp.format("%Y-%m-%d %H:%M:%S%.6f"));
    let _ = writeln!(out, "{RULE}\nPROGRAM OUTPUT:\n{RULE}");

    if result.launch_failed {
        out.push_str("LAUNCH FAILED: the compiler could not be started\n");
    }
    if !result.stdout.is_empty() {
        let _ = writeln!(out, "STDOUT:\n{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        let _ = writeln!(out, "STDERR:\n{}", result.stderr);
    }
    if result.timed_out {
        let _ = writeln!(out, "\nTimed out after {:.1}s", result.duration.as_secs_f64());
    }
    match result.exit_code {
        Some(0) => {}
        Some(code) => {
            let _ = writeln!(out, "\nReturn code: {code}");
        }
        None if result.wait_failed => {
            out.push_str("\nReturn code: unknown (waiting for the compiler failed)\n");
        }
        None if !result.launch_failed && !result.timed_out => {
            out.push_str("\nReturn code: none (terminated by signal)\n");
        }
        None => {}
    }
    out
}

/// Create a new file in `dir`, trying `name(0)`, `name(1)`, ... until one does not exist yet.
pub(crate) fn create_unique(dir: &Path, name: impl Fn(u32) -> String, contents: &str) -> io::Result<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(name(attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut handle) => {
                handle.write_all(contents.as_bytes())?;
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name after {MAX_NAME_ATTEMPTS} attempts"),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::walker::is_generated_log;
    use chrono::NaiveDate;
    use std::ffi::OsStr;
    use std::time::Duration;
    use tempfile::TempDir;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .unwrap()
            .and_hms_micro_opt(9, 5, 7, 250)
            .unwrap()
    }

    #[test]
    fn test_log_file_name_shapes() {
        assert_eq!(log_file_name("hello", ts(), 0, false), "hello_2026-10-15_09-05-07.txt");
        assert_eq!(log_file_name("hello", ts(), 0, true), "hello_2026-10-15_09-05-07_ERROR.txt");
        assert_eq!(log_file_name("hello", ts(), 2, true), "hello_2026-10-15_09-05-07_2_ERROR.txt");
    }

    #[test]
    fn test_log_names_are_recognized_by_walker() {
        for attempt in [0, 1, 17] {
            for failed in [false, true] {
                let name = log_file_name("my example", ts(), attempt, failed);
                assert!(is_generated_log(OsStr::new(&name)), "{name} not recognized");
            }
        }
    }

    #[test]
    fn test_render_success() {
        let result = ExecutionResult {
            exit_code: Some(0),
            stdout: "hello\n".to_string(),
            ..ExecutionResult::default()
        };
        insta::assert_snapshot!(render_log("intertonc --run hello.it", &result, ts()), @r"
        Command:
        intertonc --run hello.it

        Started at: 2026-10-15 09:05:07.000250

        ==================================================
        PROGRAM OUTPUT:
        ==================================================
        STDOUT:
        hello
        ");
    }

    #[test]
    fn test_render_failure_has_stderr_and_return_code() {
        let result = ExecutionResult {
            exit_code: Some(1),
            stderr: "parse error".to_string(),
            ..ExecutionResult::default()
        };
        let log = render_log("intertonc --run bad.it", &result, ts());
        assert!(log.contains("STDERR:\nparse error\n"));
        assert!(log.ends_with("Return code: 1\n"));
        assert!(!log.contains("STDOUT:"));
    }

    #[test]
    fn test_render_launch_failure() {
        let result = ExecutionResult::launch_failure("No such file or directory (os error 2)");
        let log = render_log("/gone/intertonc --run a.it", &result, ts());
        assert!(log.contains("LAUNCH FAILED"));
        assert!(log.contains("STDERR:\nNo such file or directory (os error 2)\n"));
        assert!(!log.contains("Return code"));
    }

    #[test]
    fn test_render_timeout() {
        let result = ExecutionResult {
            exit_code: None,
            timed_out: true,
            duration: Duration::from_millis(1500),
            ..ExecutionResult::default()
        };
        let log = render_log("intertonc --run slow.it", &result, ts());
        assert!(log.contains("Timed out after 1.5s"));
        assert!(!log.contains("Return code"));
    }

    #[test]
    fn test_render_wait_failure_is_not_a_signal() {
        let result = ExecutionResult {
            exit_code: None,
            stderr: "failed waiting for compiler: Interrupted system call".to_string(),
            wait_failed: true,
            ..ExecutionResult::default()
        };
        let log = render_log("intertonc --run lost.it", &result, ts());
        assert!(log.ends_with("Return code: unknown (waiting for the compiler failed)\n"));
        assert!(!log.contains("terminated by signal"));
    }

    #[test]
    fn test_render_signal_death() {
        let result = ExecutionResult::default();
        let log = render_log("intertonc --run crash.it", &result, ts());
        assert!(log.ends_with("Return code: none (terminated by signal)\n"));
    }

    #[test]
    fn test_write_beside_source_disambiguates() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("hello.it");
        fs::write(&source, "").unwrap();
        let file = ExampleFile::new(source, None);
        let result = ExecutionResult {
            exit_code: Some(0),
            ..ExecutionResult::default()
        };
        let writer = LogWriter::beside_sources();

        let first = writer.write(&file, "cmd", &result, ts()).unwrap();
        let second = writer.write(&file, "cmd", &result, ts()).unwrap();

        assert_eq!(first, tmp.path().join("hello_2026-10-15_09-05-07.txt"));
        assert_eq!(second, tmp.path().join("hello_2026-10-15_09-05-07_1.txt"));
        assert!(fs::read_to_string(first).unwrap().starts_with("Command:\ncmd\n"));
    }

    #[test]
    fn test_write_mirrored_tree() {
        let corpus = TempDir::new().unwrap();
        let logs = TempDir::new().unwrap();
        let source = corpus.path().join("ffi").join("js_call.it");
        let file = ExampleFile::new(source, None);
        let writer = LogWriter::mirrored(corpus.path(), logs.path());

        let path = writer
            .write(&file, "cmd", &ExecutionResult::launch_failure("boom"), ts())
            .unwrap();

        assert_eq!(path, logs.path().join("ffi").join("js_call_2026-10-15_09-05-07_ERROR.txt"));
        assert!(!corpus.path().join("ffi").exists());
    }

    #[test]
    fn test_mirrored_outside_corpus_falls_back_to_source_dir() {
        let writer = LogWriter::mirrored("/corpus", "/logs");
        assert_eq!(writer.target_dir(Path::new("/elsewhere/a.it")), PathBuf::from("/elsewhere"));
        assert_eq!(writer.target_dir(Path::new("/corpus/a.it")), PathBuf::from("/logs"));
        assert_eq!(writer.target_dir(Path::new("/corpus/x/y/a.it")), PathBuf::from("/logs/x/y"));
    }
}
