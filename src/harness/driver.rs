//! Compiler invocation.
//!
//! The driver is the I/O boundary between the harness and `intertonc`. Whatever happens to the child process,
//! the caller gets an [`ExecutionResult`] back; nothing here returns an error or panics past this module.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use interton_runtimes::compiler::RUN_DIRECTIVE;

use super::example::ExecutionResult;
use super::resolver::RuntimeConfig;

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long output is still collected after the compiler has exited or been killed.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

const READ_CHUNK: usize = 8192;

/// Execute one example and capture what it produced.
///
/// Implementations must be infallible from the caller's point of view: launch errors become
/// [`ExecutionResult::launch_failure`]. `Sync` so a worker pool can share one executor.
pub trait ExampleExecutor: Sync {
    /// Human-readable command line used for `file`, recorded in its log.
    fn invocation(&self, file: &Path) -> String;

    /// Run `file` to completion.
    fn execute(&self, file: &Path) -> ExecutionResult;
}

/// Runs `<compiler> --run <file>` without a shell.
#[derive(Debug, Clone)]
pub struct CompilerDriver {
    compiler: PathBuf,
    runtime_env: Vec<(&'static str, PathBuf)>,
    timeout: Option<Duration>,
}

impl CompilerDriver {
    /// Driver for `compiler`, exporting the resolved runtimes to every child.
    pub fn new(compiler: impl Into<PathBuf>, runtimes: &RuntimeConfig) -> Self {
        Self {
            compiler: compiler.into(),
            runtime_env: runtimes.env_vars().map(|(var, path)| (var, path.to_path_buf())).collect(),
            timeout: None,
        }
    }

    /// Kill children that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    fn command(&self, file: &Path) -> Command {
        let mut command = Command::new(&self.compiler);
        command
            .arg(RUN_DIRECTIVE)
            .arg(file)
            .stdin(Stdio::null())
            .envs(self.runtime_env.iter().map(|(var, path)| (*var, path.as_os_str())));
        command
    }
}

impl ExampleExecutor for CompilerDriver {
    fn invocation(&self, file: &Path) -> String {
        format!("{} {} {}", self.compiler.display(), RUN_DIRECTIVE, file.display())
    }

    fn execute(&self, file: &Path) -> ExecutionResult {
        let result = match self.timeout {
            None => run_to_completion(self.command(file)),
            Some(timeout) => run_with_deadline(self.command(file), timeout),
        };
        if result.launch_failed {
            tracing::warn!(compiler = %self.compiler.display(), file = %file.display(), error = %result.stderr, "failed to launch compiler");
        }
        if result.wait_failed {
            tracing::warn!(compiler = %self.compiler.display(), file = %file.display(), "lost track of compiler process");
        }
        result
    }
}

fn run_to_completion(mut command: Command) -> ExecutionResult {
    let started = Instant::now();
    match command.output() {
        Ok(output) => ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: started.elapsed(),
            ..ExecutionResult::default()
        },
        Err(err) => ExecutionResult::launch_failure(err),
    }
}

/// Run with a deadline. The compiler may leave its own children behind (`--run` executes the built program as
/// one), and those keep the output pipes open after the compiler is gone. Output is therefore collected only
/// until [`DRAIN_GRACE`] after the compiler exits; readers still blocked after that are abandoned.
fn run_with_deadline(mut command: Command, timeout: Duration) -> ExecutionResult {
    let started = Instant::now();
    let mut child = match command.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(err) => return ExecutionResult::launch_failure(err),
    };

    // Drain both pipes while polling so a chatty child cannot block on a full pipe.
    let (tx, rx) = mpsc::channel();
    spawn_reader(child.stdout.take(), Pipe::Stdout, tx.clone());
    spawn_reader(child.stderr.take(), Pipe::Stderr, tx);

    let mut output = Captured::default();
    let waited = wait_with_deadline(&mut child, started.checked_add(timeout), &rx, &mut output);
    let duration = started.elapsed();
    if !output.collect_until(&rx, Instant::now() + DRAIN_GRACE) {
        tracing::debug!("output pipes still open after compiler exit; remaining output dropped");
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    match waited {
        Ok((exit_code, timed_out)) => ExecutionResult {
            exit_code,
            stdout,
            stderr,
            timed_out,
            duration,
            ..ExecutionResult::default()
        },
        Err(err) => {
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                stderr.push('\n');
            }
            stderr.push_str(&format!("failed waiting for compiler: {err}"));
            ExecutionResult {
                exit_code: None,
                stdout,
                stderr,
                wait_failed: true,
                duration,
                ..ExecutionResult::default()
            }
        }
    }
}

/// Wait for `child`, killing it at `deadline` (`None` when the timeout is too large to represent).
/// Returns `(exit_code, timed_out)`; output arriving meanwhile is collected into `output`.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Instant>,
    rx: &Receiver<(Pipe, Vec<u8>)>,
    output: &mut Captured,
) -> io::Result<(Option<i32>, bool)> {
    loop {
        let status = match child.try_wait() {
            Ok(status) => status,
            Err(err) => {
                let _ = child.kill();
                return Err(err);
            }
        };
        if let Some(status) = status {
            return Ok((status.code(), false));
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            let _ = child.kill();
            let status = child.wait()?;
            return Ok((status.code(), true));
        }
        // Both pipes closed early: nothing left to collect, fall back to sleeping.
        if output.collect_until(rx, Instant::now() + POLL_INTERVAL) {
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

#[derive(Debug, Default)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Captured {
    /// Take chunks until `deadline`. Returns `true` once every reader has finished.
    fn collect_until(&mut self, rx: &Receiver<(Pipe, Vec<u8>)>, deadline: Instant) -> bool {
        loop {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok((Pipe::Stdout, chunk)) => self.stdout.extend_from_slice(&chunk),
                Ok((Pipe::Stderr, chunk)) => self.stderr.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return true,
            }
        }
    }
}

/// Forward everything read from `pipe` as chunks until EOF. The thread is detached; it ends when the last
/// writer closes the pipe, even if nobody is listening any more.
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>, which: Pipe, tx: Sender<(Pipe, Vec<u8>)>) {
    let Some(mut pipe) = pipe else {
        return;
    };
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send((which, buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
}
