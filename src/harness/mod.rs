//! Example-corpus harness.
//!
//! Runs every Interton example through `intertonc --run`, records one log per executed example and one
//! Markdown summary per run.
//!
//! ## Pipeline
//!
//! 1. **Resolve** ([`resolver`]): locate the compiler (fatal if missing) and the optional runtimes.
//! 2. **Walk** ([`walker`]): enumerate the examples tree, applying path rules and dropping generated logs.
//! 3. **Scan** ([`scanner`]): read runtime markers and skip files whose runtimes are unavailable.
//! 4. **Execute** ([`driver`]): invoke the compiler per admitted file.
//! 5. **Record** ([`log_writer`], [`summary`]): persist the log, then count the outcome.
//!
//! [`session::Session`] strings these together; [`report::ExampleReporter`] receives progress.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod driver;
pub mod errors;
pub mod example;
pub mod log_writer;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod summary;
pub mod walker;

pub use config::HarnessConfig;
pub use driver::{CompilerDriver, ExampleExecutor};
pub use errors::{HarnessError, HarnessResult};
pub use example::{Decision, ExampleFile, ExecutionResult};
pub use log_writer::LogWriter;
pub use report::{ConsoleReporter, ExampleReporter};
pub use resolver::{RuntimeConfig, RuntimeResolver, SearchPath};
pub use session::{PlannedExample, Session, plan_corpus};
pub use summary::{Outcome, RunSummary};
pub use walker::CorpusWalker;
