#![forbid(unsafe_code)]
//! Interton example-corpus harness
//!
//! Runs every example under an Interton checkout through `intertonc --run`, skipping files whose optional
//! runtimes (Python, Node, C/C++, C#, Java) are not installed, and records one log per example plus a run
//! summary. The runtime vocabulary lives in the `interton_runtimes` crate.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a harness bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod harness;
pub mod version;

pub use harness::{HarnessConfig, HarnessError, RunSummary, Session};
