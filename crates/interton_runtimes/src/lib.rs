//! Provide the canonical vocabulary the Interton example harness works with.
//!
//! This crate is intentionally small and dependency-free. It names the optional foreign-language runtimes an
//! example can embed, the marker tokens that flag them, the configuration variables the compiler reads them
//! from, and the command-line contract of the compiler binary itself.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, no process spawning.
//! - Probing the host for executables lives in the harness; this crate only lists what to look for.

pub mod compiler;
pub mod runtimes;

pub use runtimes::{RUNTIMES, RuntimeInfo, RuntimeKind};
