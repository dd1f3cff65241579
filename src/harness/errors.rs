//! Errors raised by harness components.
//!
//! Only [`HarnessError::CompilerNotFound`] and [`HarnessError::CorpusNotFound`] are fatal for a run. Everything
//! the driver or scanner hits per file is folded into a recorded outcome instead of surfacing here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("intertonc not found; set INTERTONC_PATH or build the compiler under {root}")]
    CompilerNotFound { root: PathBuf },

    #[error("examples directory not found: {0}")]
    CorpusNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
