//! Corpus discovery.
//!
//! The walker yields every non-directory entry under the examples root in a stable order and applies the static path
//! rules: module directories first, then the source-extension rule. Logs the harness wrote on earlier runs are
//! dropped from the sequence entirely so they are neither run nor counted.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use interton_runtimes::compiler::{KNOWN_NON_SOURCE_EXTENSIONS, SOURCE_EXTENSION};
use regex::Regex;
use walkdir::WalkDir;

use super::example::{Decision, ExampleFile};

/// `<stem>_YYYY-MM-DD_HH-MM-SS[_N][_ERROR].txt`, as written by the log writer.
#[allow(clippy::expect_used)]
static GENERATED_LOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*_\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}(?:_\d+)?(?:_ERROR)?\.txt$")
        .expect("INVARIANT: generated-log pattern is a valid regex")
});

/// Check whether a file name looks like a log written by this harness.
pub fn is_generated_log(file_name: &OsStr) -> bool {
    file_name
        .to_str()
        .is_some_and(|name| GENERATED_LOG_PATTERN.is_match(name))
}

/// Make `path` absolute and drop `.`/`..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Recursive enumerator over one examples tree.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
    module_dirs: BTreeSet<PathBuf>,
}

impl CorpusWalker {
    /// Create a walker; `module_dirs` are relative to `root` (absolute entries are taken as-is).
    pub fn new(root: impl AsRef<Path>, module_dirs: &[PathBuf]) -> Self {
        let root = normalize_path(root.as_ref());
        let module_dirs = module_dirs.iter().map(|dir| normalize_path(&root.join(dir))).collect();
        Self { root, module_dirs }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module_dirs(&self) -> impl Iterator<Item = &Path> {
        self.module_dirs.iter().map(PathBuf::as_path)
    }

    /// Exact match on the normalized directory; nested subdirectories are not covered.
    pub fn is_module_dir(&self, dir: &Path) -> bool {
        self.module_dirs.contains(dir)
    }

    /// Lazily enumerate the corpus, sorted by file name within each directory.
    ///
    /// Unreadable directory entries are logged and skipped; they never end the walk.
    pub fn enumerate(&self) -> impl Iterator<Item = ExampleFile> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable corpus entry");
                    None
                }
            })
            // Links are not followed: a link to a directory is dropped, any other link (broken or not) is a file.
            .filter(|entry| !entry.file_type().is_dir() && !entry.path().is_dir())
            .filter(|entry| {
                let generated = is_generated_log(entry.file_name());
                if generated {
                    tracing::trace!(path = %entry.path().display(), "ignoring generated log");
                }
                !generated
            })
            .map(|entry| self.classify(entry.into_path()))
    }

    /// Apply the static path rules to one file.
    pub fn classify(&self, path: PathBuf) -> ExampleFile {
        if path.parent().is_some_and(|dir| self.is_module_dir(dir)) {
            return ExampleFile::new(path, Some(Decision::SkipModuleDir));
        }

        let mut file = ExampleFile::new(path, None);
        let ext = file.extension.as_deref();
        if ext == Some(SOURCE_EXTENSION) {
            return file;
        }
        if ext.is_some_and(|e| KNOWN_NON_SOURCE_EXTENSIONS.contains(&e)) {
            tracing::debug!(path = %file.path.display(), "non-source companion file");
        } else {
            tracing::debug!(path = %file.path.display(), "unrecognized extension");
        }
        file.exclusion = Some(Decision::SkipExtension);
        file
    }
}
