//! Compiler and optional-runtime resolution.
//!
//! Resolution runs once, before the corpus is walked. The compiler must be found or the run is over; runtimes
//! are best-effort and a missing one only turns the examples that need it into skips.
//!
//! ## Notes
//!
//! - Caller-provided runtime locations (the `INTERTON_*` variables) are never overridden, even when they point
//!   somewhere that does not exist. The compiler reads the same variables and owns their interpretation.
//! - The outcome is an immutable [`RuntimeConfig`]; nothing here writes to the process environment.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use interton_runtimes::RuntimeKind;
use interton_runtimes::compiler::{BUILD_OUTPUT_CANDIDATES, COMPILER_NAME, EXECUTABLE_SUFFIXES};

// ============================================================================
// Search path
// ============================================================================

/// Ordered list of directories searched for executables.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build from the `PATH` of the current process.
    pub fn from_env() -> Self {
        Self::from_os_path(env::var_os("PATH"))
    }

    /// Build from a raw `PATH`-style value.
    pub fn from_os_path(value: Option<OsString>) -> Self {
        let dirs = value.map(|v| env::split_paths(&v).collect()).unwrap_or_default();
        Self { dirs }
    }

    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find the first executable matching any of `names`, in preference order.
    ///
    /// For each name the exact spelling is looked for in every directory first; only then are the platform
    /// suffixes (`.exe`, `.cmd`, ...) tried, directory by directory.
    pub fn find(&self, names: &[&str]) -> Option<PathBuf> {
        names.iter().find_map(|name| self.find_one(name))
    }

    fn find_one(&self, name: &str) -> Option<PathBuf> {
        if let Some(found) = self.dirs.iter().map(|dir| dir.join(name)).find(|c| c.is_file()) {
            return Some(found);
        }
        for dir in &self.dirs {
            for suffix in EXECUTABLE_SUFFIXES {
                let candidate = dir.join(format!("{name}{suffix}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

// ============================================================================
// Resolved runtimes
// ============================================================================

/// Where a runtime location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeSource {
    /// Supplied by the caller through the runtime's configuration variable
    Preset,
    /// Found by probing the search path
    Probed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLocation {
    pub path: PathBuf,
    pub source: RuntimeSource,
}

/// Immutable view of which optional runtimes are available for this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    resolved: BTreeMap<RuntimeKind, RuntimeLocation>,
}

impl RuntimeConfig {
    /// Config with no runtimes available.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a caller-provided runtime location.
    pub fn with_runtime(mut self, kind: RuntimeKind, path: impl Into<PathBuf>) -> Self {
        self.resolved.insert(
            kind,
            RuntimeLocation {
                path: path.into(),
                source: RuntimeSource::Preset,
            },
        );
        self
    }

    pub fn is_available(&self, kind: RuntimeKind) -> bool {
        self.resolved.contains_key(&kind)
    }

    pub fn get(&self, kind: RuntimeKind) -> Option<&RuntimeLocation> {
        self.resolved.get(&kind)
    }

    pub fn path(&self, kind: RuntimeKind) -> Option<&Path> {
        self.resolved.get(&kind).map(|loc| loc.path.as_path())
    }

    /// Resolved runtimes in check order.
    pub fn iter(&self) -> impl Iterator<Item = (RuntimeKind, &RuntimeLocation)> {
        self.resolved.iter().map(|(kind, loc)| (*kind, loc))
    }

    /// `(variable, location)` pairs exported to the compiler process.
    pub fn env_vars(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        self.resolved.iter().map(|(kind, loc)| (kind.env_var(), loc.path.as_path()))
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolve the compiler binary and optional runtimes for one run.
#[derive(Debug, Clone)]
pub struct RuntimeResolver {
    search_path: SearchPath,
    presets: BTreeMap<RuntimeKind, PathBuf>,
    cache: BTreeMap<RuntimeKind, Option<RuntimeLocation>>,
}

impl RuntimeResolver {
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            presets: BTreeMap::new(),
            cache: BTreeMap::new(),
        }
    }

    /// Resolver over the process `PATH`, honoring any `INTERTON_*` variables already set.
    pub fn from_env() -> Self {
        let mut resolver = Self::new(SearchPath::from_env());
        for kind in RuntimeKind::ALL {
            match env::var_os(kind.env_var()) {
                Some(value) if !value.is_empty() => {
                    resolver.presets.insert(kind, PathBuf::from(value));
                }
                _ => {}
            }
        }
        resolver
    }

    /// Record a caller-provided location for `kind`; probing will not run for it.
    pub fn with_preset(mut self, kind: RuntimeKind, path: impl Into<PathBuf>) -> Self {
        self.presets.insert(kind, path.into());
        self
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Make sure `kind` is resolved, probing the search path at most once.
    ///
    /// Returns the location when the runtime is available. Repeated calls return the cached answer.
    pub fn ensure_runtime(&mut self, kind: RuntimeKind) -> Option<&RuntimeLocation> {
        if !self.cache.contains_key(&kind) {
            let location = match self.presets.get(&kind) {
                Some(path) => Some(RuntimeLocation {
                    path: path.clone(),
                    source: RuntimeSource::Preset,
                }),
                None => self.search_path.find(kind.executables()).map(|path| RuntimeLocation {
                    path,
                    source: RuntimeSource::Probed,
                }),
            };
            match &location {
                Some(loc) => tracing::debug!(runtime = %kind, path = %loc.path.display(), source = ?loc.source, "runtime resolved"),
                None => tracing::debug!(runtime = %kind, var = kind.env_var(), "runtime not found"),
            }
            self.cache.insert(kind, location);
        }
        self.cache.get(&kind).and_then(Option::as_ref)
    }

    /// Resolve every runtime kind and freeze the result.
    pub fn resolve_all(mut self) -> RuntimeConfig {
        for kind in RuntimeKind::ALL {
            self.ensure_runtime(kind);
        }
        let resolved = self
            .cache
            .into_iter()
            .filter_map(|(kind, loc)| loc.map(|loc| (kind, loc)))
            .collect();
        RuntimeConfig { resolved }
    }

    /// Locate the compiler binary.
    ///
    /// Order: the explicit override, then known build outputs under `project_root`, then `intertonc` on the
    /// search path. An override that does not exist is reported and skipped.
    pub fn resolve_compiler_path(&self, project_root: &Path, override_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = override_path {
            if path.exists() {
                return Some(path.to_path_buf());
            }
            tracing::warn!(path = %path.display(), "compiler override does not exist; probing build outputs");
        }

        if let Some(found) = BUILD_OUTPUT_CANDIDATES
            .iter()
            .map(|rel| project_root.join(rel))
            .find(|candidate| candidate.exists())
        {
            return Some(found);
        }

        self.search_path.find(&[COMPILER_NAME])
    }
}
