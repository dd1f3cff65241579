//! Optional runtime vocabulary registry.
//!
//! Every foreign-language interop block an example can embed is flagged by a bracketed marker token (for
//! example `<js>`). Each marker maps to one runtime kind, one configuration variable that tells the compiler
//! where the toolchain lives, and an ordered list of executable names to search for when that variable is unset.
//!
//! ## Notes
//! - `RUNTIMES` is ordered exactly like [`RuntimeKind`]'s variants. That order is also the order in which
//!   missing runtimes are checked, so the first missing one decides a skip.
//!
//! ## Examples
//! ```rust
//! use interton_runtimes::runtimes::{self, RuntimeKind};
//!
//! assert_eq!(runtimes::from_str("javascript"), Some(RuntimeKind::JavaScript));
//! assert_eq!(RuntimeKind::JavaScript.marker(), "<js>");
//! assert_eq!(RuntimeKind::JavaScript.env_var(), "INTERTON_NODE");
//! ```

use std::fmt;

/// Stable identifier for an optional runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeKind {
    Python,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    CSharp,
    Java,
}

/// Metadata entry for a runtime.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeInfo {
    pub id: RuntimeKind,
    /// Lower-case name used on the command line and in reports.
    pub canonical: &'static str,
    /// Bracketed token that flags a dependency on this runtime inside an example.
    pub marker: &'static str,
    /// Configuration variable the compiler reads the runtime location from.
    pub env_var: &'static str,
    /// Executable names probed on the search path, most preferred first.
    pub executables: &'static [&'static str],
    pub description: &'static str,
}

/// Registry of supported runtimes, in [`RuntimeKind`] declaration order.
pub const RUNTIMES: &[RuntimeInfo] = &[
    info(
        RuntimeKind::Python,
        "python",
        "<py>",
        "INTERTON_PY",
        &["python", "python3", "py"],
        "CPython interpreter for `<py>` blocks.",
    ),
    info(
        RuntimeKind::JavaScript,
        "javascript",
        "<js>",
        "INTERTON_NODE",
        &["node"],
        "Node.js for `<js>` blocks.",
    ),
    info(
        RuntimeKind::TypeScript,
        "typescript",
        "<ts>",
        "INTERTON_TS",
        &["node", "ts-node"],
        "Node.js or ts-node for `<ts>` blocks.",
    ),
    info(
        RuntimeKind::C,
        "c",
        "<c>",
        "INTERTON_C",
        &["clang++", "g++", "clang", "gcc"],
        "C toolchain for `<c>` blocks. C++ drivers are preferred since they also accept C.",
    ),
    info(
        RuntimeKind::Cpp,
        "cpp",
        "<cpp>",
        "INTERTON_CPP",
        &["clang++", "g++"],
        "C++ toolchain for `<cpp>` blocks.",
    ),
    info(
        RuntimeKind::CSharp,
        "csharp",
        "<cs>",
        "INTERTON_CSHARP",
        &["csc", "mcs", "dotnet", "interton-ffi-csharp", "interton_csharp_runner"],
        "C# compiler or the Interton C# runner for `<cs>` blocks.",
    ),
    info(
        RuntimeKind::Java,
        "java",
        "<j>",
        "INTERTON_JAVA",
        &["javac", "interton-ffi-java", "interton_java_runner"],
        "Java compiler or the Interton Java runner for `<j>` blocks.",
    ),
];

impl RuntimeKind {
    /// Every kind in check order.
    pub const ALL: [RuntimeKind; 7] = [
        RuntimeKind::Python,
        RuntimeKind::JavaScript,
        RuntimeKind::TypeScript,
        RuntimeKind::C,
        RuntimeKind::Cpp,
        RuntimeKind::CSharp,
        RuntimeKind::Java,
    ];

    /// Return the registry entry for this kind.
    pub fn info(self) -> &'static RuntimeInfo {
        // RUNTIMES is declared in variant order; the guardrail tests pin that.
        &RUNTIMES[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.info().canonical
    }

    pub fn marker(self) -> &'static str {
        self.info().marker
    }

    pub fn env_var(self) -> &'static str {
        self.info().env_var
    }

    pub fn executables(self) -> &'static [&'static str] {
        self.info().executables
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a canonical runtime name to its stable id.
pub fn from_str(name: &str) -> Option<RuntimeKind> {
    RUNTIMES.iter().find(|r| r.canonical == name).map(|r| r.id)
}

/// Resolve a marker token (brackets included) to its runtime.
pub fn from_marker(marker: &str) -> Option<RuntimeKind> {
    RUNTIMES.iter().find(|r| r.marker == marker).map(|r| r.id)
}

const fn info(
    id: RuntimeKind,
    canonical: &'static str,
    marker: &'static str,
    env_var: &'static str,
    executables: &'static [&'static str],
    description: &'static str,
) -> RuntimeInfo {
    RuntimeInfo {
        id,
        canonical,
        marker,
        env_var,
        executables,
        description,
    }
}
