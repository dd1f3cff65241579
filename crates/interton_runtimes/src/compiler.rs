//! Command-line contract of the `intertonc` compiler binary.
//!
//! The harness only ever talks to the compiler through `<compiler> --run <file>`.

/// Canonical executable name looked up on the search path.
pub const COMPILER_NAME: &str = "intertonc";

/// Configuration variable holding an explicit compiler location.
pub const COMPILER_ENV_VAR: &str = "INTERTONC_PATH";

/// Directive that asks the compiler to build and execute a single source file.
pub const RUN_DIRECTIVE: &str = "--run";

/// Extension (without the dot) of runnable Interton source files.
pub const SOURCE_EXTENSION: &str = "it";

/// Known build-output locations of the compiler, relative to the project root, in search order.
pub const BUILD_OUTPUT_CANDIDATES: &[&str] = &[
    "build/compiler/compiler/Release/intertonc.exe",
    "build/compiler/compiler/Release/interton_compiler.exe",
    "build/artifacts/windows/dist/bin/intertonc.exe",
    "build/compiler/compiler/Release/intertonc",
    "build/compiler/compiler/intertonc",
];

/// Platform executable-name suffixes tried for every candidate name, in order.
///
/// The empty suffix comes first so an exact name always wins.
pub const EXECUTABLE_SUFFIXES: &[&str] = &["", ".exe", ".cmd", ".bat", ".ps1"];

/// Extensions that are recognized as non-source companions of the examples.
///
/// Files with these extensions are skipped without being opened.
pub const KNOWN_NON_SOURCE_EXTENSIONS: &[&str] = &["md", "txt", "log", "json", "ps1", "py", "cpp", "c", "h", "hpp", "cc"];
