//! Runtime-requirement scanning and the run/skip decision.
//!
//! Markers are found by plain substring search. A `<js>` inside a comment or a string literal counts exactly
//! like a real interop block; the scanner has no notion of Interton syntax.

use std::collections::BTreeSet;

use interton_runtimes::RuntimeKind;

use super::example::{Decision, ExampleFile};
use super::resolver::RuntimeConfig;

/// Runtimes an example's text asks for, in check order.
pub fn scan(content: &str) -> BTreeSet<RuntimeKind> {
    RuntimeKind::ALL
        .into_iter()
        .filter(|kind| content.contains(kind.marker()))
        .collect()
}

/// Decide whether an example with these requirements can run.
///
/// The first unavailable runtime (in check order) decides the skip; later ones are not looked at.
pub fn decide(requirements: &BTreeSet<RuntimeKind>, runtimes: &RuntimeConfig) -> Decision {
    requirements
        .iter()
        .find(|kind| !runtimes.is_available(**kind))
        .map_or(Decision::Run, |kind| Decision::SkipMissingRuntime(*kind))
}

/// Produce the terminal decision for a discovered file.
///
/// Files already excluded by a path rule are never opened. A file that cannot be read is scanned as empty text,
/// so it is admitted and the compiler's own failure to read it is what gets recorded.
pub fn classify(file: &ExampleFile, runtimes: &RuntimeConfig) -> Decision {
    if let Some(decision) = file.exclusion {
        return decision;
    }

    let content = match file.read_lossy() {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %file.path.display(), error = %err, "cannot read example for marker scan");
            String::new()
        }
    };

    let requirements = scan(&content);
    let decision = decide(&requirements, runtimes);
    tracing::debug!(path = %file.path.display(), ?requirements, %decision, "classified example");
    decision
}
