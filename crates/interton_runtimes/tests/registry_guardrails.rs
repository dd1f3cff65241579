use std::collections::HashMap;

use interton_runtimes::compiler::EXECUTABLE_SUFFIXES;
use interton_runtimes::runtimes::{self, RUNTIMES, RuntimeKind};

#[test]
fn registry_is_declared_in_variant_order() {
    assert_eq!(RUNTIMES.len(), RuntimeKind::ALL.len());
    for (index, kind) in RuntimeKind::ALL.iter().enumerate() {
        assert_eq!(RUNTIMES[index].id, *kind, "registry slot {} holds the wrong kind", index);
        assert_eq!(kind.info().id, *kind);
    }
}

#[test]
fn check_order_matches_ord() {
    let mut sorted = RuntimeKind::ALL;
    sorted.sort();
    assert_eq!(sorted, RuntimeKind::ALL);
}

#[test]
fn canonical_names_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, RuntimeKind> = HashMap::new();

    for info in RUNTIMES {
        assert_eq!(
            runtimes::from_str(info.canonical),
            Some(info.id),
            "runtime name not resolvable: {}",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate runtime name {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn markers_are_bracketed_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, RuntimeKind> = HashMap::new();

    for info in RUNTIMES {
        assert!(
            info.marker.starts_with('<') && info.marker.ends_with('>'),
            "marker {:?} is not bracketed",
            info.marker
        );
        assert_eq!(runtimes::from_marker(info.marker), Some(info.id));
        if let Some(prev) = seen.insert(info.marker, info.id) {
            panic!("duplicate marker {:?}: {:?} and {:?}", info.marker, prev, info.id);
        }
    }
}

#[test]
fn env_vars_unique_and_namespaced() {
    let mut seen: HashMap<&'static str, RuntimeKind> = HashMap::new();

    for info in RUNTIMES {
        assert!(info.env_var.starts_with("INTERTON_"), "unexpected variable {}", info.env_var);
        if let Some(prev) = seen.insert(info.env_var, info.id) {
            panic!("duplicate variable {:?}: {:?} and {:?}", info.env_var, prev, info.id);
        }
    }
}

#[test]
fn every_runtime_has_candidates_without_suffixes() {
    for info in RUNTIMES {
        assert!(!info.executables.is_empty(), "{} has no executables to search for", info.canonical);
        for name in info.executables {
            for suffix in EXECUTABLE_SUFFIXES.iter().filter(|s| !s.is_empty()) {
                assert!(
                    !name.ends_with(suffix),
                    "{} lists {:?}; suffixes are added during probing",
                    info.canonical,
                    name
                );
            }
        }
    }
}
