//! Core domain: tests for seeding and session layout generation.

use std::collections::HashSet;

use super::{SessionConfig, build_layout};
use crate::content::{GameplayDefaults, TemplateRegistry};
use crate::layout::{LayoutError, NodeId};

fn small_defaults() -> GameplayDefaults {
    let mut defaults = GameplayDefaults::default();
    // Four rooms always find a free neighboring cell.
    defaults.layout.room_count = 4;
    defaults
}

#[test]
fn test_attempt_seeds_are_distinct() {
    let mut session = SessionConfig {
        seed: 10,
        generation: 0,
    };
    let mut seen = HashSet::new();
    for attempt in 0..16 {
        assert!(seen.insert(session.attempt_seed(attempt)));
    }
    session.generation = 1;
    for attempt in 0..16 {
        assert!(seen.insert(session.attempt_seed(attempt)));
    }
}

#[test]
fn test_attempt_seed_wraps() {
    let session = SessionConfig {
        seed: u64::MAX,
        generation: 0,
    };
    assert_eq!(session.attempt_seed(1), 0);
}

#[test]
fn test_build_layout_is_deterministic() {
    let registry = TemplateRegistry::fallback();
    let defaults = GameplayDefaults::default();
    for seed in [1, 2, 3] {
        assert_eq!(
            build_layout(&registry, &defaults, seed),
            build_layout(&registry, &defaults, seed)
        );
    }
}

#[test]
fn test_build_layout_small_session() {
    let registry = TemplateRegistry::fallback();
    let defaults = small_defaults();
    for seed in 0..10 {
        let layout = build_layout(&registry, &defaults, seed).unwrap();
        assert_eq!(layout.rooms().count(), 4);
        assert_eq!(layout.corridors().count(), 3);
        assert!(layout.all_doors_set());
        assert!(layout.room_for_node(NodeId(0)).is_some());
    }
}

#[test]
fn test_build_layout_without_templates() {
    let defaults = small_defaults();
    assert_eq!(
        build_layout(&TemplateRegistry::default(), &defaults, 0),
        Err(LayoutError::NoTemplates)
    );
}
