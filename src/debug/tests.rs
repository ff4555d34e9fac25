//! Debug domain: tests for overlay text and status messages.

use super::{DebugState, info_text};
use crate::core::SessionConfig;
use crate::layout::{
    ActorKind, DungeonLayout, GridPosition, OverlapPhase, Polygon2D, RoomInstance,
    TemplateInstance, TemplateRef,
};
use crate::rooms::RoomController;

#[test]
fn test_status_message_expires() {
    let mut state = DebugState::default();
    state.set_message("hello", 1.0);
    assert!(!state.tick_message(0.5));
    assert!(state.status_message.is_some());
    assert!(state.tick_message(0.6));
    assert!(state.status_message.is_none());
    assert!(!state.tick_message(1.0));
}

#[test]
fn test_info_text_shows_current_room() {
    let session = SessionConfig {
        seed: 77,
        generation: 2,
    };
    let mut layout = DungeonLayout::new();
    let id = layout.push(RoomInstance::room(
        TemplateRef::new("crypt"),
        TemplateInstance::default(),
        GridPosition::ZERO,
        Polygon2D::empty(),
    ));
    let mut controller = RoomController::default();

    let text = info_text(&session, &layout, &controller, None);
    assert!(text.contains("Seed: 77"));
    assert!(text.contains("Room: none"));

    controller
        .handle_overlap(&mut layout, id, ActorKind::Player, OverlapPhase::Enter, &0usize)
        .unwrap();
    let text = info_text(&session, &layout, &controller, Some("Wrote dump"));
    assert!(text.contains("room#0 'crypt' Occupied"));
    assert!(text.contains("Defeated: 0/1"));
    assert!(text.ends_with("Wrote dump"));
}
