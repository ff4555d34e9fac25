//! Debug domain: info overlay.

use bevy::prelude::*;

use crate::core::SessionConfig;
use crate::layout::DungeonLayout;
use crate::rooms::RoomController;

/// Marker for debug info overlay
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

pub(crate) fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}

/// Overlay text for the current session.
pub fn info_text(
    session: &SessionConfig,
    layout: &DungeonLayout,
    controller: &RoomController,
    status: Option<&str>,
) -> String {
    let room = match controller.current_room().and_then(|id| layout.get(id).map(|r| (id, r))) {
        Some((id, room)) => format!(
            "{} '{}' {:?}",
            id,
            room.template().map_or("corridor", |t| t.id()),
            room.phase()
        ),
        None => "none".to_string(),
    };
    let defeated = layout.rooms().filter(|(_, r)| r.state().defeated).count();
    let mut text = format!(
        "Seed: {}\nGeneration: {}\nRoom: {}\nDefeated: {}/{}\nListeners: {}",
        session.seed,
        session.generation,
        room,
        defeated,
        layout.rooms().count(),
        controller.broadcast().listener_count()
    );
    if let Some(status) = status {
        text.push('\n');
        text.push_str(status);
    }
    text
}
