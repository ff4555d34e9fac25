//! Debug domain: debug systems for input and runtime inspection.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use std::path::Path;

use crate::core::SessionConfig;
use crate::debug::state::{DebugState, LAYOUT_DUMP_FILE};
use crate::debug::ui::{DebugInfoOverlay, info_text, spawn_debug_info_overlay};
use crate::layout::DungeonLayout;
use crate::rooms::{ActorContacts, ActorOverlapEvent, Enemy, RoomController, remove_enemy};

/// Toggle the info overlay with F1 or backtick key
pub(crate) fn toggle_debug_info(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    let toggle = keyboard.just_pressed(KeyCode::F1) || keyboard.just_pressed(KeyCode::Backquote);
    if !toggle {
        return;
    }

    debug_state.show_info = !debug_state.show_info;
    if debug_state.show_info {
        spawn_debug_info_overlay(&mut commands);
    } else {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
    }
}

/// Handle keyboard shortcuts for layout inspection
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    layout: Res<DungeonLayout>,
    controller: Res<RoomController>,
    enemy_query: Query<(Entity, &Enemy)>,
    mut contacts: ResMut<ActorContacts>,
    mut overlaps: MessageWriter<ActorOverlapEvent>,
) {
    // F3: Log every room's phase
    if keyboard.just_pressed(KeyCode::F3) {
        for (id, room) in layout.iter() {
            info!(
                "[DEBUG] {} {} phase={:?} doors={} locked={} spawning={}",
                id,
                room.template().map_or("corridor", |t| t.id()),
                room.phase(),
                room.doors().map_or(0, |d| d.len()),
                room.state().doors_locked,
                room.state().enemy_spawning_enabled
            );
        }
        debug_state.set_message(format!("Logged {} rooms", layout.len()), 2.0);
    }

    // F4: Dump the layout snapshot
    if keyboard.just_pressed(KeyCode::F4) {
        match layout.snapshot().save_ron(Path::new(LAYOUT_DUMP_FILE)) {
            Ok(()) => debug_state.set_message(format!("Wrote {}", LAYOUT_DUMP_FILE), 2.0),
            Err(e) => {
                error!("[DEBUG] Layout dump failed: {}", e);
                debug_state.set_message("Layout dump failed", 2.0);
            }
        }
    }

    // F5: Remove the enemies of the current room
    if keyboard.just_pressed(KeyCode::F5) {
        let Some(current) = controller.current_room() else {
            debug_state.set_message("No current room", 2.0);
            return;
        };
        let mut removed = 0;
        for (entity, enemy) in &enemy_query {
            if enemy.room == current {
                remove_enemy(&mut commands, &mut contacts, &mut overlaps, entity);
                removed += 1;
            }
        }
        info!("[DEBUG] Removed {} enemies from {}", removed, current);
        debug_state.set_message(format!("Removed {} enemies", removed), 2.0);
    }
}

/// Update status message timer and fade out
pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    debug_state.tick_message(time.delta_secs());
}

pub(crate) fn update_debug_info_overlay(
    debug_state: Res<DebugState>,
    session: Res<SessionConfig>,
    layout: Res<DungeonLayout>,
    controller: Res<RoomController>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
) {
    let status = debug_state.status_message.as_ref().map(|(msg, _)| msg.as_str());
    for mut text in &mut overlay_query {
        **text = info_text(&session, &layout, &controller, status);
    }
}
