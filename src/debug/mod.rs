//! Debug tooling for inspecting generated layouts.
//!
//! Features:
//! - F1 toggles an overlay with seed, current room, and phase
//! - F3 logs every room's phase and door state
//! - F4 writes the layout snapshot to `layout_dump.ron`
//! - F5 removes the enemies of the current room

mod state;
mod systems;
mod ui;

#[cfg(test)]
mod tests;

pub use state::{DebugState, LAYOUT_DUMP_FILE};
pub use ui::{DebugInfoOverlay, info_text};

use bevy::prelude::*;

use crate::debug::systems::{
    handle_debug_hotkeys, toggle_debug_info, update_debug_info_overlay, update_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    toggle_debug_info,
                    handle_debug_hotkeys,
                    update_status_message,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                update_debug_info_overlay.run_if(|state: Res<DebugState>| state.show_info),
            );
    }
}
