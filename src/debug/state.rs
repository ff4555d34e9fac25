//! Debug domain: state for debug tooling.

use bevy::prelude::*;

pub const LAYOUT_DUMP_FILE: &str = "layout_dump.ron";

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether the info overlay (seed, room, phase) is visible
    pub show_info: bool,
    /// Message to display temporarily in the overlay
    pub status_message: Option<(String, f32)>,
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        self.status_message = Some((message.into(), duration));
    }

    /// Count the message down; returns true when it expired this tick.
    pub fn tick_message(&mut self, dt: f32) -> bool {
        let Some((_, remaining)) = self.status_message.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.status_message = None;
            return true;
        }
        false
    }
}
