//! Core domain: session state, seeding, and the generate/play/restart loop.

mod events;
mod resources;
mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use events::RestartGameEvent;
pub use resources::SessionConfig;
pub use state::GameState;
pub use systems::build_layout;

use bevy::prelude::*;

use crate::core::systems::{
    finish_boot, generate_session_layout, handle_restart, init_session, request_restart_on_key,
};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SessionConfig>()
            .add_message::<RestartGameEvent>()
            .add_systems(Startup, init_session)
            .add_systems(OnEnter(GameState::Boot), finish_boot)
            .add_systems(OnEnter(GameState::Generating), generate_session_layout)
            .add_systems(
                Update,
                (request_restart_on_key, handle_restart)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
