//! Core domain: session setup, layout generation, and restarts.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::content::{GameplayDefaults, TemplateRegistry};
use crate::core::events::RestartGameEvent;
use crate::core::resources::SessionConfig;
use crate::core::state::GameState;
use crate::layout::{DungeonLayout, LayoutError, LevelGraph, generate_layout};
use crate::rooms::{RoomController, SpawnRng};

/// Build one layout from a seed: a branching graph of `room_count` rooms,
/// placed with the registered templates.
pub fn build_layout(
    registry: &TemplateRegistry,
    defaults: &GameplayDefaults,
    seed: u64,
) -> Result<DungeonLayout, LayoutError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let graph = LevelGraph::branching(defaults.layout.room_count, &mut rng);
    generate_layout(
        &graph,
        &registry.sorted(),
        &defaults.generation_settings(),
        &mut rng,
    )
}

pub(crate) fn init_session(
    mut session: ResMut<SessionConfig>,
    defaults: Res<GameplayDefaults>,
    mut controller: ResMut<RoomController>,
) {
    if let Some(seed) = defaults.seed {
        session.seed = seed;
    }
    info!("[CORE] Starting session with seed: {}", session.seed);

    controller.set_policy(defaults.rules.notify_policy);
    controller.subscribe_fn(|room_id, room| {
        info!(
            "[CORE] Player moved to {} ({}, {:?})",
            room_id,
            room.template().map_or("corridor", |t| t.id()),
            room.phase()
        );
    });
}

pub(crate) fn finish_boot(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Generating);
}

/// Try successive seeds until one yields a layout.
pub(crate) fn generate_session_layout(
    session: Res<SessionConfig>,
    registry: Res<TemplateRegistry>,
    defaults: Res<GameplayDefaults>,
    mut layout: ResMut<DungeonLayout>,
    mut spawn_rng: ResMut<SpawnRng>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let attempts = defaults.layout.max_attempts.max(1);
    for attempt in 0..attempts {
        let seed = session.attempt_seed(attempt);
        match build_layout(&registry, &defaults, seed) {
            Ok(generated) => {
                info!(
                    "[CORE] Generated layout {} with {} rooms and {} corridors (seed {}, attempt {})",
                    session.generation,
                    generated.rooms().count(),
                    generated.corridors().count(),
                    seed,
                    attempt + 1
                );
                *layout = generated;
                *spawn_rng = SpawnRng::from_seed(seed);
                next_state.set(GameState::Playing);
                return;
            }
            Err(e) => warn!("[CORE] Generation attempt {} failed: {}", attempt + 1, e),
        }
    }
    error!(
        "[CORE] No layout after {} attempts; check templates and layout settings",
        attempts
    );
}

pub(crate) fn request_restart_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut restart_events: MessageWriter<RestartGameEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        restart_events.write(RestartGameEvent);
    }
}

pub(crate) fn handle_restart(
    mut restart_events: MessageReader<RestartGameEvent>,
    mut session: ResMut<SessionConfig>,
    mut controller: ResMut<RoomController>,
    mut layout: ResMut<DungeonLayout>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if restart_events.read().count() == 0 {
        return;
    }
    controller.reset();
    *layout = DungeonLayout::default();
    session.generation += 1;
    info!("[CORE] Restarting, generation {}", session.generation);
    next_state.set(GameState::Generating);
}
