//! Rooms domain: enemy spawning on room entry.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::content::GameplayDefaults;
use crate::layout::{ActorKind, DungeonLayout, GridPosition, RoomInstance};
use crate::rooms::components::{Actor, Enemy, GameLayer, LayoutScoped, SpawnEffect};
use crate::rooms::events::RoomChangedEvent;

/// Randomness for spawn counts and positions, reseeded with every layout.
#[derive(Resource, Debug)]
pub struct SpawnRng(pub ChaCha8Rng);

impl Default for SpawnRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(0))
    }
}

impl SpawnRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Decide how many enemies a room gets on entry, and close the room to
/// further spawning. Corridors, defeated rooms, and rooms that already
/// spawned get nothing.
pub fn plan_enemy_spawns<R: Rng>(room: &mut RoomInstance, rng: &mut R) -> Option<u32> {
    if room.is_corridor() {
        return None;
    }
    let state = room.state_mut();
    if state.defeated || !state.enemy_spawning_enabled {
        return None;
    }
    let bounds = state.spawn_bounds();
    state.enemy_spawning_enabled = false;
    Some(rng.random_range(bounds.min()..=bounds.max()))
}

/// Floor tiles at least one tile away from the walls.
pub fn interior_tiles(room: &RoomInstance) -> Vec<GridPosition> {
    let Some((min, max)) = room.outline().bounds() else {
        return Vec::new();
    };
    room.world_tiles()
        .filter(|t| t.x > min.x && t.x < max.x - 1 && t.y > min.y && t.y < max.y - 1)
        .collect()
}

pub(crate) fn spawn_room_enemies(
    mut commands: Commands,
    mut room_changed_events: MessageReader<RoomChangedEvent>,
    mut layout: ResMut<DungeonLayout>,
    mut rng: ResMut<SpawnRng>,
    defaults: Res<GameplayDefaults>,
) {
    let tile_size = defaults.layout.tile_size;
    let enemy_size = defaults.spawn.enemy_size;

    for event in room_changed_events.read() {
        let Some(room) = layout.get_mut(event.room) else {
            continue;
        };
        let Some(count) = plan_enemy_spawns(room, &mut rng.0) else {
            continue;
        };
        let tiles = interior_tiles(room);
        if tiles.is_empty() {
            warn!("[SPAWN] {} has no interior floor to spawn on", event.room);
            continue;
        }

        for _ in 0..count {
            let tile = tiles[rng.0.random_range(0..tiles.len())];
            let pos = (Vec2::new(tile.x as f32, tile.y as f32) + Vec2::splat(0.5)) * tile_size;
            commands.spawn((
                Enemy { room: event.room },
                Actor(ActorKind::Enemy),
                SpawnEffect::new(defaults.spawn.spawn_effect_secs),
                LayoutScoped,
                Sprite {
                    color: Color::srgba(0.85, 0.25, 0.25, 0.0),
                    custom_size: Some(Vec2::splat(enemy_size)),
                    ..default()
                },
                Transform::from_xyz(pos.x, pos.y, 0.8),
                RigidBody::Dynamic,
                Collider::rectangle(enemy_size, enemy_size),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Enemy,
                    [GameLayer::Sensor, GameLayer::Wall, GameLayer::Player],
                ),
                LockedAxes::ROTATION_LOCKED,
                GravityScale(0.0),
                LinearDamping(5.0),
            ));
        }

        info!("[SPAWN] Spawned {} enemies in {}", count, event.room);
    }
}

/// Fade freshly spawned enemies in; they stay inert until the effect ends.
pub(crate) fn tick_spawn_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut SpawnEffect, &mut Sprite, &mut LinearVelocity)>,
) {
    let dt = time.delta_secs();
    for (entity, mut effect, mut sprite, mut velocity) in &mut query {
        let done = effect.tick(dt);
        sprite.color = sprite.color.with_alpha(effect.progress());
        velocity.0 = Vec2::ZERO;
        if done {
            commands.entity(entity).remove::<SpawnEffect>();
            debug!("[SPAWN] {:?} finished materializing", entity);
        }
    }
}
