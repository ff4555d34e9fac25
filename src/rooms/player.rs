//! Rooms domain: the player actor and its top-down movement.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::GameplayDefaults;
use crate::layout::{ActorKind, DungeonLayout, NodeId};
use crate::rooms::components::{Actor, GameLayer, LayoutScoped, Player};
use crate::rooms::systems::room_world_rect;

const PLAYER_SPEED: f32 = 220.0;
const PLAYER_SIZE: f32 = 18.0;

/// Read WASD/arrow keys into a unit direction.
pub fn movement_axis(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut axis = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    axis.normalize_or_zero()
}

/// Spawn the player in the middle of the start room.
pub(crate) fn spawn_player(
    mut commands: Commands,
    layout: Res<DungeonLayout>,
    defaults: Res<GameplayDefaults>,
    existing_player: Query<Entity, With<Player>>,
) {
    if !existing_player.is_empty() {
        info!("[PLAYER] Player already exists, skipping spawn");
        return;
    }

    let tile_size = defaults.layout.tile_size;
    let start = layout
        .room_for_node(NodeId(0))
        .and_then(|id| layout.get(id))
        .and_then(|room| room_world_rect(room, tile_size))
        .map(|(center, _)| center);
    let Some(start) = start else {
        error!("[PLAYER] Layout has no start room, player not spawned");
        return;
    };

    commands.spawn((
        Player,
        Actor(ActorKind::Player),
        LayoutScoped,
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(Vec2::splat(PLAYER_SIZE)),
            ..default()
        },
        Transform::from_xyz(start.x, start.y, 1.0),
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE, PLAYER_SIZE),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0),
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Sensor, GameLayer::Wall, GameLayer::Enemy],
            ),
        ),
    ));

    info!("[PLAYER] Spawned at ({:.0}, {:.0})", start.x, start.y);
}

pub(crate) fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut LinearVelocity, With<Player>>,
) {
    let velocity = movement_axis(&keyboard) * PLAYER_SPEED;
    for mut linear_velocity in &mut query {
        linear_velocity.0 = velocity;
    }
}
