//! Camera domain: glide the camera to the center of the room the player entered.


use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::content::GameplayDefaults;
use crate::core::GameState;
use crate::layout::{DungeonLayout, RoomInstance};
use crate::rooms::{RoomChangedEvent, room_world_rect};

#[derive(Component, Debug, Clone)]
pub struct CameraFollow {
    /// World position of the current room's center plus offset.
    pub target: Option<Vec2>,
    /// World units per second.
    pub speed: f32,
    pub offset: Vec2,
}

impl CameraFollow {
    pub fn new(speed: f32, offset: Vec2) -> Self {
        Self {
            target: None,
            speed,
            offset,
        }
    }

    /// Still travelling towards the room it was sent to.
    pub fn is_switching_room(&self, current: Vec2) -> bool {
        self.target.is_some_and(|target| target != current)
    }
}

/// Step from `current` towards `target` by at most `max_delta`, landing
/// exactly on the target when it is within reach.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + delta / distance * max_delta
}

/// Where the camera should sit to frame `room`.
pub fn room_focus(room: &RoomInstance, tile_size: f32, offset: Vec2) -> Option<Vec2> {
    room_world_rect(room, tile_size).map(|(center, _)| center + offset)
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(OnExit(GameState::Playing), forget_camera_target)
            .add_systems(
                Update,
                (retarget_camera_on_room_change, follow_room_target)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn spawn_camera(mut commands: Commands, defaults: Res<GameplayDefaults>) {
    let camera = &defaults.camera;
    commands.spawn((
        Camera2d,
        CameraFollow::new(
            camera.move_speed,
            Vec2::new(camera.x_offset, camera.y_offset),
        ),
    ));
}

fn retarget_camera_on_room_change(
    mut room_changed_events: MessageReader<RoomChangedEvent>,
    layout: Res<DungeonLayout>,
    defaults: Res<GameplayDefaults>,
    mut query: Query<&mut CameraFollow>,
) {
    // Only the latest room of the frame matters.
    let Some(event) = room_changed_events.read().last() else {
        return;
    };
    let Some(room) = layout.get(event.room) else {
        return;
    };
    for mut follow in &mut query {
        follow.target = room_focus(room, defaults.layout.tile_size, follow.offset);
    }
}

fn follow_room_target(time: Res<Time>, mut query: Query<(&CameraFollow, &mut Transform)>) {
    for (follow, mut transform) in &mut query {
        let Some(target) = follow.target else {
            continue;
        };
        let current = transform.translation.truncate();
        if current == target {
            continue;
        }
        let next = move_towards(current, target, follow.speed * time.delta_secs());
        transform.translation = next.extend(transform.translation.z);
    }
}

fn forget_camera_target(mut query: Query<&mut CameraFollow>) {
    for mut follow in &mut query {
        follow.target = None;
    }
}
