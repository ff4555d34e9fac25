//! Rooms domain: entity components and markers for room play.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::layout::{ActorKind, RoomId};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Room triggers - should not block movement
    Sensor,
    /// Locked door blockers
    Wall,
}

/// Sensor covering a room's outline
#[derive(Component, Debug, Clone, Copy)]
pub struct RoomTrigger {
    pub room: RoomId,
}

/// Which side of the room state machine an entity reports as
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub ActorKind);

#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug)]
pub struct Enemy {
    /// Room the enemy was spawned for
    pub room: RoomId,
}

/// Enemy is still materializing and must stay inert
#[derive(Component, Debug)]
pub struct SpawnEffect {
    pub remaining: f32,
    pub duration: f32,
}

impl SpawnEffect {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            remaining: duration_secs,
            duration: duration_secs,
        }
    }

    /// 0.0 when just spawned, 1.0 when fully materialized.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        1.0 - self.remaining / self.duration
    }

    /// Advance the effect; returns true once it has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }
}

/// Solid barrier across one door of a locked room
#[derive(Component, Debug)]
pub struct DoorBlocker {
    pub room: RoomId,
}

/// Everything spawned for the current layout; despawned when it is discarded
#[derive(Component, Debug, Default)]
pub struct LayoutScoped;
