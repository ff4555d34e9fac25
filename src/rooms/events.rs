//! Rooms domain: events for room overlaps, changes, and clears.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::layout::{ActorKind, OverlapPhase, RoomId};

/// An actor started or stopped overlapping a room's trigger.
#[derive(Debug, Clone, Copy)]
pub struct ActorOverlapEvent {
    pub room: RoomId,
    pub actor: Entity,
    pub kind: ActorKind,
    pub phase: OverlapPhase,
}

impl Message for ActorOverlapEvent {}

/// The player entered a room and the room-change broadcast fired.
#[derive(Debug, Clone, Copy)]
pub struct RoomChangedEvent {
    pub room: RoomId,
}

impl Message for RoomChangedEvent {}

#[derive(Debug, Clone, Copy)]
pub struct RoomClearedEvent {
    pub room: RoomId,
}

impl Message for RoomClearedEvent {}
