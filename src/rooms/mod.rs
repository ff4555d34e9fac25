//! Rooms domain: room flow plugin wiring and public exports.

mod components;
mod events;
mod notify;
mod player;
mod registry;
mod spawn;
mod systems;


pub use components::{
    Actor, DoorBlocker, Enemy, GameLayer, LayoutScoped, Player, RoomTrigger, SpawnEffect,
};
pub use events::{ActorOverlapEvent, RoomChangedEvent, RoomClearedEvent};
pub use notify::{ListenerId, RoomChangeBroadcast, RoomChangeListener};
pub use player::movement_axis;
pub use registry::{NotifyPolicy, OverlapReport, RoomController};
pub use spawn::{SpawnRng, interior_tiles, plan_enemy_spawns};
pub use systems::{
    ActorContacts, DoorAction, door_action, door_blocker_rect, remaining_enemies, remove_enemy,
    room_world_rect,
};

use bevy::prelude::*;

use crate::core::GameState;
use crate::layout::DungeonLayout;
use crate::rooms::player::{move_player, spawn_player};
use crate::rooms::spawn::{spawn_room_enemies, tick_spawn_effects};
use crate::rooms::systems::{
    announce_room_cleared, apply_overlap_events, cleanup_layout_entities,
    defeat_enemies_on_contact, forward_room_collisions, lock_doors_on_engage,
    spawn_room_triggers, sync_door_blockers,
};

pub struct RoomsPlugin;

impl Plugin for RoomsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DungeonLayout>()
            .init_resource::<RoomController>()
            .init_resource::<SpawnRng>()
            .init_resource::<ActorContacts>()
            .add_message::<ActorOverlapEvent>()
            .add_message::<RoomChangedEvent>()
            .add_message::<RoomClearedEvent>()
            .add_systems(
                OnEnter(GameState::Playing),
                (spawn_room_triggers, spawn_player).chain(),
            )
            .add_systems(OnExit(GameState::Playing), cleanup_layout_entities)
            .add_systems(
                Update,
                (
                    forward_room_collisions,
                    defeat_enemies_on_contact,
                    apply_overlap_events,
                    lock_doors_on_engage,
                    sync_door_blockers,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    spawn_room_enemies.after(apply_overlap_events),
                    tick_spawn_effects,
                    move_player,
                    announce_room_cleared.after(apply_overlap_events),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
