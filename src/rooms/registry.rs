//! Rooms domain: current-room tracking and overlap dispatch.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::{
    ActorKind, ActorOverlapHandler, DungeonLayout, EnemyCensus, LayoutError, OverlapOutcome,
    OverlapPhase, RoomId,
};
use crate::rooms::notify::{ListenerId, RoomChangeBroadcast, RoomChangeListener};

/// When a player entry produces a room-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotifyPolicy {
    /// Every entry notifies, including re-entering the current room.
    #[default]
    EveryEntry,
    /// Entering the room that is already current is not announced again.
    DistinctRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapReport {
    pub outcome: OverlapOutcome,
    /// Whether the room-change broadcast fired for this event.
    pub notified: bool,
}

/// Session-scoped owner of the current room and the room-change broadcast.
#[derive(Resource, Debug, Default)]
pub struct RoomController {
    current_room: Option<RoomId>,
    policy: NotifyPolicy,
    broadcast: RoomChangeBroadcast,
}

impl RoomController {
    pub fn new(policy: NotifyPolicy) -> Self {
        Self {
            policy,
            ..default()
        }
    }

    pub fn current_room(&self) -> Option<RoomId> {
        self.current_room
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: NotifyPolicy) {
        self.policy = policy;
    }

    pub fn subscribe(&mut self, listener: impl RoomChangeListener + 'static) -> ListenerId {
        self.broadcast.subscribe(listener)
    }

    pub fn subscribe_fn<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(RoomId, &crate::layout::RoomInstance) + Send + Sync + 'static,
    {
        self.broadcast.subscribe_fn(f)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.broadcast.unsubscribe(id)
    }

    pub fn broadcast(&self) -> &RoomChangeBroadcast {
        &self.broadcast
    }

    /// Forget the current room, e.g. when the layout is thrown away.
    /// Listeners stay subscribed.
    pub fn reset(&mut self) {
        self.current_room = None;
    }

    /// Apply one enter/exit event to the room it concerns and broadcast the
    /// room change when the player entered.
    pub fn handle_overlap(
        &mut self,
        layout: &mut DungeonLayout,
        room_id: RoomId,
        kind: ActorKind,
        phase: OverlapPhase,
        census: &dyn EnemyCensus,
    ) -> Result<OverlapReport, LayoutError> {
        let room = layout.try_get_mut(room_id)?;
        let outcome = match phase {
            OverlapPhase::Enter => room.on_actor_enter(kind),
            OverlapPhase::Exit => room.on_actor_exit(kind, census),
        };

        let mut notified = false;
        if outcome == OverlapOutcome::PlayerEntered {
            let repeat = self.current_room == Some(room_id);
            self.current_room = Some(room_id);
            if !(repeat && self.policy == NotifyPolicy::DistinctRoom) {
                let delivered = self.broadcast.notify(room_id, room);
                debug!("[ROOM] Entered {} ({} listeners)", room_id, delivered);
                notified = true;
            }
        }

        Ok(OverlapReport { outcome, notified })
    }
}
