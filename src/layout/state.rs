//! Layout domain: per-room occupancy and threat state.
//!
//! The state is driven by overlap events from the physics layer. It never
//! validates an event against the current flags: every transition is an
//! unconditional write, so a stray exit simply re-asserts `false`.

use serde::{Deserialize, Serialize};

use crate::layout::error::LayoutError;

pub const DEFAULT_MIN_ENEMY_SPAWNS: u32 = 3;
pub const DEFAULT_MAX_ENEMY_SPAWNS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Enemy,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlapPhase {
    Enter,
    Exit,
}

/// When an enemy leaving a room marks the room as defeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClearPolicy {
    /// Any enemy exit marks the room defeated, whatever is left inside.
    #[default]
    AnyEnemyExit,
    /// Only the exit that leaves no enemies behind marks the room defeated.
    LastEnemyExit,
}

/// Global count of enemies still alive, not counting the one that is leaving.
pub trait EnemyCensus {
    fn remaining_enemies(&self) -> usize;
}

impl EnemyCensus for usize {
    fn remaining_enemies(&self) -> usize {
        *self
    }
}

/// Conceptual phase derived from the stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomPhase {
    /// No player, no enemy.
    Idle,
    /// Player inside, no enemy.
    Occupied,
    /// Enemies inside, no player.
    Infested,
    /// Player and enemies inside, not yet defeated.
    Engaged,
    /// Defeated, with or without the player inside.
    Cleared,
}

/// What a transition asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum OverlapOutcome {
    Quiet,
    /// The player entered; the room-change notification must fire.
    PlayerEntered,
    /// The room flipped to defeated on this event.
    Defeated,
}

/// Host-agnostic entry point for enter/exit events reported by the physics layer.
pub trait ActorOverlapHandler {
    fn on_actor_enter(&mut self, kind: ActorKind) -> OverlapOutcome;
    fn on_actor_exit(&mut self, kind: ActorKind, census: &dyn EnemyCensus) -> OverlapOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnBounds {
    min: u32,
    max: u32,
}

impl SpawnBounds {
    pub fn new(min: u32, max: u32) -> Result<Self, LayoutError> {
        if min > max {
            return Err(LayoutError::InvalidSpawnBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ENEMY_SPAWNS,
            max: DEFAULT_MAX_ENEMY_SPAWNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub enemy_present: bool,
    pub player_present: bool,
    pub doors_locked: bool,
    pub defeated: bool,
    pub enemy_spawning_enabled: bool,
    spawn_bounds: SpawnBounds,
    #[serde(default)]
    clear_policy: ClearPolicy,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            enemy_present: false,
            player_present: false,
            doors_locked: false,
            defeated: false,
            enemy_spawning_enabled: true,
            spawn_bounds: SpawnBounds::default(),
            clear_policy: ClearPolicy::default(),
        }
    }
}

impl RoomState {
    pub fn phase(&self) -> RoomPhase {
        if self.defeated {
            return RoomPhase::Cleared;
        }
        match (self.player_present, self.enemy_present) {
            (false, false) => RoomPhase::Idle,
            (true, false) => RoomPhase::Occupied,
            (false, true) => RoomPhase::Infested,
            (true, true) => RoomPhase::Engaged,
        }
    }

    pub fn spawn_bounds(&self) -> SpawnBounds {
        self.spawn_bounds
    }

    /// Replace the spawn bounds. Rejected bounds leave the old ones in place.
    pub fn set_spawn_bounds(&mut self, min: u32, max: u32) -> Result<(), LayoutError> {
        self.spawn_bounds = SpawnBounds::new(min, max)?;
        Ok(())
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    pub fn set_clear_policy(&mut self, policy: ClearPolicy) {
        self.clear_policy = policy;
    }
}

impl ActorOverlapHandler for RoomState {
    fn on_actor_enter(&mut self, kind: ActorKind) -> OverlapOutcome {
        match kind {
            ActorKind::Enemy => {
                self.enemy_present = true;
                OverlapOutcome::Quiet
            }
            ActorKind::Player => {
                // Fires on every entry, including re-entry into the same room.
                self.player_present = true;
                OverlapOutcome::PlayerEntered
            }
        }
    }

    fn on_actor_exit(&mut self, kind: ActorKind, census: &dyn EnemyCensus) -> OverlapOutcome {
        match kind {
            ActorKind::Enemy => {
                let remaining = census.remaining_enemies();
                if remaining == 0 {
                    self.enemy_present = false;
                }
                let was_defeated = self.defeated;
                match self.clear_policy {
                    ClearPolicy::AnyEnemyExit => self.defeated = true,
                    ClearPolicy::LastEnemyExit => {
                        if remaining == 0 {
                            self.defeated = true;
                        }
                    }
                }
                if self.defeated && !was_defeated {
                    OverlapOutcome::Defeated
                } else {
                    OverlapOutcome::Quiet
                }
            }
            ActorKind::Player => {
                self.player_present = false;
                OverlapOutcome::Quiet
            }
        }
    }
}
