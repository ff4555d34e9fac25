//! Layout domain: the generated dungeon and its persisted snapshot.

use bevy::prelude::*;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::layout::error::LayoutError;
use crate::layout::geometry::Point2D;
use crate::layout::graph::NodeId;
use crate::layout::room::{RoomId, RoomInstance};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Every room instance of the current layout, owned in one arena.
///
/// Rooms refer to each other by [`RoomId`]; the layout is discarded as a whole
/// when a new one is generated.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct DungeonLayout {
    rooms: Vec<RoomInstance>,
    node_rooms: HashMap<NodeId, RoomId>,
}

impl DungeonLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, room: RoomInstance) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(room);
        id
    }

    /// Record which room instance materializes a level graph node.
    pub fn bind_node(&mut self, node: NodeId, room: RoomId) {
        self.node_rooms.insert(node, room);
    }

    pub fn room_for_node(&self, node: NodeId) -> Option<RoomId> {
        self.node_rooms.get(&node).copied()
    }

    pub fn get(&self, id: RoomId) -> Option<&RoomInstance> {
        self.rooms.get(id.index())
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut RoomInstance> {
        self.rooms.get_mut(id.index())
    }

    pub fn try_get_mut(&mut self, id: RoomId) -> Result<&mut RoomInstance, LayoutError> {
        self.get_mut(id).ok_or(LayoutError::UnknownRoom(id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &RoomInstance)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (RoomId(i as u32), r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RoomId, &mut RoomInstance)> {
        self.rooms
            .iter_mut()
            .enumerate()
            .map(|(i, r)| (RoomId(i as u32), r))
    }

    /// Non-corridor rooms.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &RoomInstance)> {
        self.iter().filter(|(_, r)| !r.is_corridor())
    }

    pub fn corridors(&self) -> impl Iterator<Item = (RoomId, &RoomInstance)> {
        self.iter().filter(|(_, r)| r.is_corridor())
    }

    /// The room whose floor covers `tile`, if any.
    pub fn room_at(&self, tile: Point2D) -> Option<RoomId> {
        self.iter()
            .find(|(_, room)| room.world_tiles().any(|t| t.xy() == tile))
            .map(|(id, _)| id)
    }

    /// Rooms reachable through the doors of `id`.
    pub fn neighbors(&self, id: RoomId) -> Vec<RoomId> {
        self.get(id)
            .and_then(|room| room.doors())
            .map(|doors| doors.iter().map(|d| d.connected_room).collect())
            .unwrap_or_default()
    }

    pub fn all_doors_set(&self) -> bool {
        self.rooms.iter().all(|r| r.has_doors())
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        let mut rooms = self.rooms.clone();
        for room in &mut rooms {
            room.strip_corridor_template();
        }
        let mut nodes: Vec<NodeBinding> = self
            .node_rooms
            .iter()
            .map(|(node, room)| NodeBinding {
                node: *node,
                room: *room,
            })
            .collect();
        nodes.sort_by_key(|b| b.node);
        LayoutSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            rooms,
            nodes,
        }
    }

    /// Rebuild a layout from a snapshot, rejecting rooms whose invariants do
    /// not hold and doors or node bindings that point outside the layout.
    pub fn from_snapshot(snapshot: LayoutSnapshot) -> Result<Self, LayoutError> {
        let count = snapshot.rooms.len();
        for room in &snapshot.rooms {
            if room.is_corridor() != room.connection().is_some() {
                return Err(LayoutError::InvalidConfiguration {
                    is_corridor: room.is_corridor(),
                });
            }
            let bounds = room.state().spawn_bounds();
            if !bounds.is_valid() {
                return Err(LayoutError::InvalidSpawnBounds {
                    min: bounds.min(),
                    max: bounds.max(),
                });
            }
            for door in room.doors().unwrap_or_default() {
                if door.connected_room.index() >= count {
                    return Err(LayoutError::UnknownRoom(door.connected_room));
                }
            }
        }
        if let Some(binding) = snapshot.nodes.iter().find(|b| b.room.index() >= count) {
            return Err(LayoutError::UnknownRoom(binding.room));
        }
        Ok(Self {
            rooms: snapshot.rooms,
            node_rooms: snapshot
                .nodes
                .into_iter()
                .map(|b| (b.node, b.room))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBinding {
    pub node: NodeId,
    pub room: RoomId,
}

/// Field-for-field persisted form of a [`DungeonLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub schema_version: u32,
    pub rooms: Vec<RoomInstance>,
    pub nodes: Vec<NodeBinding>,
}

#[derive(Debug)]
pub enum SnapshotError {
    Io(String),
    Encode(String),
    Decode(String),
    Invalid(LayoutError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(msg) => write!(f, "IO error: {msg}"),
            SnapshotError::Encode(msg) => write!(f, "Encode error: {msg}"),
            SnapshotError::Decode(msg) => write!(f, "Parse error: {msg}"),
            SnapshotError::Invalid(e) => write!(f, "Invalid layout: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<LayoutError> for SnapshotError {
    fn from(e: LayoutError) -> Self {
        SnapshotError::Invalid(e)
    }
}

impl LayoutSnapshot {
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        ron::ser::to_string_pretty(self, PrettyConfig::default())
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_ron(contents: &str) -> Result<Self, SnapshotError> {
        ron::from_str(contents).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(contents: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(contents).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn save_ron(&self, path: &Path) -> Result<(), SnapshotError> {
        let contents = self.to_ron()?;
        fs::write(path, contents).map_err(|e| SnapshotError::Io(e.to_string()))?;
        info!("[LAYOUT] Wrote snapshot of {} rooms to {}", self.rooms.len(), path.display());
        Ok(())
    }

    pub fn load_ron(path: &Path) -> Result<DungeonLayout, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
        let snapshot = Self::from_ron(&contents)?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            warn!(
                "[LAYOUT] Snapshot {} has schema version {}, expected {}",
                path.display(),
                snapshot.schema_version,
                SNAPSHOT_SCHEMA_VERSION
            );
        }
        Ok(DungeonLayout::from_snapshot(snapshot)?)
    }
}
