//! Layout domain: the generated room graph, room instances, and their state.

mod dungeon;
mod error;
mod generator;
mod geometry;
mod graph;
mod room;
mod state;
mod template;

#[cfg(test)]
mod tests;

pub use dungeon::{
    DungeonLayout, LayoutSnapshot, NodeBinding, SNAPSHOT_SCHEMA_VERSION, SnapshotError,
};
pub use error::LayoutError;
pub use generator::{GenerationSettings, generate_layout};
pub use geometry::{Direction, GridPosition, Point2D, Polygon2D};
pub use graph::{Connection, GraphNode, LevelGraph, NodeId};
pub use room::{DoorInstance, DoorLine, RoomId, RoomInstance};
pub use state::{
    ActorKind, ActorOverlapHandler, ClearPolicy, DEFAULT_MAX_ENEMY_SPAWNS,
    DEFAULT_MIN_ENEMY_SPAWNS, EnemyCensus, OverlapOutcome, OverlapPhase, RoomPhase, RoomState,
    SpawnBounds,
};
pub use template::{TemplateInstance, TemplateRef};
