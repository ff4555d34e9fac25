//! Layout domain: laid-out room instances and their doors.

use serde::{Deserialize, Serialize};

use crate::layout::error::LayoutError;
use crate::layout::geometry::{Direction, GridPosition, Point2D, Polygon2D};
use crate::layout::graph::Connection;
use crate::layout::state::{
    ActorKind, ActorOverlapHandler, EnemyCensus, OverlapOutcome, RoomPhase, RoomState,
};
use crate::layout::template::{TemplateInstance, TemplateRef};

/// Index of a room instance inside its [`DungeonLayout`](crate::layout::DungeonLayout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Segment of wall occupied by a door, in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLine {
    pub from: Point2D,
    pub to: Point2D,
}

impl DoorLine {
    pub fn new(from: Point2D, to: Point2D) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> i32 {
        (self.to.x - self.from.x).abs() + (self.to.y - self.from.y).abs()
    }
}

/// A door of one room, leading to a neighboring room.
///
/// The neighbor is held by id; the layout owns every room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorInstance {
    pub line: DoorLine,
    pub facing: Direction,
    pub connected_room: RoomId,
}

impl DoorInstance {
    pub fn new(line: DoorLine, facing: Direction, connected_room: RoomId) -> Self {
        Self {
            line,
            facing,
            connected_room,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.facing.is_vertical()
    }
}

/// A room template (or corridor) as it was laid out in the generated dungeon.
///
/// Everything except the door list and the gameplay state is fixed at
/// construction. Doors are assigned exactly once, after every room is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInstance {
    /// May be absent for corridors restored from a snapshot.
    template: Option<TemplateRef>,
    is_corridor: bool,
    connection: Option<Connection>,
    template_instance: TemplateInstance,
    position: GridPosition,
    doors: Option<Vec<DoorInstance>>,
    /// Already positioned; never add `position` to it.
    outline: Polygon2D,
    state: RoomState,
}

impl RoomInstance {
    pub fn new(
        template: Option<TemplateRef>,
        is_corridor: bool,
        connection: Option<Connection>,
        template_instance: TemplateInstance,
        position: GridPosition,
        outline: Polygon2D,
    ) -> Result<Self, LayoutError> {
        if is_corridor != connection.is_some() {
            return Err(LayoutError::InvalidConfiguration { is_corridor });
        }
        Ok(Self {
            template,
            is_corridor,
            connection,
            template_instance,
            position,
            doors: None,
            outline,
            state: RoomState::default(),
        })
    }

    pub fn room(
        template: TemplateRef,
        template_instance: TemplateInstance,
        position: GridPosition,
        outline: Polygon2D,
    ) -> Self {
        Self {
            template: Some(template),
            is_corridor: false,
            connection: None,
            template_instance,
            position,
            doors: None,
            outline,
            state: RoomState::default(),
        }
    }

    pub fn corridor(
        connection: Connection,
        template_instance: TemplateInstance,
        position: GridPosition,
        outline: Polygon2D,
    ) -> Self {
        Self {
            template: None,
            is_corridor: true,
            connection: Some(connection),
            template_instance,
            position,
            doors: None,
            outline,
            state: RoomState::default(),
        }
    }

    /// Assign the door list. Doors are resolved in one pass after layout, so
    /// a second assignment means the generator ran twice over the same room.
    pub fn set_doors(&mut self, doors: Vec<DoorInstance>) -> Result<(), LayoutError> {
        if self.doors.is_some() {
            return Err(LayoutError::AlreadyInitialized);
        }
        self.doors = Some(doors);
        Ok(())
    }

    pub fn template(&self) -> Option<&TemplateRef> {
        self.template.as_ref()
    }

    pub fn is_corridor(&self) -> bool {
        self.is_corridor
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn template_instance(&self) -> &TemplateInstance {
        &self.template_instance
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn doors(&self) -> Option<&[DoorInstance]> {
        self.doors.as_deref()
    }

    pub fn has_doors(&self) -> bool {
        self.doors.is_some()
    }

    pub fn outline(&self) -> &Polygon2D {
        &self.outline
    }

    pub fn world_tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.template_instance.world_tiles(self.position)
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RoomState {
        &mut self.state
    }

    pub fn phase(&self) -> RoomPhase {
        self.state.phase()
    }

    pub fn lock_doors(&mut self) -> Result<(), LayoutError> {
        if self.doors.is_none() {
            return Err(LayoutError::DoorsNotSet);
        }
        self.state.doors_locked = true;
        Ok(())
    }

    pub fn unlock_doors(&mut self) -> Result<(), LayoutError> {
        if self.doors.is_none() {
            return Err(LayoutError::DoorsNotSet);
        }
        self.state.doors_locked = false;
        Ok(())
    }

    /// Whether the invariants that construction enforces still hold. Used to
    /// vet rooms that arrive through deserialization.
    pub fn is_consistent(&self) -> bool {
        self.is_corridor == self.connection.is_some() && self.state.spawn_bounds().is_valid()
    }

    /// Drop template references that cannot be persisted for on-the-fly rooms.
    pub(crate) fn strip_corridor_template(&mut self) {
        if self.is_corridor {
            self.template = None;
            self.template_instance.forget_source();
        }
    }
}

impl ActorOverlapHandler for RoomInstance {
    fn on_actor_enter(&mut self, kind: ActorKind) -> OverlapOutcome {
        self.state.on_actor_enter(kind)
    }

    fn on_actor_exit(&mut self, kind: ActorKind, census: &dyn EnemyCensus) -> OverlapOutcome {
        self.state.on_actor_exit(kind, census)
    }
}
