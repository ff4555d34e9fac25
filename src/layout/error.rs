//! Layout domain: generation and initialization failures.

use crate::layout::graph::NodeId;
use crate::layout::room::RoomId;

/// Errors raised while building or initializing a layout.
///
/// These indicate a corrupted layout, not a gameplay condition: they abort the
/// generation pass and are reported to the developer log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Corridor flag and connection presence disagree.
    InvalidConfiguration { is_corridor: bool },
    /// Doors were assigned to a room that already had them.
    AlreadyInitialized,
    /// A door-dependent operation ran before doors were assigned.
    DoorsNotSet,
    InvalidSpawnBounds { min: u32, max: u32 },
    UnknownRoom(RoomId),
    UnknownTemplate(String),
    EmptyGraph,
    NoTemplates,
    PlacementFailed(NodeId),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::InvalidConfiguration { is_corridor: true } => {
                write!(f, "corridor room instance has no connection")
            }
            LayoutError::InvalidConfiguration { is_corridor: false } => {
                write!(f, "non-corridor room instance was given a connection")
            }
            LayoutError::AlreadyInitialized => write!(f, "doors were already set"),
            LayoutError::DoorsNotSet => write!(f, "doors have not been set"),
            LayoutError::InvalidSpawnBounds { min, max } => {
                write!(f, "invalid enemy spawn bounds: min {min} > max {max}")
            }
            LayoutError::UnknownRoom(id) => write!(f, "unknown room {id}"),
            LayoutError::UnknownTemplate(id) => write!(f, "unknown room template '{id}'"),
            LayoutError::EmptyGraph => write!(f, "level graph has no rooms"),
            LayoutError::NoTemplates => write!(f, "no room templates to choose from"),
            LayoutError::PlacementFailed(node) => write!(f, "could not place {node}"),
        }
    }
}

impl std::error::Error for LayoutError {}
