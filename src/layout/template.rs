//! Layout domain: template references and positioned template copies.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{GridPosition, Point2D};

/// Identifies the authored room template a room instance was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateRef(pub String);

impl TemplateRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The concrete copy of a template's geometry owned by one room instance.
///
/// Tiles are relative to the template origin; combine them with the room's
/// position to reach the combined tile grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateInstance {
    source: Option<TemplateRef>,
    tiles: Vec<Point2D>,
}

impl TemplateInstance {
    pub fn new(source: Option<TemplateRef>, tiles: Vec<Point2D>) -> Self {
        Self { source, tiles }
    }

    /// Solid `width` x `height` block of floor tiles starting at the origin.
    pub fn filled(source: Option<TemplateRef>, width: i32, height: i32) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Point2D::new(x, y)))
            .collect();
        Self::new(source, tiles)
    }

    pub fn source(&self) -> Option<&TemplateRef> {
        self.source.as_ref()
    }

    pub fn tiles(&self) -> &[Point2D] {
        &self.tiles
    }

    pub fn world_tiles(&self, position: GridPosition) -> impl Iterator<Item = GridPosition> + '_ {
        self.tiles.iter().map(move |t| position.offset_tile(*t))
    }

    pub(crate) fn forget_source(&mut self) {
        self.source = None;
    }
}
