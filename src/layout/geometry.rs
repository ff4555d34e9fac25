//! Layout domain: grid coordinates, outlines, and facing directions.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer offset of a room within the generated layout.
///
/// Adding a template-relative tile coordinate to this position addresses the
/// combined tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPosition {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset a template-relative tile into layout space.
    pub fn offset_tile(self, tile: Point2D) -> GridPosition {
        GridPosition {
            x: self.x + tile.x,
            y: self.y + tile.y,
            z: self.z,
        }
    }

    pub fn xy(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

impl From<GridPosition> for IVec3 {
    fn from(p: GridPosition) -> Self {
        IVec3::new(p.x, p.y, p.z)
    }
}

impl From<IVec3> for GridPosition {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, by: Point2D) -> Point2D {
        Point2D::new(self.x + by.x, self.y + by.y)
    }
}

/// Outline of a room's playable area in layout space.
///
/// Outlines are stored already positioned: consumers must not add the room
/// position to these points again.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon2D {
    points: Vec<Point2D>,
}

impl Polygon2D {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangle spanning `min..=max`, wound counter-clockwise.
    pub fn rectangle(min: Point2D, max: Point2D) -> Self {
        Self::new(vec![
            min,
            Point2D::new(max.x, min.y),
            max,
            Point2D::new(min.x, max.y),
        ])
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of this outline moved by `offset`. Only used while an outline is
    /// being positioned during generation.
    pub fn translated(&self, offset: Point2D) -> Polygon2D {
        Polygon2D::new(self.points.iter().map(|p| p.translated(offset)).collect())
    }

    /// Inclusive bounding box, or `None` for an empty outline.
    pub fn bounds(&self) -> Option<(Point2D, Point2D)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (
                Point2D::new(min.x.min(p.x), min.y.min(p.y)),
                Point2D::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Center of the bounding box in tile units.
    pub fn center(&self) -> Option<Vec2> {
        let (min, max) = self.bounds()?;
        Some(Vec2::new(
            (min.x + max.x) as f32 * 0.5,
            (min.y + max.y) as f32 * 0.5,
        ))
    }

    /// Whether two outlines' bounding boxes overlap. Touching edges do not count.
    pub fn overlaps(&self, other: &Polygon2D) -> bool {
        let (Some((a_min, a_max)), Some((b_min, b_max))) = (self.bounds(), other.bounds()) else {
            return false;
        };
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step on the grid.
    pub fn step(self) -> Point2D {
        match self {
            Direction::Up => Point2D::new(0, 1),
            Direction::Down => Point2D::new(0, -1),
            Direction::Left => Point2D::new(-1, 0),
            Direction::Right => Point2D::new(1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}
