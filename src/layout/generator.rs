//! Layout domain: turns a level graph into positioned room instances.
//!
//! Rooms sit centered in cells of a coarse grid. Every graph connection
//! becomes a straight corridor room between two neighboring cells, and doors
//! are resolved for all rooms in a single pass once placement is done.

use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, VecDeque};

use crate::content::TemplateDef;
use crate::layout::dungeon::DungeonLayout;
use crate::layout::error::LayoutError;
use crate::layout::geometry::{Direction, GridPosition, Point2D, Polygon2D};
use crate::layout::graph::{Connection, LevelGraph, NodeId};
use crate::layout::room::{DoorInstance, DoorLine, RoomId, RoomInstance};
use crate::layout::state::ClearPolicy;
use crate::layout::template::{TemplateInstance, TemplateRef};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Side of one placement cell, in tiles.
    pub cell_size: i32,
    pub corridor_width: i32,
    pub clear_policy: ClearPolicy,
    /// Template forced onto the first graph node.
    pub start_template: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            cell_size: 32,
            corridor_width: 3,
            clear_policy: ClearPolicy::default(),
            start_template: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    cell: (i32, i32),
    room: RoomId,
    min: Point2D,
    size: Point2D,
}

struct CorridorGeometry {
    min: Point2D,
    size: Point2D,
    /// Door on the `from` room and the corridor end next to it.
    door_from: DoorLine,
    door_to: DoorLine,
}

pub fn generate_layout<R: Rng>(
    graph: &LevelGraph,
    templates: &[TemplateDef],
    settings: &GenerationSettings,
    rng: &mut R,
) -> Result<DungeonLayout, LayoutError> {
    let Some(root) = graph.nodes().first().map(|n| n.id) else {
        return Err(LayoutError::EmptyGraph);
    };
    if templates.is_empty() {
        return Err(LayoutError::NoTemplates);
    }

    let mut layout = DungeonLayout::new();
    let mut cells: HashMap<(i32, i32), NodeId> = HashMap::new();
    let mut placed: HashMap<NodeId, Placement> = HashMap::new();

    let start = match &settings.start_template {
        Some(id) => templates
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| LayoutError::UnknownTemplate(id.clone()))?,
        None => pick_template(templates, rng),
    };
    let placement = place_room(&mut layout, root, (0, 0), start, settings)?;
    cells.insert((0, 0), root);
    placed.insert(root, placement);

    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        let cell = placed[&node].cell;
        let mut pending: Vec<NodeId> = graph
            .neighbors(node)
            .filter(|n| !placed.contains_key(n))
            .collect();
        pending.sort();
        pending.dedup();

        for next in pending {
            let mut directions = Direction::ALL;
            directions.shuffle(rng);
            let target = directions
                .iter()
                .map(|d| (cell.0 + d.step().x, cell.1 + d.step().y))
                .find(|c| !cells.contains_key(c))
                .ok_or(LayoutError::PlacementFailed(next))?;

            let template = pick_template(templates, rng);
            let placement = place_room(&mut layout, next, target, template, settings)?;
            cells.insert(target, next);
            placed.insert(next, placement);
            queue.push_back(next);
        }
    }

    if let Some(orphan) = graph.nodes().iter().find(|n| !placed.contains_key(&n.id)) {
        return Err(LayoutError::PlacementFailed(orphan.id));
    }

    let mut doors: HashMap<RoomId, Vec<DoorInstance>> = HashMap::new();
    for connection in graph.connections() {
        let from = *placed
            .get(&connection.from)
            .ok_or(LayoutError::PlacementFailed(connection.from))?;
        let to = *placed
            .get(&connection.to)
            .ok_or(LayoutError::PlacementFailed(connection.to))?;
        add_corridor(&mut layout, &mut doors, *connection, from, to, settings)?;
    }

    for (id, room) in layout.iter_mut() {
        room.set_doors(doors.remove(&id).unwrap_or_default())?;
    }

    info!(
        "[LAYOUT] Generated {} rooms and {} corridors",
        layout.rooms().count(),
        layout.corridors().count()
    );
    Ok(layout)
}

fn pick_template<'a, R: Rng>(templates: &'a [TemplateDef], rng: &mut R) -> &'a TemplateDef {
    &templates[rng.random_range(0..templates.len())]
}

fn place_room(
    layout: &mut DungeonLayout,
    node: NodeId,
    cell: (i32, i32),
    template: &TemplateDef,
    settings: &GenerationSettings,
) -> Result<Placement, LayoutError> {
    let cs = settings.cell_size;
    // Leave room for a corridor on every side and a door inside every wall.
    let fits = |side: i32| side <= cs - 2 && side >= settings.corridor_width + 2;
    if !fits(template.width) || !fits(template.height) {
        return Err(LayoutError::PlacementFailed(node));
    }

    let min = Point2D::new(
        cell.0 * cs + (cs - template.width) / 2,
        cell.1 * cs + (cs - template.height) / 2,
    );
    let size = Point2D::new(template.width, template.height);
    let template_ref = TemplateRef::new(template.id.clone());
    let outline = Polygon2D::rectangle(Point2D::new(0, 0), size).translated(min);

    let mut room = RoomInstance::room(
        template_ref.clone(),
        TemplateInstance::filled(Some(template_ref), size.x, size.y),
        GridPosition::new(min.x, min.y, 0),
        outline,
    );
    let state = room.state_mut();
    state.set_spawn_bounds(template.min_enemy_spawns, template.max_enemy_spawns)?;
    state.enemy_spawning_enabled = template.enemy_spawning;
    state.set_clear_policy(settings.clear_policy);

    let id = layout.push(room);
    layout.bind_node(node, id);
    debug!(
        "[LAYOUT] Placed {} as {} using '{}' at cell {:?}",
        node, id, template.id, cell
    );
    Ok(Placement {
        cell,
        room: id,
        min,
        size,
    })
}

fn add_corridor(
    layout: &mut DungeonLayout,
    doors: &mut HashMap<RoomId, Vec<DoorInstance>>,
    connection: Connection,
    from: Placement,
    to: Placement,
    settings: &GenerationSettings,
) -> Result<(), LayoutError> {
    let delta = (to.cell.0 - from.cell.0, to.cell.1 - from.cell.1);
    let Some(direction) = Direction::ALL
        .into_iter()
        .find(|d| (d.step().x, d.step().y) == delta)
    else {
        return Err(LayoutError::PlacementFailed(connection.to));
    };
    let geometry = corridor_between(&from, &to, direction, settings.corridor_width)
        .ok_or(LayoutError::PlacementFailed(connection.to))?;

    let mut corridor = RoomInstance::corridor(
        connection,
        TemplateInstance::filled(None, geometry.size.x, geometry.size.y),
        GridPosition::new(geometry.min.x, geometry.min.y, 0),
        Polygon2D::rectangle(Point2D::new(0, 0), geometry.size).translated(geometry.min),
    );
    corridor.state_mut().enemy_spawning_enabled = false;
    corridor.state_mut().set_clear_policy(settings.clear_policy);
    let corridor_id = layout.push(corridor);

    doors
        .entry(from.room)
        .or_default()
        .push(DoorInstance::new(geometry.door_from, direction, corridor_id));
    doors
        .entry(to.room)
        .or_default()
        .push(DoorInstance::new(
            geometry.door_to,
            direction.opposite(),
            corridor_id,
        ));
    doors.entry(corridor_id).or_default().extend([
        DoorInstance::new(geometry.door_from, direction.opposite(), from.room),
        DoorInstance::new(geometry.door_to, direction, to.room),
    ]);
    Ok(())
}

/// Straight strip between two rooms in adjacent cells, `direction` pointing
/// from `from` to `to`.
fn corridor_between(
    from: &Placement,
    to: &Placement,
    direction: Direction,
    width: i32,
) -> Option<CorridorGeometry> {
    // Normalize so `near` is the room with the smaller coordinate.
    let forward = matches!(direction, Direction::Right | Direction::Up);
    let (near, far) = if forward { (from, to) } else { (to, from) };

    let (min, size, door_near, door_far) = if direction.is_vertical() {
        let x0 = near.min.x + near.size.x / 2 - width / 2;
        let y0 = near.min.y + near.size.y;
        let y1 = far.min.y;
        (
            Point2D::new(x0, y0),
            Point2D::new(width, y1 - y0),
            DoorLine::new(Point2D::new(x0, y0), Point2D::new(x0 + width, y0)),
            DoorLine::new(Point2D::new(x0, y1), Point2D::new(x0 + width, y1)),
        )
    } else {
        let y0 = near.min.y + near.size.y / 2 - width / 2;
        let x0 = near.min.x + near.size.x;
        let x1 = far.min.x;
        (
            Point2D::new(x0, y0),
            Point2D::new(x1 - x0, width),
            DoorLine::new(Point2D::new(x0, y0), Point2D::new(x0, y0 + width)),
            DoorLine::new(Point2D::new(x1, y0), Point2D::new(x1, y0 + width)),
        )
    };
    if size.x <= 0 || size.y <= 0 {
        return None;
    }

    let (door_from, door_to) = if forward {
        (door_near, door_far)
    } else {
        (door_far, door_near)
    };
    Some(CorridorGeometry {
        min,
        size,
        door_from,
        door_to,
    })
}
