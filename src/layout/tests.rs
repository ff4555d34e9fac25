//! Layout domain: unit tests for room instances, state transitions, and generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{
    ActorKind, ActorOverlapHandler, ClearPolicy, Connection, DEFAULT_MAX_ENEMY_SPAWNS,
    DEFAULT_MIN_ENEMY_SPAWNS, Direction, DoorInstance, DoorLine, DungeonLayout,
    GenerationSettings, GridPosition, LayoutError, LayoutSnapshot, LevelGraph, NodeBinding,
    NodeId, OverlapOutcome, Point2D, Polygon2D, RoomId, RoomInstance, RoomPhase, SpawnBounds,
    TemplateInstance, TemplateRef, generate_layout,
};
use crate::content::TemplateDef;

fn plain_room() -> RoomInstance {
    RoomInstance::room(
        TemplateRef::new("T"),
        TemplateInstance::filled(Some(TemplateRef::new("T")), 4, 4),
        GridPosition::ZERO,
        Polygon2D::empty(),
    )
}

fn corridor(connection: Connection) -> RoomInstance {
    RoomInstance::corridor(
        connection,
        TemplateInstance::filled(None, 3, 6),
        GridPosition::new(10, 0, 0),
        Polygon2D::rectangle(Point2D::new(10, 0), Point2D::new(13, 6)),
    )
}

fn templates() -> Vec<TemplateDef> {
    vec![
        TemplateDef::new("hall", 20, 14),
        TemplateDef::new("vault", 12, 12),
    ]
}

fn chain_layout(count: u32, seed: u64) -> DungeonLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_layout(
        &LevelGraph::chain(count),
        &templates(),
        &GenerationSettings::default(),
        &mut rng,
    )
    .expect("short chains always fit the grid")
}

// ----------------------------------------------------------------------------
// Construction
// ----------------------------------------------------------------------------

#[test]
fn test_corridor_flag_requires_connection() {
    let connection = Connection::new(NodeId(0), NodeId(1));

    let err = RoomInstance::new(
        None,
        true,
        None,
        TemplateInstance::default(),
        GridPosition::ZERO,
        Polygon2D::empty(),
    )
    .unwrap_err();
    assert_eq!(err, LayoutError::InvalidConfiguration { is_corridor: true });

    let err = RoomInstance::new(
        Some(TemplateRef::new("T")),
        false,
        Some(connection),
        TemplateInstance::default(),
        GridPosition::ZERO,
        Polygon2D::empty(),
    )
    .unwrap_err();
    assert_eq!(err, LayoutError::InvalidConfiguration { is_corridor: false });

    let room = RoomInstance::new(
        None,
        true,
        Some(connection),
        TemplateInstance::default(),
        GridPosition::ZERO,
        Polygon2D::empty(),
    )
    .unwrap();
    assert!(room.is_corridor());
    assert!(room.is_consistent());
}

#[test]
fn test_corridor_without_template() {
    let connection = Connection::new(NodeId(3), NodeId(4));
    let room = corridor(connection);

    assert!(room.is_corridor());
    assert_eq!(room.connection(), Some(&connection));
    assert!(room.template().is_none());
    assert!(room.template_instance().source().is_none());
    assert!(!room.has_doors());
    assert_eq!(room.phase(), RoomPhase::Idle);
}

#[test]
fn test_new_room_defaults() {
    let room = plain_room();
    let state = room.state();

    assert!(!room.is_corridor());
    assert!(room.connection().is_none());
    assert_eq!(room.template().map(|t| t.id()), Some("T"));
    assert!(!state.enemy_present);
    assert!(!state.player_present);
    assert!(!state.doors_locked);
    assert!(!state.defeated);
    assert!(state.enemy_spawning_enabled);
    assert_eq!(state.spawn_bounds().min(), DEFAULT_MIN_ENEMY_SPAWNS);
    assert_eq!(state.spawn_bounds().max(), DEFAULT_MAX_ENEMY_SPAWNS);
    assert_eq!(state.clear_policy(), ClearPolicy::AnyEnemyExit);
}

#[test]
fn test_world_tiles_are_offset_by_position() {
    let room = RoomInstance::room(
        TemplateRef::new("T"),
        TemplateInstance::filled(None, 2, 1),
        GridPosition::new(5, 7, 0),
        Polygon2D::rectangle(Point2D::new(5, 7), Point2D::new(7, 8)),
    );
    let tiles: Vec<_> = room.world_tiles().collect();
    assert_eq!(
        tiles,
        vec![GridPosition::new(5, 7, 0), GridPosition::new(6, 7, 0)]
    );
}

// ----------------------------------------------------------------------------
// Doors
// ----------------------------------------------------------------------------

#[test]
fn test_set_doors_twice_is_rejected() {
    let mut room = plain_room();
    let door = DoorInstance::new(
        DoorLine::new(Point2D::new(0, 0), Point2D::new(3, 0)),
        Direction::Down,
        RoomId(1),
    );

    room.set_doors(vec![door]).unwrap();
    assert_eq!(room.set_doors(Vec::new()), Err(LayoutError::AlreadyInitialized));
    // The first assignment survives.
    assert_eq!(room.doors(), Some(&[door][..]));
}

#[test]
fn test_empty_door_list_counts_as_set() {
    let mut room = plain_room();
    room.set_doors(Vec::new()).unwrap();
    assert!(room.has_doors());
    assert_eq!(room.doors().map(|d| d.len()), Some(0));
    assert_eq!(room.set_doors(Vec::new()), Err(LayoutError::AlreadyInitialized));
}

#[test]
fn test_locking_requires_doors() {
    let mut room = plain_room();
    assert_eq!(room.lock_doors(), Err(LayoutError::DoorsNotSet));
    assert!(!room.state().doors_locked);

    room.set_doors(Vec::new()).unwrap();
    room.lock_doors().unwrap();
    assert!(room.state().doors_locked);
    room.unlock_doors().unwrap();
    assert!(!room.state().doors_locked);
}

#[test]
fn test_door_orientation() {
    let line = DoorLine::new(Point2D::new(0, 4), Point2D::new(3, 4));
    assert_eq!(line.length(), 3);
    assert!(DoorInstance::new(line, Direction::Up, RoomId(0)).is_horizontal());
    assert!(!DoorInstance::new(line, Direction::Left, RoomId(0)).is_horizontal());
}

// ----------------------------------------------------------------------------
// Occupancy state machine
// ----------------------------------------------------------------------------

#[test]
fn test_player_enter_fires_every_time() {
    let mut room = plain_room();
    assert_eq!(
        room.on_actor_enter(ActorKind::Player),
        OverlapOutcome::PlayerEntered
    );
    assert!(room.state().player_present);
    assert_eq!(
        room.on_actor_enter(ActorKind::Player),
        OverlapOutcome::PlayerEntered
    );
    assert!(room.state().player_present);

    assert_eq!(room.on_actor_exit(ActorKind::Player, &0usize), OverlapOutcome::Quiet);
    assert!(!room.state().player_present);
}

#[test]
fn test_any_enemy_exit_defeats_room() {
    let mut room = plain_room();
    let _ = room.on_actor_enter(ActorKind::Enemy);
    assert!(room.state().enemy_present);

    // Two enemies are still alive, but the room is defeated anyway.
    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &2usize), OverlapOutcome::Defeated);
    assert!(room.state().enemy_present);
    assert!(room.state().defeated);

    // Already defeated: later exits stay quiet.
    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &1usize), OverlapOutcome::Quiet);
    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &0usize), OverlapOutcome::Quiet);
    assert!(!room.state().enemy_present);
    assert!(room.state().defeated);
}

#[test]
fn test_last_enemy_exit_policy() {
    let mut room = plain_room();
    room.state_mut().set_clear_policy(ClearPolicy::LastEnemyExit);
    let _ = room.on_actor_enter(ActorKind::Enemy);

    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &2usize), OverlapOutcome::Quiet);
    assert!(room.state().enemy_present);
    assert!(!room.state().defeated);

    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &0usize), OverlapOutcome::Defeated);
    assert!(!room.state().enemy_present);
    assert!(room.state().defeated);
}

#[test]
fn test_stray_exit_is_unconditional() {
    let mut room = plain_room();
    // No matching enter: the exit still writes its flags.
    let _ = room.on_actor_exit(ActorKind::Player, &0usize);
    assert!(!room.state().player_present);
    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &0usize), OverlapOutcome::Defeated);
    assert!(room.state().defeated);
}

#[test]
fn test_phase_follows_flags() {
    let mut room = plain_room();
    assert_eq!(room.phase(), RoomPhase::Idle);
    let _ = room.on_actor_enter(ActorKind::Enemy);
    assert_eq!(room.phase(), RoomPhase::Infested);
    let _ = room.on_actor_enter(ActorKind::Player);
    assert_eq!(room.phase(), RoomPhase::Engaged);
    let _ = room.on_actor_exit(ActorKind::Enemy, &0usize);
    assert_eq!(room.phase(), RoomPhase::Cleared);

    let mut other = plain_room();
    let _ = other.on_actor_enter(ActorKind::Player);
    assert_eq!(other.phase(), RoomPhase::Occupied);
}

#[test]
fn test_full_room_scenario() {
    let mut room = RoomInstance::room(
        TemplateRef::new("T"),
        TemplateInstance::default(),
        GridPosition::new(0, 0, 0),
        Polygon2D::empty(),
    );
    room.set_doors(Vec::new()).unwrap();

    assert_eq!(room.on_actor_enter(ActorKind::Enemy), OverlapOutcome::Quiet);
    assert!(room.state().enemy_present);

    assert_eq!(
        room.on_actor_enter(ActorKind::Player),
        OverlapOutcome::PlayerEntered
    );
    assert!(room.state().player_present);

    assert_eq!(room.on_actor_exit(ActorKind::Enemy, &0usize), OverlapOutcome::Defeated);
    assert!(!room.state().enemy_present);
    assert!(room.state().defeated);
}

// ----------------------------------------------------------------------------
// Spawn bounds
// ----------------------------------------------------------------------------

#[test]
fn test_spawn_bounds_validation() {
    assert_eq!(
        SpawnBounds::new(5, 2),
        Err(LayoutError::InvalidSpawnBounds { min: 5, max: 2 })
    );
    assert!(SpawnBounds::new(4, 4).is_ok());

    let mut room = plain_room();
    assert_eq!(
        room.state_mut().set_spawn_bounds(11, 1),
        Err(LayoutError::InvalidSpawnBounds { min: 11, max: 1 })
    );
    assert_eq!(room.state().spawn_bounds(), SpawnBounds::default());

    room.state_mut().set_spawn_bounds(0, 2).unwrap();
    assert_eq!(room.state().spawn_bounds().max(), 2);
}

// ----------------------------------------------------------------------------
// Serialization
// ----------------------------------------------------------------------------

#[test]
fn test_room_json_round_trip() {
    let mut room = corridor(Connection::new(NodeId(0), NodeId(1)));
    room.set_doors(vec![DoorInstance::new(
        DoorLine::new(Point2D::new(10, 0), Point2D::new(13, 0)),
        Direction::Down,
        RoomId(0),
    )])
    .unwrap();
    let _ = room.on_actor_enter(ActorKind::Player);

    let json = serde_json::to_string(&room).unwrap();
    let restored: RoomInstance = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, room);
    assert!(restored.template().is_none());
}

#[test]
fn test_room_without_clear_policy_field_deserializes() {
    let room = plain_room();
    let mut value = serde_json::to_value(&room).unwrap();
    value["state"]
        .as_object_mut()
        .unwrap()
        .remove("clear_policy");

    let restored: RoomInstance = serde_json::from_value(value).unwrap();
    assert_eq!(restored.state().clear_policy(), ClearPolicy::AnyEnemyExit);
}

#[test]
fn test_snapshot_drops_corridor_templates() {
    let mut layout = DungeonLayout::new();
    let room_id = layout.push(plain_room());
    let corridor_id = layout.push(
        RoomInstance::new(
            Some(TemplateRef::new("strip")),
            true,
            Some(Connection::new(NodeId(0), NodeId(1))),
            TemplateInstance::filled(Some(TemplateRef::new("strip")), 3, 3),
            GridPosition::ZERO,
            Polygon2D::empty(),
        )
        .unwrap(),
    );
    layout.bind_node(NodeId(0), room_id);

    let snapshot = layout.snapshot();
    let ron = snapshot.to_ron().unwrap();
    let restored = DungeonLayout::from_snapshot(LayoutSnapshot::from_ron(&ron).unwrap()).unwrap();

    let original_corridor = layout.get(corridor_id).unwrap();
    let restored_corridor = restored.get(corridor_id).unwrap();
    assert!(original_corridor.template().is_some());
    assert!(restored_corridor.template().is_none());
    assert!(restored_corridor.template_instance().source().is_none());
    assert_eq!(restored_corridor.connection(), original_corridor.connection());
    assert_eq!(restored_corridor.state(), original_corridor.state());
    assert_eq!(restored.get(room_id), layout.get(room_id));
    assert_eq!(restored.room_for_node(NodeId(0)), Some(room_id));
}

#[test]
fn test_generated_layout_survives_ron_and_json() {
    let layout = chain_layout(4, 7);
    let snapshot = layout.snapshot();

    let from_ron = LayoutSnapshot::from_ron(&snapshot.to_ron().unwrap()).unwrap();
    assert_eq!(DungeonLayout::from_snapshot(from_ron).unwrap(), layout);

    let from_json = LayoutSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(DungeonLayout::from_snapshot(from_json).unwrap(), layout);
}

#[test]
fn test_snapshot_rejects_dangling_door() {
    let mut room = plain_room();
    room.set_doors(vec![DoorInstance::new(
        DoorLine::new(Point2D::new(0, 0), Point2D::new(3, 0)),
        Direction::Up,
        RoomId(9),
    )])
    .unwrap();
    let mut layout = DungeonLayout::new();
    layout.push(room);

    assert_eq!(
        DungeonLayout::from_snapshot(layout.snapshot()),
        Err(LayoutError::UnknownRoom(RoomId(9)))
    );
}

#[test]
fn test_snapshot_rejects_dangling_node_binding() {
    let mut layout = DungeonLayout::new();
    let id = layout.push(plain_room());
    layout.bind_node(NodeId(0), id);

    let mut snapshot = layout.snapshot();
    snapshot.nodes.push(NodeBinding {
        node: NodeId(1),
        room: RoomId(4),
    });
    assert_eq!(
        DungeonLayout::from_snapshot(snapshot),
        Err(LayoutError::UnknownRoom(RoomId(4)))
    );
}

#[test]
fn test_snapshot_rejects_broken_rooms() {
    let mut layout = DungeonLayout::new();
    layout.push(plain_room());
    let mut value = serde_json::to_value(layout.snapshot()).unwrap();
    value["rooms"][0]["is_corridor"] = serde_json::Value::Bool(true);
    let snapshot: LayoutSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(
        DungeonLayout::from_snapshot(snapshot),
        Err(LayoutError::InvalidConfiguration { is_corridor: true })
    );

    let mut value = serde_json::to_value(layout.snapshot()).unwrap();
    value["rooms"][0]["state"]["spawn_bounds"]["min"] = serde_json::json!(20);
    let snapshot: LayoutSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(
        DungeonLayout::from_snapshot(snapshot),
        Err(LayoutError::InvalidSpawnBounds { min: 20, max: 10 })
    );
}

// ----------------------------------------------------------------------------
// Graph
// ----------------------------------------------------------------------------

#[test]
fn test_connect_deduplicates() {
    let mut graph = LevelGraph::new();
    let a = graph.add_room("a");
    let b = graph.add_room("b");
    graph.connect(a, b);
    graph.connect(b, a);
    assert_eq!(graph.connections().len(), 1);
    assert_eq!(graph.neighbors(a).collect::<Vec<_>>(), vec![b]);
    assert_eq!(graph.neighbors(b).collect::<Vec<_>>(), vec![a]);
}

#[test]
fn test_branching_graph_is_a_tree() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let graph = LevelGraph::branching(12, &mut rng);
    assert_eq!(graph.nodes().len(), 12);
    assert_eq!(graph.connections().len(), 11);
    for node in graph.nodes() {
        assert!(graph.neighbors(node.id).count() <= 3);
    }
}

// ----------------------------------------------------------------------------
// Generation
// ----------------------------------------------------------------------------

#[test]
fn test_chain_generation() {
    let layout = chain_layout(4, 1);

    assert_eq!(layout.rooms().count(), 4);
    assert_eq!(layout.corridors().count(), 3);
    assert!(layout.all_doors_set());
    for (_, room) in layout.iter() {
        assert!(room.is_consistent());
        assert_eq!(room.is_corridor(), room.connection().is_some());
    }

    for i in 0..4 {
        let id = layout.room_for_node(NodeId(i)).unwrap();
        let room = layout.get(id).unwrap();
        let expected_doors = if i == 0 || i == 3 { 1 } else { 2 };
        assert_eq!(room.doors().unwrap().len(), expected_doors);
    }

    for (id, corridor) in layout.corridors() {
        assert!(corridor.template().is_none());
        assert!(!corridor.state().enemy_spawning_enabled);
        let connection = corridor.connection().unwrap();
        let mut ends = layout.neighbors(id);
        ends.sort();
        let mut expected = vec![
            layout.room_for_node(connection.from).unwrap(),
            layout.room_for_node(connection.to).unwrap(),
        ];
        expected.sort();
        assert_eq!(ends, expected);
    }
}

#[test]
fn test_generated_rooms_do_not_overlap() {
    let layout = chain_layout(5, 3);
    let rooms: Vec<_> = layout.iter().map(|(_, r)| r).collect();
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            assert!(!a.outline().overlaps(b.outline()));
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(chain_layout(5, 99), chain_layout(5, 99));
}

#[test]
fn test_room_at_finds_floor() {
    let layout = chain_layout(2, 5);
    let start = layout.room_for_node(NodeId(0)).unwrap();
    let tile = layout.get(start).unwrap().position().xy();
    assert_eq!(layout.room_at(tile), Some(start));
    assert_eq!(layout.room_at(Point2D::new(-500, -500)), None);
}

#[test]
fn test_generation_applies_template_settings() {
    let mut quiet = TemplateDef::new("quiet", 10, 10);
    quiet.enemy_spawning = false;
    quiet.min_enemy_spawns = 1;
    quiet.max_enemy_spawns = 2;
    let settings = GenerationSettings {
        clear_policy: ClearPolicy::LastEnemyExit,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let layout = generate_layout(&LevelGraph::chain(2), &[quiet], &settings, &mut rng).unwrap();

    for (_, room) in layout.rooms() {
        assert!(!room.state().enemy_spawning_enabled);
        assert_eq!(room.state().spawn_bounds(), SpawnBounds::new(1, 2).unwrap());
        assert_eq!(room.state().clear_policy(), ClearPolicy::LastEnemyExit);
    }
}

#[test]
fn test_generation_errors() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let settings = GenerationSettings::default();

    assert_eq!(
        generate_layout(&LevelGraph::new(), &templates(), &settings, &mut rng),
        Err(LayoutError::EmptyGraph)
    );
    assert_eq!(
        generate_layout(&LevelGraph::chain(2), &[], &settings, &mut rng),
        Err(LayoutError::NoTemplates)
    );
    assert_eq!(
        generate_layout(
            &LevelGraph::chain(2),
            &[TemplateDef::new("huge", 40, 40)],
            &settings,
            &mut rng
        ),
        Err(LayoutError::PlacementFailed(NodeId(0)))
    );

    let missing_start = GenerationSettings {
        start_template: Some("nope".to_string()),
        ..Default::default()
    };
    assert_eq!(
        generate_layout(&LevelGraph::chain(2), &templates(), &missing_start, &mut rng),
        Err(LayoutError::UnknownTemplate("nope".to_string()))
    );

    // An edge between nodes that were never added cannot be placed.
    let mut dangling = LevelGraph::chain(2);
    dangling.connect(NodeId(7), NodeId(8));
    assert_eq!(
        generate_layout(&dangling, &templates(), &settings, &mut rng),
        Err(LayoutError::PlacementFailed(NodeId(7)))
    );
}

#[test]
fn test_start_template_is_used() {
    let settings = GenerationSettings {
        start_template: Some("vault".to_string()),
        ..Default::default()
    };
    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout =
            generate_layout(&LevelGraph::chain(3), &templates(), &settings, &mut rng).unwrap();
        let start = layout.room_for_node(NodeId(0)).unwrap();
        assert_eq!(
            layout.get(start).and_then(|r| r.template()).map(|t| t.id()),
            Some("vault")
        );
    }
}

// ----------------------------------------------------------------------------
// Geometry
// ----------------------------------------------------------------------------

#[test]
fn test_direction_opposites() {
    for direction in Direction::ALL {
        assert_eq!(direction.opposite().opposite(), direction);
        let step = direction.step();
        let back = direction.opposite().step();
        assert_eq!((step.x + back.x, step.y + back.y), (0, 0));
    }
}

#[test]
fn test_polygon_bounds_and_center() {
    let poly = Polygon2D::rectangle(Point2D::new(2, 4), Point2D::new(6, 10));
    assert_eq!(poly.bounds(), Some((Point2D::new(2, 4), Point2D::new(6, 10))));
    let center = poly.center().unwrap();
    assert_eq!((center.x, center.y), (4.0, 7.0));
    assert!(Polygon2D::empty().bounds().is_none());
    assert!(!poly.overlaps(&Polygon2D::rectangle(
        Point2D::new(6, 4),
        Point2D::new(9, 10)
    )));
}
