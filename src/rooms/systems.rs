//! Rooms domain: room triggers, overlap handling, and door locking.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::content::GameplayDefaults;
use crate::layout::{
    ActorKind, DoorInstance, DungeonLayout, OverlapOutcome, OverlapPhase, RoomId, RoomInstance,
    RoomPhase,
};
use crate::rooms::components::{
    Actor, DoorBlocker, Enemy, GameLayer, LayoutScoped, Player, RoomTrigger, SpawnEffect,
};
use crate::rooms::events::{ActorOverlapEvent, RoomChangedEvent, RoomClearedEvent};
use crate::rooms::registry::RoomController;

/// World-space center and size of a room's outline.
pub fn room_world_rect(room: &RoomInstance, tile_size: f32) -> Option<(Vec2, Vec2)> {
    let (min, max) = room.outline().bounds()?;
    let size = Vec2::new((max.x - min.x) as f32, (max.y - min.y) as f32) * tile_size;
    let center = room.outline().center()? * tile_size;
    Some((center, size))
}

/// World-space center and size of the barrier that closes a door.
pub fn door_blocker_rect(door: &DoorInstance, tile_size: f32) -> (Vec2, Vec2) {
    let from = Vec2::new(door.line.from.x as f32, door.line.from.y as f32);
    let to = Vec2::new(door.line.to.x as f32, door.line.to.y as f32);
    let length = door.line.length().max(1) as f32 * tile_size;
    let thickness = tile_size * 0.5;
    let size = if door.is_horizontal() {
        Vec2::new(length, thickness)
    } else {
        Vec2::new(thickness, length)
    };
    ((from + to) * 0.5 * tile_size, size)
}

pub(crate) fn spawn_room_triggers(
    mut commands: Commands,
    layout: Res<DungeonLayout>,
    defaults: Res<GameplayDefaults>,
) {
    let tile_size = defaults.layout.tile_size;
    let room_color = Color::srgb(0.22, 0.22, 0.28);
    let corridor_color = Color::srgb(0.16, 0.16, 0.2);

    for (id, room) in layout.iter() {
        let Some((center, size)) = room_world_rect(room, tile_size) else {
            warn!("[ROOM] {} has an empty outline, no trigger spawned", id);
            continue;
        };
        commands.spawn((
            RoomTrigger { room: id },
            LayoutScoped,
            Sprite {
                color: if room.is_corridor() {
                    corridor_color
                } else {
                    room_color
                },
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(center.x, center.y, -1.0),
            Collider::rectangle(size.x, size.y),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player, GameLayer::Enemy]),
        ));
    }

    info!("[ROOM] Spawned triggers for {} room instances", layout.len());
}

/// Room triggers each actor currently touches. A despawned actor can no
/// longer be queried, so its kind is kept here until its last contact ends.
#[derive(Resource, Debug, Default)]
pub struct ActorContacts {
    actors: HashMap<Entity, ActorContact>,
}

#[derive(Debug)]
struct ActorContact {
    kind: ActorKind,
    rooms: Vec<RoomId>,
}

impl ActorContacts {
    pub fn begin(&mut self, actor: Entity, kind: ActorKind, room: RoomId) {
        let contact = self.actors.entry(actor).or_insert(ActorContact {
            kind,
            rooms: Vec::new(),
        });
        contact.kind = kind;
        contact.rooms.push(room);
    }

    /// End one contact and resolve the actor's kind. `live` is the kind read
    /// from the actor itself, when it still exists.
    pub fn end(
        &mut self,
        actor: Entity,
        room: RoomId,
        live: Option<ActorKind>,
    ) -> Option<ActorKind> {
        let known = self.actors.get_mut(&actor).map(|contact| {
            if let Some(pos) = contact.rooms.iter().position(|r| *r == room) {
                contact.rooms.remove(pos);
            }
            (contact.kind, contact.rooms.is_empty())
        });
        if let Some((_, true)) = known {
            self.actors.remove(&actor);
        }
        live.or(known.map(|(kind, _)| kind))
    }

    /// Forget an actor entirely, returning the rooms it was still inside.
    pub fn release(&mut self, actor: Entity) -> Vec<RoomId> {
        self.actors
            .remove(&actor)
            .map(|contact| contact.rooms)
            .unwrap_or_default()
    }

    pub fn rooms_of(&self, actor: Entity) -> &[RoomId] {
        self.actors
            .get(&actor)
            .map(|contact| contact.rooms.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }
}

/// Enemies still alive, not counting the one that is leaving. The exiting
/// enemy may or may not have been despawned yet.
pub fn remaining_enemies(enemies: impl IntoIterator<Item = Entity>, exiting: Entity) -> usize {
    enemies.into_iter().filter(|e| *e != exiting).count()
}

/// Despawn an enemy and emit its exits for every room it was inside.
pub fn remove_enemy(
    commands: &mut Commands,
    contacts: &mut ActorContacts,
    overlaps: &mut MessageWriter<ActorOverlapEvent>,
    enemy: Entity,
) {
    for room in contacts.release(enemy) {
        overlaps.write(ActorOverlapEvent {
            room,
            actor: enemy,
            kind: ActorKind::Enemy,
            phase: OverlapPhase::Exit,
        });
    }
    commands.entity(enemy).despawn();
}

/// Translate physics contacts between room triggers and actors into overlap
/// events.
pub(crate) fn forward_room_collisions(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collision_end_events: MessageReader<CollisionEnd>,
    trigger_query: Query<&RoomTrigger>,
    actor_query: Query<&Actor>,
    mut contacts: ResMut<ActorContacts>,
    mut overlaps: MessageWriter<ActorOverlapEvent>,
) {
    for event in collision_start_events.read() {
        let Some((room, actor)) = split_trigger(event.collider1, event.collider2, &trigger_query)
        else {
            continue;
        };
        let Ok(Actor(kind)) = actor_query.get(actor) else {
            continue;
        };
        contacts.begin(actor, *kind, room);
        overlaps.write(ActorOverlapEvent {
            room,
            actor,
            kind: *kind,
            phase: OverlapPhase::Enter,
        });
    }

    for event in collision_end_events.read() {
        let Some((room, actor)) = split_trigger(event.collider1, event.collider2, &trigger_query)
        else {
            continue;
        };
        let live = actor_query.get(actor).ok().map(|Actor(kind)| *kind);
        let Some(kind) = contacts.end(actor, room, live) else {
            continue;
        };
        overlaps.write(ActorOverlapEvent {
            room,
            actor,
            kind,
            phase: OverlapPhase::Exit,
        });
    }
}

/// The player defeats a materialized enemy by touching it.
pub(crate) fn defeat_enemies_on_contact(
    mut commands: Commands,
    mut collision_start_events: MessageReader<CollisionStart>,
    player_query: Query<(), With<Player>>,
    enemy_query: Query<(), (With<Enemy>, Without<SpawnEffect>)>,
    mut contacts: ResMut<ActorContacts>,
    mut overlaps: MessageWriter<ActorOverlapEvent>,
) {
    let mut defeated = HashSet::new();
    for event in collision_start_events.read() {
        let (a, b) = (event.collider1, event.collider2);
        let enemy = if player_query.contains(a) {
            b
        } else if player_query.contains(b) {
            a
        } else {
            continue;
        };
        if enemy_query.contains(enemy) && defeated.insert(enemy) {
            remove_enemy(&mut commands, &mut contacts, &mut overlaps, enemy);
            debug!("[ROOM] Player defeated {:?}", enemy);
        }
    }
}

fn split_trigger(
    a: Entity,
    b: Entity,
    trigger_query: &Query<&RoomTrigger>,
) -> Option<(RoomId, Entity)> {
    if let Ok(trigger) = trigger_query.get(a) {
        Some((trigger.room, b))
    } else if let Ok(trigger) = trigger_query.get(b) {
        Some((trigger.room, a))
    } else {
        None
    }
}

pub(crate) fn apply_overlap_events(
    mut overlaps: MessageReader<ActorOverlapEvent>,
    mut layout: ResMut<DungeonLayout>,
    mut controller: ResMut<RoomController>,
    enemy_query: Query<Entity, With<Enemy>>,
    mut room_changed_events: MessageWriter<RoomChangedEvent>,
    mut room_cleared_events: MessageWriter<RoomClearedEvent>,
) {
    for event in overlaps.read() {
        let remaining = remaining_enemies(&enemy_query, event.actor);
        let report = match controller.handle_overlap(
            &mut layout,
            event.room,
            event.kind,
            event.phase,
            &remaining,
        ) {
            Ok(report) => report,
            Err(e) => {
                warn!("[ROOM] Dropped {:?} {:?} event: {}", event.kind, event.phase, e);
                continue;
            }
        };

        if report.notified {
            room_changed_events.write(RoomChangedEvent { room: event.room });
        }
        if report.outcome == OverlapOutcome::Defeated {
            room_cleared_events.write(RoomClearedEvent { room: event.room });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Lock,
    Unlock,
}

/// Engaged rooms close their doors; cleared rooms open them again.
pub fn door_action(room: &RoomInstance) -> Option<DoorAction> {
    match (room.phase(), room.state().doors_locked) {
        (RoomPhase::Engaged, false) => Some(DoorAction::Lock),
        (RoomPhase::Cleared, true) => Some(DoorAction::Unlock),
        _ => None,
    }
}

/// Lock an engaged room's doors and open them again once it is cleared.
pub(crate) fn lock_doors_on_engage(
    mut layout: ResMut<DungeonLayout>,
    defaults: Res<GameplayDefaults>,
) {
    if !defaults.rules.lock_on_engage {
        return;
    }

    // Only rooms whose doors move are borrowed mutably.
    let pending: Vec<(RoomId, DoorAction)> = layout
        .iter()
        .filter_map(|(id, room)| door_action(room).map(|action| (id, action)))
        .collect();

    for (id, action) in pending {
        let Some(room) = layout.get_mut(id) else {
            continue;
        };
        let result = match action {
            DoorAction::Lock => room.lock_doors(),
            DoorAction::Unlock => room.unlock_doors(),
        };
        match result {
            Ok(()) => info!("[ROOM] Doors of {} {:?}", id, action),
            Err(e) => warn!("[ROOM] Cannot change doors of {}: {}", id, e),
        }
    }
}

/// Keep one solid blocker per door of every locked room.
pub(crate) fn sync_door_blockers(
    mut commands: Commands,
    layout: Res<DungeonLayout>,
    defaults: Res<GameplayDefaults>,
    blocker_query: Query<(Entity, &DoorBlocker)>,
) {
    if !layout.is_changed() {
        return;
    }

    let mut blocked: HashSet<RoomId> = HashSet::new();
    for (entity, blocker) in &blocker_query {
        let locked = layout
            .get(blocker.room)
            .is_some_and(|r| r.state().doors_locked);
        if locked {
            blocked.insert(blocker.room);
        } else {
            commands.entity(entity).despawn();
        }
    }

    let tile_size = defaults.layout.tile_size;
    let blocker_color = Color::srgb(0.55, 0.2, 0.2);
    for (id, room) in layout.iter() {
        if !room.state().doors_locked || blocked.contains(&id) {
            continue;
        }
        for door in room.doors().unwrap_or_default() {
            let (center, size) = door_blocker_rect(door, tile_size);
            commands.spawn((
                DoorBlocker { room: id },
                LayoutScoped,
                Sprite {
                    color: blocker_color,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_xyz(center.x, center.y, 0.5),
                RigidBody::Static,
                Collider::rectangle(size.x, size.y),
                CollisionLayers::new(GameLayer::Wall, [GameLayer::Player, GameLayer::Enemy]),
            ));
        }
    }
}

pub(crate) fn announce_room_cleared(mut room_cleared_events: MessageReader<RoomClearedEvent>) {
    for event in room_cleared_events.read() {
        info!("[ROOM] {} defeated", event.room);
    }
}

pub(crate) fn cleanup_layout_entities(
    mut commands: Commands,
    query: Query<Entity, With<LayoutScoped>>,
    mut contacts: ResMut<ActorContacts>,
) {
    contacts.clear();
    let mut count = 0;
    for entity in &query {
        commands.entity(entity).despawn();
        count += 1;
    }
    info!("[ROOM] Despawned {} layout entities", count);
}
