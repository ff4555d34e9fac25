//! Data definitions for RON content files.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::{
    ClearPolicy, DEFAULT_MAX_ENEMY_SPAWNS, DEFAULT_MIN_ENEMY_SPAWNS, GenerationSettings,
};
use crate::rooms::NotifyPolicy;

/// Wrapper for list-style data files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Room templates (templates.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemplateDef {
    pub id: String,
    pub name: String,
    /// Floor size in tiles.
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_min_enemy_spawns")]
    pub min_enemy_spawns: u32,
    #[serde(default = "default_max_enemy_spawns")]
    pub max_enemy_spawns: u32,
    #[serde(default = "default_enemy_spawning")]
    pub enemy_spawning: bool,
}

fn default_min_enemy_spawns() -> u32 {
    DEFAULT_MIN_ENEMY_SPAWNS
}

fn default_max_enemy_spawns() -> u32 {
    DEFAULT_MAX_ENEMY_SPAWNS
}

fn default_enemy_spawning() -> bool {
    true
}

impl TemplateDef {
    pub fn new(id: impl Into<String>, width: i32, height: i32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            width,
            height,
            min_enemy_spawns: DEFAULT_MIN_ENEMY_SPAWNS,
            max_enemy_spawns: DEFAULT_MAX_ENEMY_SPAWNS,
            enemy_spawning: true,
        }
    }
}

// ============================================================================
// Gameplay defaults (gameplay_defaults.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameplayDefaults {
    pub schema_version: u32,
    /// Fixed run seed; a fresh one is rolled per session when absent.
    pub seed: Option<u64>,
    pub layout: LayoutDefaults,
    pub rules: RoomRules,
    pub spawn: SpawnDefaults,
    pub camera: CameraDefaults,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutDefaults {
    pub room_count: u32,
    pub cell_size: i32,
    pub corridor_width: i32,
    /// World units per tile.
    pub tile_size: f32,
    pub start_template: Option<String>,
    /// Seeds tried before generation gives up.
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomRules {
    pub clear_policy: ClearPolicy,
    pub notify_policy: NotifyPolicy,
    pub lock_on_engage: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpawnDefaults {
    /// Seconds an enemy stays inert after appearing.
    pub spawn_effect_secs: f32,
    pub enemy_size: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraDefaults {
    pub move_speed: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl Default for GameplayDefaults {
    fn default() -> Self {
        Self {
            schema_version: 1,
            seed: None,
            layout: LayoutDefaults {
                room_count: 8,
                cell_size: 32,
                corridor_width: 3,
                tile_size: 16.0,
                start_template: None,
                max_attempts: 16,
            },
            rules: RoomRules {
                clear_policy: ClearPolicy::AnyEnemyExit,
                notify_policy: NotifyPolicy::EveryEntry,
                lock_on_engage: true,
            },
            spawn: SpawnDefaults {
                spawn_effect_secs: 1.0,
                enemy_size: 20.0,
            },
            camera: CameraDefaults {
                move_speed: 900.0,
                x_offset: 0.0,
                y_offset: 0.0,
            },
        }
    }
}

impl GameplayDefaults {
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            cell_size: self.layout.cell_size,
            corridor_width: self.layout.corridor_width,
            clear_policy: self.rules.clear_policy,
            start_template: self.layout.start_template.clone(),
        }
    }
}
