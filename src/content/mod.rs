//! Content domain: room templates and gameplay defaults loaded from RON.

mod data;
mod loader;
mod registry;
mod validation;


pub use data::{
    CameraDefaults, DataFile, GameplayDefaults, LayoutDefaults, RoomRules, SpawnDefaults,
    TemplateDef,
};
pub use loader::{ContentLoadError, load_all_content, parse_data_file, parse_single_file};
pub use registry::TemplateRegistry;
pub use validation::{ValidationError, validate_templates};

use bevy::prelude::*;
use std::path::PathBuf;

pub const CONTENT_DIR: &str = "assets/data";

/// Loads content synchronously while the app is built, so every later
/// plugin and system can rely on both resources existing.
pub struct ContentPlugin {
    pub base_path: PathBuf,
}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(CONTENT_DIR),
        }
    }
}

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let (registry, defaults) = match load_all_content(&self.base_path) {
            Ok(loaded) => loaded,
            Err(errors) => {
                for e in &errors {
                    error!("[CONTENT] {}", e);
                }
                error!(
                    "[CONTENT] Falling back to built-in templates and defaults. \
                     Check {}/templates.ron and gameplay_defaults.ron",
                    self.base_path.display()
                );
                (TemplateRegistry::fallback(), GameplayDefaults::default())
            }
        };

        for e in validate_templates(&registry, &defaults) {
            warn!("[CONTENT] {}", e);
        }
        info!("{}", registry.summary());

        app.insert_resource(registry).insert_resource(defaults);
    }
}
