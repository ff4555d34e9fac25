//! TemplateRegistry resource providing lookups for loaded room templates.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::TemplateDef;

/// Central registry for room templates, keyed by id.
#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateRegistry {
    pub templates: HashMap<String, TemplateDef>,
}

impl TemplateRegistry {
    pub fn insert(&mut self, template: TemplateDef) {
        if let Some(previous) = self.templates.insert(template.id.clone(), template) {
            warn!("[CONTENT] Duplicate template id '{}' replaced", previous.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDef> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates ordered by id, so seeded generation does not depend on map order.
    pub fn sorted(&self) -> Vec<TemplateDef> {
        let mut templates: Vec<TemplateDef> = self.templates.values().cloned().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Built-in set used when templates.ron is missing or broken.
    pub fn fallback() -> Self {
        let mut registry = Self::default();
        registry.insert(TemplateDef::new("fallback_small", 14, 10));
        registry.insert(TemplateDef::new("fallback_large", 24, 18));
        registry
    }

    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        format!(
            "TemplateRegistry loaded:\n\
             - Templates: {}\n\
             - Spawning templates: {}",
            self.templates.len(),
            self.templates.values().filter(|t| t.enemy_spawning).count(),
        )
    }
}
