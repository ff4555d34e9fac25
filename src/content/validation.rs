//! Validation of room templates against the layout settings.

use super::data::*;
use super::registry::TemplateRegistry;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub template_id: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' field '{}': {}",
            self.template_id, self.field, self.message
        )
    }
}

/// Helper macro for recording a failed check
macro_rules! check {
    ($errors:expr, $cond:expr, $id:expr, $field:expr, $($msg:tt)+) => {
        if !$cond {
            $errors.push(ValidationError {
                template_id: $id.to_string(),
                field: $field,
                message: format!($($msg)+),
            });
        }
    };
}

/// Validate every template against the layout defaults.
/// Returns a list of validation errors, empty if everything can be placed.
pub fn validate_templates(
    registry: &TemplateRegistry,
    defaults: &GameplayDefaults,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let cell = defaults.layout.cell_size;
    let min_side = defaults.layout.corridor_width + 2;

    for template in registry.sorted() {
        let id = &template.id;
        check!(
            errors,
            template.width >= min_side && template.width <= cell - 2,
            id,
            "width",
            "{} is outside {}..={}",
            template.width,
            min_side,
            cell - 2
        );
        check!(
            errors,
            template.height >= min_side && template.height <= cell - 2,
            id,
            "height",
            "{} is outside {}..={}",
            template.height,
            min_side,
            cell - 2
        );
        check!(
            errors,
            template.min_enemy_spawns <= template.max_enemy_spawns,
            id,
            "min_enemy_spawns",
            "{} exceeds max_enemy_spawns {}",
            template.min_enemy_spawns,
            template.max_enemy_spawns
        );
    }

    if let Some(start) = &defaults.layout.start_template {
        check!(
            errors,
            registry.get(start).is_some(),
            start,
            "start_template",
            "referenced by gameplay defaults but not defined"
        );
    }

    errors
}
