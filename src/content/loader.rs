//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::TemplateRegistry;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse the contents of a DataFile<T> wrapper.
pub fn parse_data_file<T>(file: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })?;
    Ok(data.items)
}

/// Parse a single RON struct (not wrapped in DataFile).
pub fn parse_single_file<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load templates.ron and gameplay_defaults.ron from `base_path`.
/// Returns every error encountered; a registry is only returned when both
/// files loaded.
pub fn load_all_content(
    base_path: &Path,
) -> Result<(TemplateRegistry, GameplayDefaults), Vec<ContentLoadError>> {
    let mut errors = Vec::new();
    let mut registry = TemplateRegistry::default();

    let templates_path = base_path.join("templates.ron");
    match read_file(&templates_path).and_then(|contents| {
        parse_data_file::<TemplateDef>(&templates_path.display().to_string(), &contents)
    }) {
        Ok(items) => {
            for item in items {
                registry.insert(item);
            }
        }
        Err(e) => errors.push(e),
    }

    let defaults_path = base_path.join("gameplay_defaults.ron");
    let defaults = match read_file(&defaults_path).and_then(|contents| {
        parse_single_file::<GameplayDefaults>(&defaults_path.display().to_string(), &contents)
    }) {
        Ok(defaults) => Some(defaults),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    match defaults {
        Some(defaults) if errors.is_empty() => Ok((registry, defaults)),
        _ => Err(errors),
    }
}
