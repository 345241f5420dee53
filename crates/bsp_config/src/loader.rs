//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use bsp_render::OverrideKey;
use std::path::Path;

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE: &str = "bsp.toml";

/// Loads and validates a `bsp.toml` configuration from a project directory.
///
/// Reads `<project_dir>/bsp.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    log::debug!("loading {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `bsp.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and override keys are known.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.board.is_empty() {
        return Err(ConfigError::MissingField("project.board".to_string()));
    }
    if config.project.top.as_deref() == Some("") {
        return Err(ConfigError::ValidationError(
            "project.top must not be empty".to_string(),
        ));
    }
    for (section, map) in [("overrides", &config.overrides), ("templates", &config.templates)] {
        for (key, entry) in map {
            key.parse::<OverrideKey>().map_err(|_| {
                ConfigError::ValidationError(format!("unknown override key '{key}' in [{section}]"))
            })?;
            entry.require_text(section, key)?;
        }
    }
    if let Some(key) = config
        .overrides
        .keys()
        .find(|key| config.templates.contains_key(*key))
    {
        return Err(ConfigError::ValidationError(format!(
            "override '{key}' is set in both [overrides] and [templates]"
        )));
    }
    Ok(())
}
