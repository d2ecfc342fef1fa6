//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PeekConfig;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "peek.toml";

/// Loads and validates `<dir>/peek.toml`.
pub fn load_config(dir: &Path) -> Result<PeekConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads `<dir>/peek.toml`, or the default configuration if the file does not exist.
pub fn load_config_or_default(dir: &Path) -> Result<PeekConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        log::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
        return Ok(PeekConfig::default());
    }
    load_config_file(&path)
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<PeekConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_config_from_str(&content)?;
    log::debug!(
        "loaded {} ({} named triggers)",
        path.display(),
        config.triggers.len()
    );
    Ok(config)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PeekConfig, ConfigError> {
    let config: PeekConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks values serde cannot reject on its own.
fn validate_config(config: &PeekConfig) -> Result<(), ConfigError> {
    for (name, expr) in &config.triggers {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "triggers",
                reason: "must not have blank names".to_string(),
            });
        }
        if expr.trim().is_empty() {
            return Err(ConfigError::EmptyTrigger(name.clone()));
        }
    }
    if config.trigger.horizon == Some(0) {
        return Err(ConfigError::Invalid {
            field: "trigger.horizon",
            reason: "must be positive".to_string(),
        });
    }
    if config.display.signals.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            field: "display.signals",
            reason: "must not contain blank names".to_string(),
        });
    }
    Ok(())
}
