//! # Config Loader
//!
//! Loads the user configuration from `~/.config/laratinker/config.toml`. A
//! missing file is created with the default values so users have something to
//! edit.
use crate::{
    core::paths::{self, PathError},
    models::AppConfig,
};
use std::{fs, path::Path};
use thiserror::Error;

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config directory could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this config.
    #[error("Failed to parse config.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The defaults could not be written as TOML.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads the configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_path = paths::get_config_file_path()?;
    load_config_from(&config_path)
}

/// Loads the configuration from `config_path`, writing the defaults there if
/// the file does not exist yet.
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, ConfigError> {
    let config = if !config_path.exists() {
        log::debug!(
            "No config found at '{}', writing defaults.",
            config_path.display()
        );
        let default_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::write(config_path, toml_string)?;
        default_config
    } else {
        let content = fs::read_to_string(config_path)?;
        toml::from_str(&content)?
    };

    validate(&config)?;
    log::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.php_binary.trim().is_empty() {
        return Err(ConfigError::Invalid("'php_binary' cannot be empty".to_string()));
    }
    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "'poll_interval_ms' must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
