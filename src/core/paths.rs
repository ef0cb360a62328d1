// src/core/paths.rs

use crate::constants::{APP_DIR, CONFIG_FILENAME, ERROR_LOG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The app config directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that was attempted.
        path: String,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// `~` or an environment variable could not be expanded.
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion {
        /// The path as given.
        path: String,
        /// Why expansion failed.
        reason: String,
    },
}

/// Returns the path to the laratinker configuration directory (`~/.config/laratinker`).
/// Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path, later calls return
/// the cached value.
pub fn get_app_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = APP_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `config.toml`.
pub fn get_config_file_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Returns the path to the fatal error log.
pub fn get_error_log_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(ERROR_LOG_FILENAME))
}

/// Expands `~` and environment variables in a user-supplied path and strips
/// Windows verbatim prefixes.
pub fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw.trim()).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    let path = PathBuf::from(expanded.into_owned());
    Ok(dunce::simplified(&path).to_path_buf())
}
