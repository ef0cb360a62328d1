// src/core/project.rs

use crate::{
    constants::{ARTISAN_FILENAME, TEMP_SCRIPT_FILENAME},
    core::paths::{self, PathError},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while opening a project.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The path could not be expanded.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Nothing exists at the path.
    #[error("Project directory '{0}' does not exist.")]
    NotFound(String),
    /// The path is a file.
    #[error("Project path '{0}' is not a directory.")]
    NotADirectory(String),
}

/// A directory presumed to hold a Laravel skeleton (`artisan`, `app/`, `vendor/`).
///
/// Opening only checks that the directory exists. Whether it really is a
/// Laravel project is reported separately by [`LaravelProject::looks_like_laravel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaravelProject {
    root: PathBuf,
}

impl LaravelProject {
    /// Opens a project from a user-supplied path (`~` and env vars are expanded).
    pub fn open(raw_path: &str) -> Result<Self, ProjectError> {
        let expanded = paths::expand_user_path(raw_path)?;
        Self::from_path(expanded)
    }

    /// Opens a project from an already resolved path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ProjectError> {
        let root = path.into();
        if !root.exists() {
            return Err(ProjectError::NotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(ProjectError::NotADirectory(root.display().to_string()));
        }
        let root = root
            .canonicalize()
            .map(|p| dunce::simplified(&p).to_path_buf())
            .unwrap_or(root);
        log::debug!("Opened project at '{}'", root.display());
        Ok(Self { root })
    }

    /// The canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when the project root contains an `artisan` file.
    pub fn looks_like_laravel(&self) -> bool {
        self.root.join(ARTISAN_FILENAME).is_file()
    }

    /// Where the wrapper script for a run is written.
    pub fn temp_script_path(&self) -> PathBuf {
        self.root.join(TEMP_SCRIPT_FILENAME)
    }

    /// The `app/` directory of the project.
    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_existing_laravel_project() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("artisan"), "#!/usr/bin/env php\n").unwrap();

        let project = LaravelProject::open(&dir.path().display().to_string()).unwrap();

        assert!(project.looks_like_laravel());
        assert!(project.temp_script_path().ends_with("temp_tinker.php"));
    }

    #[test]
    fn test_plain_directory_opens_but_is_flagged() {
        let dir = tempdir().unwrap();
        let project = LaravelProject::from_path(dir.path()).unwrap();
        assert!(!project.looks_like_laravel());
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            LaravelProject::from_path(missing),
            Err(ProjectError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_is_not_a_project() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("composer.json");
        fs::write(&file, "{}").unwrap();
        assert!(matches!(
            LaravelProject::from_path(file),
            Err(ProjectError::NotADirectory(_))
        ));
    }
}
