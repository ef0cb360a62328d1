// src/system/bridge.rs

use crate::{
    core::{project::LaravelProject, wrapper},
    system::executor::{self, CapturedOutput, ExecutionError},
};
use std::{fs, path::PathBuf};
use thiserror::Error;

/// Errors raised while running PHP.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The wrapper script could not be written.
    #[error("Could not write the temporary script '{path}': {source}")]
    TempScript {
        /// The script path.
        path: String,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The interpreter could not be started.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// `php -v` printed nothing.
    #[error("The interpreter printed no version information.")]
    NoVersion,
}

/// Runs PHP inside a Laravel project through an external interpreter.
///
/// Every call blocks until the interpreter exits. There is no timeout and no
/// way to cancel a run.
#[derive(Debug, Clone)]
pub struct PhpBridge {
    php_binary: String,
}

impl PhpBridge {
    /// Creates a bridge that runs `php_binary`.
    pub fn new(php_binary: impl Into<String>) -> Self {
        Self {
            php_binary: php_binary.into(),
        }
    }

    /// The interpreter this bridge runs.
    pub fn php_binary(&self) -> &str {
        &self.php_binary
    }

    /// Wraps `code` with the bootstrap boilerplate, writes it to
    /// `temp_tinker.php` at the project root, runs `php temp_tinker.php` there
    /// and removes the file again, whatever the outcome.
    pub fn run_code(
        &self,
        project: &LaravelProject,
        code: &str,
    ) -> Result<CapturedOutput, BridgeError> {
        let script_path = project.temp_script_path();
        let script = wrapper::build_script(code);

        fs::write(&script_path, script).map_err(|e| BridgeError::TempScript {
            path: script_path.display().to_string(),
            source: e,
        })?;
        log::debug!("Wrote temporary script '{}'", script_path.display());

        let _cleanup = scopeguard::guard(script_path.clone(), |path: PathBuf| {
            match fs::remove_file(&path) {
                Ok(()) => log::debug!("Removed temporary script '{}'", path.display()),
                Err(e) => log::warn!(
                    "Could not remove temporary script '{}': {}",
                    path.display(),
                    e
                ),
            }
        });

        let args = vec![script_path.display().to_string()];
        Ok(executor::execute_and_capture(
            &self.php_binary,
            &args,
            project.root(),
        )?)
    }

    /// Runs `php artisan <command> --no-ansi` at the project root. The command
    /// line is split shell-style, so it may carry its own arguments.
    pub fn run_artisan(
        &self,
        project: &LaravelProject,
        command_line: &str,
    ) -> Result<CapturedOutput, BridgeError> {
        let mut args = vec!["artisan".to_string()];
        args.extend(executor::split_command_line(command_line)?);
        args.push("--no-ansi".to_string());

        Ok(executor::execute_and_capture(
            &self.php_binary,
            &args,
            project.root(),
        )?)
    }

    /// Runs `php -v` and returns the first line of the banner.
    pub fn interpreter_version(&self) -> Result<String, BridgeError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let output = executor::execute_and_capture(&self.php_binary, &["-v".to_string()], &cwd)?;
        output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(BridgeError::NoVersion)
    }
}
