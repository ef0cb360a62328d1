// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Errors raised while starting a process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Unbalanced quotes in a command line.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// Nothing to run.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program is not installed or not on `PATH`.
    #[error("'{0}' was not found. Is it installed and on your PATH?")]
    ProgramNotFound(String),
    /// Spawning failed for another reason.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
}

/// Everything a finished process printed, decoded lossily as UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// True when the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs `program` with `args` in `cwd`, blocks until it exits and captures
/// stdout and stderr. A non-zero exit is not an error: the caller decides
/// what to make of the output.
pub fn execute_and_capture(
    program: &str,
    args: &[String],
    cwd: &Path,
) -> Result<CapturedOutput, ExecutionError> {
    if program.trim().is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let clean_cwd = dunce::simplified(cwd);
    let display_line = display_command(program, args);
    log::debug!("Spawning '{}' in '{}'", display_line, clean_cwd.display());

    let output = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExecutionError::ProgramNotFound(program.to_string()),
            _ => ExecutionError::CommandFailed(display_line.clone(), e),
        })?;

    log::debug!("'{}' exited with {:?}", display_line, output.status.code());

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}

/// Splits a command line into words with POSIX shell quoting rules.
pub fn split_command_line(command_line: &str) -> Result<Vec<String>, ExecutionError> {
    let trimmed = command_line.trim();
    if trimmed.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    let parts =
        shlex::split(trimmed).ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
    if parts.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(parts)
}

fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
