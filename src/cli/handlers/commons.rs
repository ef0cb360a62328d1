// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::{Context, Result, anyhow};
use colored::*;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use crate::{
    core::{paths, project::LaravelProject},
    models::{AppConfig, LogEntry, LogKind},
    state::Session,
};

/// Picks the project directory: the `--project` flag, then the configured
/// default, then the current directory.
pub fn resolve_project_path(flag: Option<&str>, config: &AppConfig) -> Result<PathBuf> {
    if let Some(raw) = flag {
        return Ok(paths::expand_user_path(raw)?);
    }
    if let Some(default) = &config.default_project {
        let raw = default.to_string_lossy();
        return Ok(paths::expand_user_path(&raw)?);
    }
    std::env::current_dir().context(t!("error.current_dir"))
}

/// Opens a session with its project already selected.
pub fn open_session(flag: Option<&str>, config: &AppConfig) -> Result<Session> {
    let path = resolve_project_path(flag, config)?;
    let project = LaravelProject::from_path(&path)
        .with_context(|| format!(t!("error.project_open"), path = path.display()))?;

    let mut session = Session::new(config);
    session.set_project(project);
    Ok(session)
}

/// Prints one log entry with the color of its kind.
pub fn print_entry(entry: &LogEntry) {
    let prefix = format!("[{}]", entry.timestamp).dimmed();
    let message = match entry.kind {
        LogKind::Normal => entry.message.normal(),
        LogKind::Error => entry.message.red(),
        LogKind::Success => entry.message.green(),
        LogKind::Json => entry.message.cyan(),
        LogKind::Info => entry.message.blue(),
        LogKind::Status => entry.message.dimmed(),
        LogKind::Code => entry.message.yellow(),
    };
    if entry.message.contains('\n') {
        println!("{}\n{}", prefix, message);
    } else {
        println!("{} {}", prefix, message);
    }
}

/// Prints every entry the session has not shown yet.
pub fn print_unseen(session: &mut Session) {
    for entry in session.take_unseen() {
        print_entry(&entry);
    }
}

/// Blocks until all background runs are done, printing entries as they arrive.
pub fn wait_and_print(session: &mut Session) {
    print_unseen(session);
    session.wait_idle(print_unseen);
}

/// Reads a snippet from the argument, from `--file`, or from piped stdin.
pub fn read_code(code: Option<String>, file: Option<&str>) -> Result<String> {
    if let Some(code) = code {
        return Ok(code);
    }
    if let Some(raw) = file {
        let path = paths::expand_user_path(raw)?;
        return fs::read_to_string(&path)
            .with_context(|| format!(t!("error.read_file"), path = path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(anyhow!(t!("error.no_code_source")));
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Number of error entries, used to pick an exit message.
pub fn error_count(session: &Session) -> usize {
    session.logs().count_kind(LogKind::Error)
}
