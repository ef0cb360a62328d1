// src/cli/handlers/logs.rs

use crate::{
    cli::handlers::commons,
    core::{log_store::LogStore, paths},
    models::{AppConfig, LogKind},
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows a previously exported log file.")]
struct LogsArgs {
    /// The exported log file.
    file: String,
    /// Only shows error entries.
    #[arg(long)]
    errors: bool,
}

/// Main entry point for the `logs` command.
pub fn handle(args: Vec<String>, _config: &AppConfig) -> Result<()> {
    let logs_args = LogsArgs::try_parse_from(&args)?;
    let path = paths::expand_user_path(&logs_args.file)?;
    let store = LogStore::import(&path)
        .with_context(|| format!(t!("error.read_file"), path = path.display()))?;

    let shown: Vec<_> = store
        .entries()
        .iter()
        .filter(|entry| !logs_args.errors || entry.kind == LogKind::Error)
        .collect();

    for entry in &shown {
        commons::print_entry(entry);
    }
    println!(
        "\n{}",
        format!(
            t!("logs.info.summary"),
            shown = shown.len(),
            total = store.len(),
            errors = store.count_kind(LogKind::Error)
        )
        .dimmed()
    );
    Ok(())
}
