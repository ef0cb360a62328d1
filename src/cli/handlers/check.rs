// src/cli/handlers/check.rs

use crate::{
    cli::handlers::commons,
    core::{paths, project::LaravelProject},
    models::AppConfig,
    system::bridge::PhpBridge,
};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Checks that PHP can be run and that the project looks like Laravel."
)]
struct CheckArgs {
    /// The Laravel project directory.
    #[arg(short, long)]
    project: Option<String>,
}

/// Main entry point for the `check` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;

    println!("\n--- {} ---", t!("check.header").yellow());

    if let Ok(config_path) = paths::get_config_file_path() {
        println!(
            "  {:<12} {}",
            t!("check.label.config").blue(),
            config_path.display()
        );
    }

    let bridge = PhpBridge::new(config.php_binary.clone());
    let version = bridge.interpreter_version();
    match &version {
        Ok(line) => println!("  {:<12} {}", t!("check.label.php").blue(), line.green()),
        Err(e) => println!("  {:<12} {}", t!("check.label.php").blue(), e.to_string().red()),
    }

    let project_path = commons::resolve_project_path(check_args.project.as_deref(), config)?;
    let project_state = match LaravelProject::from_path(&project_path) {
        Ok(project) if project.looks_like_laravel() => t!("check.project.ok").green(),
        Ok(_) => t!("session.error.not_laravel").yellow(),
        Err(e) => e.to_string().red(),
    };
    println!(
        "  {:<12} {} ({})",
        t!("check.label.project").blue(),
        project_path.display(),
        project_state
    );

    version
        .map(|_| ())
        .map_err(|e| anyhow!(t!("check.error.php_missing"), error = e))
}
