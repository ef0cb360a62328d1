// src/cli/handlers/models.rs

use crate::{cli::handlers::commons, core::discovery, models::AppConfig};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the Eloquent models of a Laravel project."
)]
struct ModelsArgs {
    /// The Laravel project directory.
    #[arg(short, long)]
    project: Option<String>,
    /// Guesses models from the file layout instead of asking PHP.
    #[arg(long)]
    local: bool,
}

/// Main entry point for the `models` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let models_args = ModelsArgs::try_parse_from(&args)?;
    let mut session = commons::open_session(models_args.project.as_deref(), config)?;

    if models_args.local {
        commons::print_unseen(&mut session);
        let Some(project) = session.project() else {
            return Err(anyhow!(t!("session.error.no_project")));
        };
        let suggestions = discovery::suggest_models(project);
        if suggestions.is_empty() {
            println!("{}", t!("models.info.none_found").yellow());
        } else {
            println!("\n{}", t!("models.header.suggestions").bold());
            for name in &suggestions {
                println!("  - {}", name.cyan());
            }
        }
        return Ok(());
    }

    let started = session.list_models();
    commons::wait_and_print(&mut session);
    if started {
        Ok(())
    } else {
        Err(anyhow!(t!("run.error.not_started")))
    }
}
