// src/cli/handlers/artisan.rs

use crate::{cli::handlers::commons, models::AppConfig};
use anyhow::{Result, anyhow};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs an artisan command in a Laravel project."
)]
struct ArtisanArgs {
    /// The Laravel project directory. Must come before the command.
    #[arg(short, long)]
    project: Option<String>,
    /// The artisan command and its arguments, e.g. `route:list --path=api`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Main entry point for the `artisan` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let artisan_args = ArtisanArgs::try_parse_from(&args)?;
    // Re-quoted so the bridge can split it back into the same words.
    let command_line = shlex::try_join(artisan_args.command.iter().map(String::as_str))
        .map_err(|e| anyhow!(t!("artisan.error.quote"), error = e))?;

    let mut session = commons::open_session(artisan_args.project.as_deref(), config)?;
    let started = session.run_artisan(&command_line);
    commons::wait_and_print(&mut session);

    if started {
        Ok(())
    } else {
        Err(anyhow!(t!("run.error.not_started")))
    }
}
