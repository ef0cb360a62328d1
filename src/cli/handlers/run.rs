// src/cli/handlers/run.rs

use crate::{
    cli::handlers::commons,
    core::paths,
    models::AppConfig,
};
use anyhow::{Result, anyhow};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs a PHP snippet inside a Laravel project."
)]
struct RunArgs {
    /// The PHP code to run. Read from --file or stdin when omitted.
    code: Option<String>,
    /// Reads the code from a file.
    #[arg(short, long)]
    file: Option<String>,
    /// The Laravel project directory.
    #[arg(short, long)]
    project: Option<String>,
    /// Sends the code exactly as written.
    #[arg(long)]
    no_transform: bool,
    /// Exports the session log to this file when the run is over.
    #[arg(long)]
    log: Option<String>,
}

/// Main entry point for the `run` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let code = commons::read_code(run_args.code, run_args.file.as_deref())?;

    let mut session = commons::open_session(run_args.project.as_deref(), config)?;
    if run_args.no_transform {
        session.set_auto_transform(false);
    }

    let started = session.execute_code(&code).is_some();
    commons::wait_and_print(&mut session);

    if let Some(raw) = run_args.log {
        let path = paths::expand_user_path(&raw)?;
        session.export_logs(&path);
        commons::print_unseen(&mut session);
    }

    if started {
        Ok(())
    } else {
        Err(anyhow!(t!("run.error.not_started")))
    }
}
