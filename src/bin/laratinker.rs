// src/bin/laratinker.rs
//! The `laratinker` command.

use anyhow::Result;
use clap::Parser;
use colored::*;
use laratinker::{
    cli::{Cli, dispatcher},
    core::{config_loader, log_store, paths},
};

/// The main entry point of the `laratinker` application.
/// It sets up logging, loads the configuration, dispatches to the correct
/// handler, and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler argument errors (and `--help`) are rendered by clap itself.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        record_error(&e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let config = config_loader::load_config()?;
    dispatcher::dispatch(cli.args, &config)
}

/// Appends the failure to the error log in the config directory.
fn record_error(error: &anyhow::Error) {
    let written = paths::get_error_log_path()
        .map_err(|e| e.to_string())
        .and_then(|path| {
            log_store::append_error_record(&path, &format!("{:#}", error)).map_err(|e| e.to_string())
        });
    if let Err(reason) = written {
        log::warn!("Could not write the error log: {}", reason);
    }
}
