use anyhow::Result;

use crate::{cli::handlers, models::AppConfig};

// --- Command Definition and Registry ---

/// Defines a command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &AppConfig) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "artisan",
        aliases: &["a"],
        handler: handlers::artisan::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &[],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "logs",
        aliases: &[],
        handler: handlers::logs::handle,
    },
    CommandDefinition {
        name: "models",
        aliases: &["m"],
        handler: handlers::models::handle,
    },
    CommandDefinition {
        name: "query",
        aliases: &["q"],
        handler: handlers::query::handle,
    },
    CommandDefinition {
        name: "repl",
        aliases: &["i"],
        handler: handlers::repl::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["r"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "transform",
        aliases: &["t"],
        handler: handlers::transform::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Splits the raw arguments into a command and the arguments for its handler.
///
/// No arguments start the REPL. An unknown first argument is a shortcut for
/// `run`, so `laratinker "User::all()"` runs the snippet.
fn resolve(all_args: Vec<String>) -> (&'static str, Vec<String>) {
    let mut args = all_args.into_iter();
    match args.next() {
        None => ("repl", Vec::new()),
        Some(first) => match find_command(&first) {
            Some(command) => (command.name, args.collect()),
            None => {
                let mut run_args = vec![first];
                run_args.extend(args);
                ("run", run_args)
            }
        },
    }
}

/// The main application dispatcher.
pub fn dispatch(all_args: Vec<String>, config: &AppConfig) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let (name, handler_args) = resolve(all_args);
    let handler = find_command(name)
        .map(|command| command.handler)
        .unwrap_or(handlers::run::handle);
    handler(handler_args, config)
}
