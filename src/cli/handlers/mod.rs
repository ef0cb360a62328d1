// src/cli/handlers/mod.rs

// One module per CLI command.

/// `artisan`: runs an artisan command.
pub mod artisan;
/// `check`: interpreter and project check.
pub mod check;
/// Helpers shared by the handlers.
pub mod commons;
/// `logs`: shows an exported log file.
pub mod logs;
/// `models`: lists Eloquent models.
pub mod models;
/// `query`: runs a canned model query.
pub mod query;
/// `repl`: interactive session.
pub mod repl;
/// `run`: runs a snippet.
pub mod run;
/// `transform`: prints the rewrite of a snippet.
pub mod transform;
