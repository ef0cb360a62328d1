//! Run PHP snippets inside a Laravel application from the terminal.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command-line front end: argument parsing, dispatch and handlers.
pub mod cli;
/// Fixed names, defaults and marker strings.
pub mod constants;
/// Domain logic that does not touch the PHP interpreter.
pub mod core;
/// Plain data shared across layers.
pub mod models;
/// The foreground session that owns the log.
pub mod state;
/// Process execution and background runs.
pub mod system;
