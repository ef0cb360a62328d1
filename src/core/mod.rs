// src/core/mod.rs

/// User configuration file.
pub mod config_loader;
/// Finding Eloquent models.
pub mod discovery;
/// Turning captured output into log events and tables.
pub mod formatter;
/// The session log and its export format.
pub mod log_store;
/// Config directory and user path expansion.
pub mod paths;
/// The Laravel project a session runs in.
pub mod project;
/// Canned model queries.
pub mod query;
/// Rewriting short expressions so they print.
pub mod transformer;
/// The PHP script that bootstraps Laravel around a snippet.
pub mod wrapper;
