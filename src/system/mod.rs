//! # System Interaction Layer
//!
//! Everything that touches the PHP interpreter lives here.
//!
//! ## Modules
//!
//! - **`executor`**: spawns an external process in a working directory and
//!   captures what it prints.
//! - **`bridge`**: turns a snippet into a temporary Laravel script and runs it,
//!   and runs artisan commands.
//! - **`worker`**: runs bridge calls on background threads and posts the
//!   results to the session's queue.

/// Running PHP inside a project.
pub mod bridge;
/// Spawning processes and capturing output.
pub mod executor;
/// Background runs.
pub mod worker;
