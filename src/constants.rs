// src/constants.rs

/// The name of the laratinker directory inside the system config directory.
pub const APP_DIR: &str = "laratinker";

/// The name of the user configuration file (inside the app config directory).
pub const CONFIG_FILENAME: &str = "config.toml";

/// The file that collects fatal startup and dispatch errors (inside the app config directory).
pub const ERROR_LOG_FILENAME: &str = "error_log.txt";

/// The wrapper script written at the project root for every run.
/// The name is fixed, so overlapping runs in one project share it.
pub const TEMP_SCRIPT_FILENAME: &str = "temp_tinker.php";

/// The Laravel console entry point expected at a project root.
pub const ARTISAN_FILENAME: &str = "artisan";

/// Interpreter used when the config does not name one.
pub const DEFAULT_PHP_BINARY: &str = "php";

/// Default delay between two drains of the result queue.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Format used for log entry timestamps, both in memory and in exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Comment line that opens every generated model query.
pub const MODEL_QUERY_MARKER: &str = "// Model query:";

/// First line printed by the model scan snippet. Output containing it is shown verbatim.
pub const MODEL_SCAN_BANNER: &str = "Searching for Eloquent models in the project...";

/// Facades imported into every generated script.
pub const FACADE_IMPORTS: &[&str] = &[
    "DB", "Schema", "Auth", "Route", "Storage", "Cache", "Config", "Log",
];

/// Class names that are never treated as `App\Models` classes.
pub const NON_MODEL_CLASSES: &[&str] = &[
    "DB", "Schema", "Route", "Auth", "Storage", "Config", "Log", "Cache", "View", "Response",
    "Request",
];
