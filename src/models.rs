// src/models.rs

use crate::constants::{DEFAULT_PHP_BINARY, DEFAULT_POLL_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// --- Log model ---

/// The category of a log entry. It drives coloring in the terminal and the
/// `[KIND]` tag in exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Plain output.
    Normal,
    /// A failure, from PHP or from the tool.
    Error,
    /// A finished step.
    Success,
    /// Pretty-printed JSON output.
    Json,
    /// Notes such as a code rewrite.
    Info,
    /// A status line change.
    Status,
    /// Source code as it was sent to PHP.
    Code,
}

impl LogKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Normal,
        Self::Error,
        Self::Success,
        Self::Json,
        Self::Info,
        Self::Status,
        Self::Code,
    ];

    /// The lowercase identifier of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Error => "error",
            Self::Success => "success",
            Self::Json => "json",
            Self::Info => "info",
            Self::Status => "status",
            Self::Code => "code",
        }
    }

    /// The uppercase tag written to exported log files.
    pub fn tag(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown log kind '{}'", s))
    }
}

/// A single timestamped message in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    /// The text, possibly spanning several lines.
    pub message: String,
    /// Category of the message.
    pub kind: LogKind,
}

// --- Worker events ---

/// A message posted by a background run to the foreground session.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// A message to append to the log.
    Log {
        /// The text to record.
        message: String,
        /// Its category.
        kind: LogKind,
    },
    /// A new status line. Also recorded in the log as a `status` entry.
    Status(String),
    /// A parsed JSON result that replaces the session's last JSON value.
    Json(serde_json::Value),
}

impl WorkerEvent {
    /// A log message event.
    pub fn log(message: impl Into<String>, kind: LogKind) -> Self {
        Self::Log {
            message: message.into(),
            kind,
        }
    }

    /// A status line event.
    pub fn status(text: impl Into<String>) -> Self {
        Self::Status(text.into())
    }
}

// --- Model queries ---

/// The canned query shapes offered for a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// `all()`.
    All,
    /// `first()`.
    First,
    /// `find(<id>)`. The id is inserted verbatim.
    Find(String),
    /// `'Total: ' . count()`.
    Count,
    /// `Model::<expression>`. The expression is inserted verbatim.
    Custom(String),
}

// --- Configuration ---

/// User configuration, stored as TOML in the app config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interpreter used for both code runs and artisan commands.
    pub php_binary: String,
    /// Rewrite short model expressions before running them.
    pub auto_transform: bool,
    /// Project used when no `--project` flag is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<PathBuf>,
    /// How often the foreground drains the result queue.
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            php_binary: DEFAULT_PHP_BINARY.to_string(),
            auto_transform: true,
            default_project: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
