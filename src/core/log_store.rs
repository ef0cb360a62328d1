// src/core/log_store.rs

use crate::{
    constants::TIMESTAMP_FORMAT,
    models::{LogEntry, LogKind},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};
use tempfile::NamedTempFile;
use thiserror::Error;

lazy_static! {
    /// `[2025-01-31 12:00:00] [INFO] message`
    static ref EXPORT_LINE_RE: Regex =
        Regex::new(r"^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\] \[([A-Z]+)\] (.*)$")
            .expect("valid regex");
}

/// Errors raised while exporting or importing the log.
#[derive(Error, Debug)]
pub enum LogStoreError {
    /// Nothing to export.
    #[error("There are no log entries to export.")]
    Empty,
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The finished export could not replace the target file.
    #[error("Could not move the exported log into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Current local time in the log timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Append-only, in-memory history of everything the session reported.
#[derive(Debug, Default, Clone)]
pub struct LogStore {
    entries: Vec<LogEntry>,
}

impl LogStore {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message stamped with the current time.
    pub fn push(&mut self, message: impl Into<String>, kind: LogKind) -> &LogEntry {
        self.push_entry(LogEntry {
            timestamp: now_timestamp(),
            message: message.into(),
            kind,
        })
    }

    /// Appends an entry that already carries its timestamp.
    pub fn push_entry(&mut self, entry: LogEntry) -> &LogEntry {
        log::trace!("[{}] {}", entry.kind, entry.message);
        self.entries.push(entry);
        self.entries.last().expect("entry was just pushed")
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries of the given kind.
    pub fn count_kind(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Writes every entry to `path` as `[timestamp] [KIND] message`, replacing
    /// the file atomically. Returns the number of entries written.
    pub fn export(&self, path: &Path) -> Result<usize, LogStoreError> {
        if self.entries.is_empty() {
            return Err(LogStoreError::Empty);
        }

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent)?;
        for entry in &self.entries {
            writeln!(temp_file, "{}", render_line(entry))?;
        }
        temp_file.flush()?;
        temp_file.persist(path)?;

        log::debug!("Exported {} log entries to '{}'", self.entries.len(), path.display());
        Ok(self.entries.len())
    }

    /// Reads a file produced by [`LogStore::export`].
    pub fn import(path: &Path) -> Result<Self, LogStoreError> {
        let content = fs::read_to_string(path)?;
        Ok(Self {
            entries: parse_export(&content),
        })
    }
}

/// Marks every line after the first of a multi-line message in an export.
const CONTINUATION_PREFIX: char = '\t';

/// Formats one entry the way it appears in an exported file. Continuation
/// lines of a multi-line message start with a tab, so they can never be
/// mistaken for the header of another entry.
pub fn render_line(entry: &LogEntry) -> String {
    let continued = format!("\n{}", CONTINUATION_PREFIX);
    format!(
        "[{}] [{}] {}",
        entry.timestamp,
        entry.kind.tag(),
        entry.message.replace('\n', &continued)
    )
}

/// Parses exported log text. A tab-prefixed line continues the previous
/// entry's message. Otherwise a line with a timestamp and a known kind tag
/// opens an entry, and anything else continues the previous message as is.
/// Text before the first entry is ignored.
pub fn parse_export(content: &str) -> Vec<LogEntry> {
    let mut entries: Vec<LogEntry> = Vec::new();
    let body = content.strip_suffix('\n').unwrap_or(content);
    if body.is_empty() && content.is_empty() {
        return entries;
    }

    for line in body.split('\n') {
        let text = match line.strip_prefix(CONTINUATION_PREFIX) {
            Some(text) => text,
            None => match parse_entry_line(line) {
                Some(entry) => {
                    entries.push(entry);
                    continue;
                }
                None => line,
            },
        };

        match entries.last_mut() {
            Some(last) => {
                last.message.push('\n');
                last.message.push_str(text);
            }
            None => log::debug!("Skipping line outside of any log entry: '{}'", line),
        }
    }
    entries
}

fn parse_entry_line(line: &str) -> Option<LogEntry> {
    let captures = EXPORT_LINE_RE.captures(line)?;
    let kind = captures.get(2)?.as_str().parse::<LogKind>().ok()?;
    Some(LogEntry {
        timestamp: captures.get(1)?.as_str().to_string(),
        message: captures.get(3)?.as_str().to_string(),
        kind,
    })
}

/// Appends a single `[timestamp] [ERROR] message` record to `path`.
pub fn append_error_record(path: &Path, message: &str) -> std::io::Result<()> {
    let entry = LogEntry {
        timestamp: now_timestamp(),
        message: message.to_string(),
        kind: LogKind::Error,
    };
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", render_line(&entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_store() -> LogStore {
        let mut store = LogStore::new();
        store.push("Executing code...", LogKind::Info);
        store.push(
            "---- CODE ----\necho formatOutput(App\\Models\\User::all());\n--------------",
            LogKind::Code,
        );
        store.push("Output:\n[\n    {\n        \"id\": 1\n    }\n]", LogKind::Json);
        store.push("Error:\nPHP Fatal error", LogKind::Error);
        store.push("trailing newline\n", LogKind::Normal);
        store.push("Status: Execution finished.", LogKind::Status);
        store
    }

    #[test]
    fn test_push_stamps_entries() {
        let mut store = LogStore::new();
        let entry = store.push("hello", LogKind::Success).clone();
        assert_eq!(entry.timestamp.len(), "2025-01-31 12:00:00".len());
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_kind(LogKind::Success), 1);
    }

    #[test]
    fn test_render_line_format() {
        let entry = LogEntry {
            timestamp: "2025-03-04 05:06:07".to_string(),
            message: "Project loaded".to_string(),
            kind: LogKind::Info,
        };
        assert_eq!(render_line(&entry), "[2025-03-04 05:06:07] [INFO] Project loaded");
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");
        let store = sample_store();

        let written = store.export(&path).unwrap();
        let restored = LogStore::import(&path).unwrap();

        assert_eq!(written, store.len());
        assert_eq!(restored.len(), store.len());
        for (original, read_back) in store.entries().iter().zip(restored.entries()) {
            assert_eq!(original.message, read_back.message);
            assert_eq!(original.kind, read_back.kind);
        }
    }

    #[test]
    fn test_round_trip_with_embedded_entry_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");
        let mut store = LogStore::new();
        store.push(
            "Output:\n[2025-01-01 10:00:00] [INFO] printed by the snippet",
            LogKind::Normal,
        );
        store.push("\tindented\n\ttwice", LogKind::Code);
        store.push("after", LogKind::Info);

        store.export(&path).unwrap();
        let restored = LogStore::import(&path).unwrap();

        assert_eq!(restored.len(), 3);
        for (original, read_back) in store.entries().iter().zip(restored.entries()) {
            assert_eq!(original.message, read_back.message);
            assert_eq!(original.kind, read_back.kind);
        }
    }

    #[test]
    fn test_continuation_lines_are_tab_prefixed() {
        let entry = LogEntry {
            timestamp: "2025-03-04 05:06:07".to_string(),
            message: "Output:\nline two".to_string(),
            kind: LogKind::Normal,
        };
        assert_eq!(
            render_line(&entry),
            "[2025-03-04 05:06:07] [NORMAL] Output:\n\tline two"
        );
    }

    #[test]
    fn test_export_of_empty_store_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.log");
        assert!(matches!(LogStore::new().export(&path), Err(LogStoreError::Empty)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");
        fs::write(&path, "old content\n").unwrap();

        let mut store = LogStore::new();
        store.push("fresh", LogKind::Info);
        store.export(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old content"));
        assert!(content.ends_with("] [INFO] fresh\n"));
    }

    #[test]
    fn test_unknown_tags_continue_previous_message() {
        let text = "[2025-01-01 10:00:00] [INFO] first\n[2025-01-01 10:00:01] [DEBUG] not a kind\n";
        let entries = parse_export(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].message,
            "first\n[2025-01-01 10:00:01] [DEBUG] not a kind"
        );
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_export("").is_empty());
        assert!(parse_export("stray line\n").is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = sample_store();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_error_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("error_log.txt");

        append_error_record(&path, "first failure").unwrap();
        append_error_record(&path, "second failure").unwrap();

        let entries = parse_export(&fs::read_to_string(&path).unwrap());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, LogKind::Error);
        assert_eq!(entries[0].message, "first failure");
        assert_eq!(entries[1].message, "second failure");
    }

    #[test]
    fn test_append_error_record_keeps_multiline_messages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("error_log.txt");

        append_error_record(&path, "config.toml is invalid\n  at line 3").unwrap();

        let entries = parse_export(&fs::read_to_string(&path).unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "config.toml is invalid\n  at line 3");
    }
}
