// src/state.rs

use crate::{
    core::{
        discovery,
        formatter::TableView,
        log_store::LogStore,
        project::LaravelProject,
        query::ModelQuery,
        transformer,
    },
    models::{AppConfig, LogEntry, LogKind, WorkerEvent},
    system::{bridge::PhpBridge, worker},
};
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// The foreground state of one laratinker session.
///
/// Only the foreground touches the log and the last JSON value. Background
/// runs talk to it through the event queue, which is drained by
/// [`Session::drain_events`] and [`Session::poll`].
#[derive(Debug)]
pub struct Session {
    project: Option<LaravelProject>,
    bridge: PhpBridge,
    logs: LogStore,
    last_json: Option<Value>,
    status: String,
    auto_transform: bool,
    poll_interval: Duration,
    sender: Sender<WorkerEvent>,
    receiver: Receiver<WorkerEvent>,
    workers: Vec<JoinHandle<()>>,
    /// Index of the first entry not yet handed out by `take_unseen`.
    seen: usize,
}

impl Session {
    /// Creates a session without a project.
    pub fn new(config: &AppConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            project: None,
            bridge: PhpBridge::new(config.php_binary.clone()),
            logs: LogStore::new(),
            last_json: None,
            status: t!("session.status.ready").to_string(),
            auto_transform: config.auto_transform,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            sender,
            receiver,
            workers: Vec::new(),
            seen: 0,
        }
    }

    // --- Accessors ---

    /// The selected project, if any.
    pub fn project(&self) -> Option<&LaravelProject> {
        self.project.as_ref()
    }

    /// The full session log.
    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    /// The most recent JSON result.
    pub fn last_json(&self) -> Option<&Value> {
        self.last_json.as_ref()
    }

    /// The current status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether snippets are rewritten before running.
    pub fn auto_transform(&self) -> bool {
        self.auto_transform
    }

    /// Turns rewriting on or off and logs the change.
    pub fn set_auto_transform(&mut self, enabled: bool) {
        self.auto_transform = enabled;
        let message = if enabled {
            t!("session.info.transform_on")
        } else {
            t!("session.info.transform_off")
        };
        self.log(message, LogKind::Info);
    }

    /// The bridge used for every run.
    pub fn bridge(&self) -> &PhpBridge {
        &self.bridge
    }

    /// Appends a message to the log.
    pub fn log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.logs.push(message, kind);
    }

    /// Entries added since the previous call, oldest first.
    pub fn take_unseen(&mut self) -> Vec<LogEntry> {
        let unseen = self
            .logs
            .entries()
            .get(self.seen..)
            .map(<[LogEntry]>::to_vec)
            .unwrap_or_default();
        self.seen = self.logs.len();
        unseen
    }

    // --- Project ---

    /// Selects the project that later runs execute in.
    pub fn set_project(&mut self, project: LaravelProject) {
        let root = project.root().display().to_string();
        self.status = format!(t!("session.status.project_loaded"), path = root);
        self.log(
            format!(t!("session.info.project_loaded"), path = root),
            LogKind::Info,
        );
        if !project.looks_like_laravel() {
            self.log(t!("session.error.not_laravel"), LogKind::Error);
        }
        self.project = Some(project);
    }

    fn require_project(&mut self) -> Option<LaravelProject> {
        if self.project.is_none() {
            self.log(t!("session.error.no_project"), LogKind::Error);
        }
        self.project.clone()
    }

    // --- Runs ---

    /// Runs a snippet in the background, rewriting it first when
    /// auto-transform is on. Returns the code that was actually sent, or
    /// `None` when nothing was started.
    pub fn execute_code(&mut self, code: &str) -> Option<String> {
        let code = code.trim();
        if code.is_empty() {
            self.log(t!("session.error.no_code"), LogKind::Error);
            return None;
        }
        self.require_project()?;

        let final_code = if self.auto_transform {
            match transformer::transform(code) {
                Cow::Owned(transformed) => {
                    self.log(
                        format!(t!("session.info.transformed"), from = code, to = transformed),
                        LogKind::Info,
                    );
                    transformed
                }
                Cow::Borrowed(original) => original.to_string(),
            }
        } else {
            code.to_string()
        };

        self.execute_untransformed(&final_code).map(|()| final_code)
    }

    /// Runs a snippet in the background exactly as given.
    fn execute_untransformed(&mut self, code: &str) -> Option<()> {
        let project = self.require_project()?;

        self.status = t!("session.status.executing").to_string();
        self.log(t!("session.info.executing"), LogKind::Info);
        self.log(format!(t!("session.code_block"), code = code), LogKind::Code);

        let spawned = worker::spawn_code_run(
            self.bridge.clone(),
            project,
            code.to_string(),
            self.sender.clone(),
        );
        self.track(spawned)
    }

    /// Runs `php artisan <command> --no-ansi` in the background.
    pub fn run_artisan(&mut self, command: &str) -> bool {
        let project = match self.require_project() {
            Some(project) => project,
            None => return false,
        };
        let command = command.trim();
        if command.is_empty() {
            self.log(t!("session.error.no_artisan_command"), LogKind::Error);
            return false;
        }

        self.status = format!(t!("session.status.artisan"), command = command);
        self.log(
            format!(t!("session.info.artisan"), command = command),
            LogKind::Info,
        );

        let spawned = worker::spawn_artisan_run(
            self.bridge.clone(),
            project,
            command.to_string(),
            self.sender.clone(),
        );
        self.track(spawned).is_some()
    }

    /// Runs the model scan snippet. It is never transformed.
    pub fn list_models(&mut self) -> bool {
        if self.require_project().is_none() {
            return false;
        }
        self.log(t!("session.info.listing_models"), LogKind::Info);
        self.execute_untransformed(discovery::LIST_MODELS_SNIPPET).is_some()
    }

    /// Runs a generated model query.
    pub fn run_query(&mut self, query: &ModelQuery) -> bool {
        if self.require_project().is_none() {
            return false;
        }
        self.log(
            format!(t!("session.info.query"), query = query),
            LogKind::Info,
        );
        self.execute_code(&query.to_code()).is_some()
    }

    fn track(&mut self, spawned: std::io::Result<JoinHandle<()>>) -> Option<()> {
        match spawned {
            Ok(handle) => {
                self.workers.push(handle);
                Some(())
            }
            Err(e) => {
                self.log(format!(t!("run.error.failed"), error = e), LogKind::Error);
                self.status = t!("run.status.failed").to_string();
                None
            }
        }
    }

    // --- Event queue ---

    /// Applies every event already in the queue. Never blocks.
    pub fn drain_events(&mut self) -> usize {
        let events: Vec<WorkerEvent> = self.receiver.try_iter().collect();
        let count = events.len();
        for event in events {
            self.apply(event);
        }
        count
    }

    /// Waits up to one poll interval for an event, then drains the queue.
    pub fn poll(&mut self) -> usize {
        match self.receiver.recv_timeout(self.poll_interval) {
            Ok(event) => {
                self.apply(event);
                1 + self.drain_events()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// True while a background run started by this session is still going.
    pub fn is_busy(&mut self) -> bool {
        self.workers.retain(|handle| !handle.is_finished());
        !self.workers.is_empty()
    }

    /// Polls until every background run has finished and its events are
    /// applied, calling `on_tick` after each poll.
    pub fn wait_idle(&mut self, mut on_tick: impl FnMut(&mut Self)) {
        loop {
            self.poll();
            on_tick(self);
            if !self.is_busy() {
                // Workers post everything before exiting.
                if self.drain_events() > 0 {
                    on_tick(self);
                }
                return;
            }
        }
    }

    fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Log { message, kind } => self.log(message, kind),
            WorkerEvent::Status(text) => {
                self.log(format!(t!("session.status_entry"), status = text), LogKind::Status);
                self.status = text;
            }
            WorkerEvent::Json(value) => self.last_json = Some(value),
        }
    }

    // --- Log management ---

    /// Empties the log.
    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.seen = 0;
        self.status = t!("session.status.logs_cleared").to_string();
    }

    /// Writes the log to `path`. Failures are logged, not returned.
    pub fn export_logs(&mut self, path: &Path) -> bool {
        match self.logs.export(path) {
            Ok(_) => {
                let shown = path.display().to_string();
                self.status = format!(t!("session.status.logs_exported"), path = shown);
                self.log(
                    format!(t!("session.success.logs_exported"), path = shown),
                    LogKind::Success,
                );
                true
            }
            Err(e) => {
                self.log(format!(t!("session.error.export_failed"), error = e), LogKind::Error);
                false
            }
        }
    }

    /// Reads an exported log file. Failures are logged, not returned.
    pub fn import_logs(&mut self, path: &Path) -> Option<LogStore> {
        match LogStore::import(path) {
            Ok(store) => {
                self.log(
                    format!(
                        t!("session.info.logs_imported"),
                        count = store.len(),
                        path = path.display()
                    ),
                    LogKind::Info,
                );
                Some(store)
            }
            Err(e) => {
                self.log(format!(t!("session.error.import_failed"), error = e), LogKind::Error);
                None
            }
        }
    }

    /// Projects the last JSON result into a table.
    pub fn table_view(&mut self) -> Option<TableView> {
        let value = match &self.last_json {
            Some(value) => value,
            None => {
                self.log(t!("session.info.no_json"), LogKind::Info);
                return None;
            }
        };

        match TableView::from_json(value) {
            Ok(table) => {
                self.log(
                    format!(
                        t!("session.info.table_created"),
                        rows = table.rows.len(),
                        columns = table.columns.len()
                    ),
                    LogKind::Info,
                );
                Some(table)
            }
            Err(e) => {
                self.log(format!(t!("session.error.table_failed"), error = e), LogKind::Error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config(php_binary: &str) -> AppConfig {
        AppConfig {
            php_binary: php_binary.to_string(),
            poll_interval_ms: 10,
            ..AppConfig::default()
        }
    }

    fn session_in(dir: &Path, php_binary: &str) -> Session {
        fs::write(dir.join("artisan"), "").unwrap();
        let mut session = Session::new(&config(php_binary));
        session.set_project(LaravelProject::from_path(dir).unwrap());
        session
    }

    #[test]
    fn test_running_without_project_is_an_error_entry() {
        let mut session = Session::new(&config("php"));
        assert!(session.execute_code("User::all()").is_none());
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_no_transform_entry_without_project() {
        let mut session = Session::new(&config("php"));
        assert!(session.execute_code("User::all()").is_none());
        assert_eq!(session.logs().count_kind(LogKind::Info), 0);
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
    }

    #[test]
    fn test_empty_code_is_refused() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path(), "php");
        assert!(session.execute_code("   \n").is_none());
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
    }

    #[test]
    fn test_non_laravel_directory_is_flagged() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(&config("php"));
        session.set_project(LaravelProject::from_path(dir.path()).unwrap());
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
        assert!(session.project().is_some());
    }

    #[test]
    fn test_transform_is_applied_and_logged() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path(), "laratinker-no-such-php-binary");

        let sent = session.execute_code("User::all()").unwrap();
        session.wait_idle(|_| {});

        assert_eq!(sent, "echo formatOutput(App\\Models\\User::all());");
        let code_entry = session
            .logs()
            .entries()
            .iter()
            .find(|e| e.kind == LogKind::Code)
            .unwrap();
        assert!(code_entry.message.contains(&sent));
    }

    #[test]
    fn test_transform_can_be_disabled() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path(), "laratinker-no-such-php-binary");
        session.set_auto_transform(false);

        let sent = session.execute_code("User::all()").unwrap();
        session.wait_idle(|_| {});

        assert_eq!(sent, "User::all()");
    }

    #[test]
    fn test_missing_interpreter_is_reported_after_drain() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path(), "laratinker-no-such-php-binary");

        session.execute_code("echo 1;").unwrap();
        session.wait_idle(|_| {});

        assert!(!session.is_busy());
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
        assert_eq!(session.status(), t!("run.status.failed"));
    }

    #[test]
    fn test_json_event_replaces_last_json() {
        let mut session = Session::new(&config("php"));
        session.sender.send(WorkerEvent::Json(serde_json::json!({"id": 1}))).unwrap();
        session.sender.send(WorkerEvent::Json(serde_json::json!([{"id": 2}]))).unwrap();
        session.sender.send(WorkerEvent::status("done")).unwrap();

        assert_eq!(session.drain_events(), 3);
        assert_eq!(session.last_json(), Some(&serde_json::json!([{"id": 2}])));
        assert_eq!(session.status(), "done");
        assert_eq!(session.logs().count_kind(LogKind::Status), 1);

        let table = session.table_view().unwrap();
        assert_eq!(table.columns, vec!["id"]);
    }

    #[test]
    fn test_table_without_json_is_informational() {
        let mut session = Session::new(&config("php"));
        assert!(session.table_view().is_none());
        assert_eq!(session.logs().count_kind(LogKind::Info), 1);
    }

    #[test]
    fn test_take_unseen_advances() {
        let mut session = Session::new(&config("php"));
        session.log("one", LogKind::Normal);
        session.log("two", LogKind::Normal);
        assert_eq!(session.take_unseen().len(), 2);
        assert!(session.take_unseen().is_empty());
        session.log("three", LogKind::Normal);
        assert_eq!(session.take_unseen()[0].message, "three");
        session.clear_logs();
        assert!(session.take_unseen().is_empty());
    }

    #[test]
    fn test_export_and_import_through_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");
        let mut session = Session::new(&config("php"));

        assert!(!session.export_logs(&path));
        session.log("first", LogKind::Info);
        session.log("second\nline", LogKind::Normal);
        assert!(session.export_logs(&path));

        let restored = session.import_logs(&path).unwrap();
        // The refused first export left an error entry behind.
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.entries()[2].message, "second\nline");
    }

    #[cfg(unix)]
    #[test]
    fn test_artisan_round_trip() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path(), "echo");

        assert!(session.run_artisan("about"));
        session.wait_idle(|_| {});

        assert!(
            session
                .logs()
                .entries()
                .iter()
                .any(|e| e.kind == LogKind::Normal && e.message.contains("artisan about --no-ansi"))
        );
        assert_eq!(session.status(), t!("artisan.status.completed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_models_runs_snippet_untransformed() {
        let dir = tempdir().unwrap();
        // `cat` echoes the generated script back as the run's output.
        let mut session = session_in(dir.path(), "cat");

        assert!(session.list_models());
        session.wait_idle(|_| {});

        let output = session
            .logs()
            .entries()
            .iter()
            .find(|e| e.kind == LogKind::Normal)
            .unwrap();
        assert!(output.message.contains(crate::constants::MODEL_SCAN_BANNER));
        assert_eq!(session.logs().count_kind(LogKind::Json), 0);
        assert!(!dir.path().join(crate::constants::TEMP_SCRIPT_FILENAME).exists());
    }
}
