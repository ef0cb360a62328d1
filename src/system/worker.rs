// src/system/worker.rs

use crate::{
    core::{formatter, project::LaravelProject},
    models::{LogKind, WorkerEvent},
    system::bridge::PhpBridge,
};
use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

/// Runs `code` on a background thread and posts the resulting events to `tx`.
pub fn spawn_code_run(
    bridge: PhpBridge,
    project: LaravelProject,
    code: String,
    tx: Sender<WorkerEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("laratinker-run".to_string())
        .spawn(move || post_all(&tx, code_run_events(&bridge, &project, &code)))
}

/// Runs an artisan command on a background thread and posts the resulting events to `tx`.
pub fn spawn_artisan_run(
    bridge: PhpBridge,
    project: LaravelProject,
    command: String,
    tx: Sender<WorkerEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("laratinker-artisan".to_string())
        .spawn(move || post_all(&tx, artisan_events(&bridge, &project, &command)))
}

/// Blocking body of a code run. Failures become error events.
pub fn code_run_events(bridge: &PhpBridge, project: &LaravelProject, code: &str) -> Vec<WorkerEvent> {
    match bridge.run_code(project, code) {
        Ok(output) => formatter::classify_run_output(&output),
        Err(e) => {
            log::debug!("Code run failed: {:?}", e);
            vec![
                WorkerEvent::log(format!(t!("run.error.failed"), error = e), LogKind::Error),
                WorkerEvent::status(t!("run.status.failed")),
            ]
        }
    }
}

/// Blocking body of an artisan run. Failures become error events.
pub fn artisan_events(
    bridge: &PhpBridge,
    project: &LaravelProject,
    command: &str,
) -> Vec<WorkerEvent> {
    match bridge.run_artisan(project, command) {
        Ok(output) => formatter::classify_artisan_output(command, &output),
        Err(e) => {
            log::debug!("Artisan run failed: {:?}", e);
            vec![
                WorkerEvent::log(format!(t!("artisan.error.failed"), error = e), LogKind::Error),
                WorkerEvent::status(t!("artisan.status.failed")),
            ]
        }
    }
}

fn post_all(tx: &Sender<WorkerEvent>, events: Vec<WorkerEvent>) {
    for event in events {
        if tx.send(event).is_err() {
            log::debug!("Result queue closed, dropping remaining events.");
            break;
        }
    }
}
