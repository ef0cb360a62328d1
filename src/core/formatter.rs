// src/core/formatter.rs

use crate::{
    constants::MODEL_SCAN_BANNER,
    models::{LogKind, WorkerEvent},
    system::executor::CapturedOutput,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// Turns the captured output of a code run into log events.
///
/// JSON-looking stdout is pretty-printed and also emitted as a
/// [`WorkerEvent::Json`] so the session can keep it for the table view.
/// The list always ends with a status event.
pub fn classify_run_output(output: &CapturedOutput) -> Vec<WorkerEvent> {
    let mut events = Vec::new();

    if !output.stdout.is_empty() {
        events.extend(classify_stdout(&output.stdout));
    }
    if !output.stderr.is_empty() {
        events.push(WorkerEvent::log(
            format!(t!("run.output.stderr"), output = output.stderr),
            LogKind::Error,
        ));
    }
    if output.stdout.is_empty() && output.stderr.is_empty() {
        events.push(WorkerEvent::log(t!("run.output.empty"), LogKind::Success));
    }

    events.push(WorkerEvent::status(t!("run.status.finished")));
    events
}

fn classify_stdout(stdout: &str) -> Vec<WorkerEvent> {
    let plain = || WorkerEvent::log(format!(t!("run.output.stdout"), output = stdout), LogKind::Normal);

    if stdout.contains(MODEL_SCAN_BANNER) {
        return vec![plain()];
    }

    let trimmed = stdout.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return vec![plain()];
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => {
            let pretty = pretty_json(&value);
            vec![
                WorkerEvent::log(format!(t!("run.output.stdout"), output = pretty), LogKind::Json),
                WorkerEvent::Json(value),
            ]
        }
        Err(e) => {
            log::debug!("Output looked like JSON but did not parse: {}", e);
            vec![plain()]
        }
    }
}

/// Turns the captured output of `php artisan <command>` into log events.
pub fn classify_artisan_output(command: &str, output: &CapturedOutput) -> Vec<WorkerEvent> {
    let mut events = Vec::new();

    if !output.stdout.is_empty() {
        events.push(WorkerEvent::log(
            format!(t!("artisan.output.stdout"), command = command, output = output.stdout),
            LogKind::Normal,
        ));
    }
    if !output.stderr.is_empty() {
        events.push(WorkerEvent::log(
            format!(t!("artisan.output.stderr"), command = command, output = output.stderr),
            LogKind::Error,
        ));
    }
    if output.stdout.is_empty() && output.stderr.is_empty() {
        events.push(WorkerEvent::log(
            format!(t!("artisan.output.empty"), command = command),
            LogKind::Success,
        ));
    }

    events.push(WorkerEvent::status(t!("artisan.status.completed")));
    events.push(WorkerEvent::log(
        format!(t!("artisan.output.finished"), command = command),
        LogKind::Status,
    ));
    events
}

/// Pretty-prints JSON with four-space indentation.
pub fn pretty_json(value: &Value) -> String {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buffer).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

// --- Table projection ---

/// Why a JSON value cannot be shown as a table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    /// Neither an object nor an array of objects.
    #[error("Only a JSON object or an array of JSON objects can be shown as a table.")]
    NotTabular,
}

/// A JSON result flattened into rows and columns.
///
/// Columns are the sorted union of the keys of every row. Missing cells are
/// blank, `null` is `NULL`, nested arrays and objects are compact JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Column names, sorted.
    pub columns: Vec<String>,
    /// One cell per column for every row.
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Builds a table from an array of objects, or from a single object
    /// promoted to a one-row table.
    pub fn from_json(value: &Value) -> Result<Self, TableError> {
        let records: Vec<&serde_json::Map<String, Value>> = match value {
            Value::Object(map) => vec![map],
            Value::Array(items) => items
                .iter()
                .map(Value::as_object)
                .collect::<Option<Vec<_>>>()
                .ok_or(TableError::NotTabular)?,
            _ => return Err(TableError::NotTabular),
        };

        let columns: Vec<String> = records
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Renders the table as aligned plain text, one line per row after a header.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = render_line(&self.columns);
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            out.push('\n');
            out.push_str(&render_line(row));
        }
        out
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        other => other.to_string(),
    }
}
