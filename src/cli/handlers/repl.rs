// src/cli/handlers/repl.rs

use crate::{
    cli::handlers::{commons, query},
    core::{discovery, paths, project::LaravelProject},
    models::{AppConfig, LogKind},
    state::Session,
};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::fs;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Starts an interactive session against a Laravel project."
)]
struct ReplArgs {
    /// The Laravel project directory.
    #[arg(short, long)]
    project: Option<String>,
}

/// What the loop should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main entry point for the `repl` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let repl_args = ReplArgs::try_parse_from(&args)?;

    let mut session = Session::new(config);
    // A missing project is not fatal here; it can be chosen with `:project`.
    match commons::resolve_project_path(repl_args.project.as_deref(), config) {
        Ok(path) => match LaravelProject::from_path(&path) {
            Ok(project) => session.set_project(project),
            Err(e) => session.log(e.to_string(), LogKind::Error),
        },
        Err(e) => session.log(e.to_string(), LogKind::Error),
    }

    println!("{}", t!("repl.banner").bold());
    commons::print_unseen(&mut session);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let Some(input) = read_snippet(&mut lines)? else {
            break;
        };
        let flow = handle_line(&mut session, &input);
        commons::wait_and_print(&mut session);
        if flow == Flow::Quit {
            break;
        }
    }

    println!("{}", t!("repl.goodbye").dimmed());
    Ok(())
}

/// Reads one snippet. Lines ending in `\` continue on the next line.
/// Returns `None` at end of input.
fn read_snippet(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    let mut snippet = String::new();
    let mut prompt = t!("repl.prompt");
    loop {
        print!("{}", prompt.green().bold());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None if snippet.is_empty() => return Ok(None),
            None => return Ok(Some(snippet)),
        };

        match line.strip_suffix('\\') {
            Some(head) => {
                snippet.push_str(head);
                snippet.push('\n');
                prompt = t!("repl.prompt_continue");
            }
            None => {
                snippet.push_str(&line);
                return Ok(Some(snippet));
            }
        }
    }
}

/// Runs a `:command` or executes the line as PHP.
fn handle_line(session: &mut Session, input: &str) -> Flow {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Flow::Continue;
    }

    let Some(command_line) = trimmed.strip_prefix(':') else {
        session.execute_code(trimmed);
        return Flow::Continue;
    };

    let (command, rest) = match command_line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (command_line, ""),
    };

    match command {
        "q" | "quit" | "exit" => return Flow::Quit,
        "h" | "help" => println!("{}", t!("repl.help")),
        "project" => set_project(session, rest),
        "run-file" => run_file(session, rest),
        "artisan" => {
            session.run_artisan(rest);
        }
        "models" if rest == "--local" => print_suggestions(session),
        "models" => {
            session.list_models();
        }
        "query" => run_query(session, rest),
        "transform" => set_transform(session, rest),
        "table" => {
            if let Some(table) = session.table_view() {
                commons::print_unseen(session);
                println!("{}", table.render());
            }
        }
        "logs" => {
            for entry in session.logs().entries() {
                commons::print_entry(entry);
            }
            // Already on screen.
            session.take_unseen();
        }
        "clear" => {
            session.clear_logs();
            println!("{}", t!("repl.info.cleared").dimmed());
        }
        "export" => with_path(session, rest, |session, path| {
            session.export_logs(path);
        }),
        "import" => with_path(session, rest, |session, path| {
            if let Some(store) = session.import_logs(path) {
                commons::print_unseen(session);
                for entry in store.entries() {
                    commons::print_entry(entry);
                }
            }
        }),
        "status" => print_status(session),
        other => session.log(
            format!(t!("repl.error.unknown_command"), command = other),
            LogKind::Error,
        ),
    }
    Flow::Continue
}

fn set_project(session: &mut Session, raw: &str) {
    if raw.is_empty() {
        session.log(t!("repl.error.path_required"), LogKind::Error);
        return;
    }
    match LaravelProject::open(raw) {
        Ok(project) => session.set_project(project),
        Err(e) => session.log(e.to_string(), LogKind::Error),
    }
}

fn run_file(session: &mut Session, raw: &str) {
    with_path(session, raw, |session, path| match fs::read_to_string(path) {
        Ok(code) => {
            session.execute_code(&code);
        }
        Err(e) => session.log(
            format!(t!("error.read_file_with_cause"), path = path.display(), error = e),
            LogKind::Error,
        ),
    });
}

fn run_query(session: &mut Session, rest: &str) {
    let Some(project) = session.project().cloned() else {
        session.log(t!("session.error.no_project"), LogKind::Error);
        return;
    };
    let model = (!rest.is_empty()).then(|| rest.to_string());
    match query::build_query(&project, model, None) {
        Ok(query) => {
            session.run_query(&query);
        }
        Err(e) => session.log(e.to_string(), LogKind::Error),
    }
}

fn set_transform(session: &mut Session, rest: &str) {
    match rest {
        "on" => session.set_auto_transform(true),
        "off" => session.set_auto_transform(false),
        _ => {
            let state = if session.auto_transform() { "on" } else { "off" };
            println!("{}", format!(t!("repl.info.transform_state"), state = state));
        }
    }
}

fn print_suggestions(session: &mut Session) {
    let Some(project) = session.project().cloned() else {
        session.log(t!("session.error.no_project"), LogKind::Error);
        return;
    };
    let suggestions = discovery::suggest_models(&project);
    if suggestions.is_empty() {
        println!("{}", t!("models.info.none_found").yellow());
    }
    for name in suggestions {
        println!("  - {}", name.cyan());
    }
}

fn print_status(session: &Session) {
    let project = session
        .project()
        .map(|p| p.root().display().to_string())
        .unwrap_or_else(|| t!("repl.status.no_project").to_string());
    let transform = if session.auto_transform() { "on" } else { "off" };

    println!("  {:<12} {}", t!("repl.status.project").blue(), project);
    println!("  {:<12} {}", t!("repl.status.php").blue(), session.bridge().php_binary());
    println!("  {:<12} {}", t!("repl.status.transform").blue(), transform);
    println!("  {:<12} {}", t!("repl.status.entries").blue(), session.logs().len());
    println!("  {:<12} {}", t!("repl.status.state").blue(), session.status());
}

/// Expands `raw` as a path and hands it to `action`, logging bad input.
fn with_path(session: &mut Session, raw: &str, action: impl FnOnce(&mut Session, &std::path::Path)) {
    if raw.is_empty() {
        session.log(t!("repl.error.path_required"), LogKind::Error);
        return;
    }
    match paths::expand_user_path(raw) {
        Ok(path) => action(session, &path),
        Err(e) => session.log(e.to_string(), LogKind::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lines(input: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
        input.lines().map(|l| Ok(l.to_string()))
    }

    #[test]
    fn test_read_snippet_joins_continuations() {
        let mut input = lines("$a = 1;\\\necho $a;\nnext");
        let snippet = read_snippet(&mut input).unwrap().unwrap();
        assert_eq!(snippet, "$a = 1;\necho $a;");
        assert_eq!(read_snippet(&mut input).unwrap().unwrap(), "next");
        assert!(read_snippet(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_quit_and_unknown_commands() {
        let mut session = Session::new(&AppConfig::default());
        assert_eq!(handle_line(&mut session, ":quit"), Flow::Quit);
        assert_eq!(handle_line(&mut session, ":frobnicate"), Flow::Continue);
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
    }

    #[test]
    fn test_transform_toggle() {
        let mut session = Session::new(&AppConfig::default());
        assert!(session.auto_transform());
        handle_line(&mut session, ":transform off");
        assert!(!session.auto_transform());
        handle_line(&mut session, ":transform on");
        assert!(session.auto_transform());
    }

    #[test]
    fn test_project_command_selects_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("artisan"), "").unwrap();
        let mut session = Session::new(&AppConfig::default());

        handle_line(&mut session, &format!(":project {}", dir.path().display()));

        assert!(session.project().is_some());
        assert_eq!(session.logs().count_kind(LogKind::Error), 0);
    }

    #[test]
    fn test_code_without_project_is_logged() {
        let mut session = Session::new(&AppConfig::default());
        handle_line(&mut session, "User::all()");
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
    }

    #[test]
    fn test_export_requires_path() {
        let mut session = Session::new(&AppConfig::default());
        handle_line(&mut session, ":export");
        assert_eq!(session.logs().count_kind(LogKind::Error), 1);
    }
}
