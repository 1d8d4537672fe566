//! Minimal CLI over `todolist_core`.
//!
//! # Responsibility
//! - Presentation glue only: parse one command, drive the service, render.
//! - All invariants live in the core; this binary renders what it is given.

use chrono::{DateTime, Utc};
use log::warn;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use todolist_core::{
    default_log_level, init_logging, validate_text, ConfirmPrompt, FileMedium, Filter,
    SystemClock, Todo, TodoId, TodoService, TodoServiceOptions, TodoStorage,
};

const DATA_DIR_ENV: &str = "TODOLIST_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".todolist";

const USAGE: &str = "\
todo — persistent task list (core v{version})

Usage:
  todo add <text>...
  todo list [all|active|completed]
  todo toggle <id-prefix>
  todo rm <id-prefix> [--yes]
  todo edit <id-prefix> <text>...
  todo clear-completed [--yes]
  todo clear-all [--yes]
  todo stats

Data directory: $TODOLIST_DATA_DIR (default ./.todolist)";

/// Blocking yes/no prompt on the controlling terminal.
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(message) = run(args) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run(mut args: Vec<String>) -> Result<(), String> {
    if args.is_empty() || args[0] == "help" || args[0] == "--help" {
        println!(
            "{}",
            USAGE.replace("{version}", todolist_core::core_version())
        );
        return Ok(());
    }

    let data_dir = PathBuf::from(
        std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
    );
    if let Err(message) = init_logging(default_log_level(), data_dir.join("logs")) {
        // Logging is best-effort for a CLI run; the command still proceeds.
        eprintln!("warning: {message}");
    }

    let skip_confirm = take_flag(&mut args, "--yes");
    if args.is_empty() {
        return Err("a command is required; try `todo help`".to_string());
    }
    let command = args.remove(0);

    let storage = TodoStorage::new(FileMedium::new(&data_dir));
    let options = TodoServiceOptions {
        confirm_delete: !skip_confirm,
        ..TodoServiceOptions::default()
    };
    let mut service = TodoService::new(storage, SystemClock, StdinPrompt, options);
    service.start();

    if !service.storage_available() {
        warn!("event=cli_start module=cli status=degraded reason=storage_unavailable");
        eprintln!("warning: storage unavailable, changes will not persist");
    }
    if let Some(message) = service.error() {
        eprintln!("warning: {message}");
    }

    let result = dispatch(&mut service, &command, &args, skip_confirm);
    // Forces the debounced tail out before the process exits.
    service.stop();
    result
}

fn dispatch(
    service: &mut TodoService<FileMedium, SystemClock, StdinPrompt>,
    command: &str,
    args: &[String],
    skip_confirm: bool,
) -> Result<(), String> {
    match command {
        "add" => {
            let text = require_text(args, "add")?;
            validate_text(&text).map_err(|err| err.to_string())?;
            let id = service.add(&text).map_err(|err| err.to_string())?;
            println!("added {}", short_id(id));
            Ok(())
        }
        "list" => {
            let filter = match args.first() {
                None => Filter::All,
                Some(raw) => {
                    Filter::parse(raw).ok_or_else(|| format!("unknown filter `{raw}`"))?
                }
            };
            let now = Utc::now();
            let visible = service.filtered(filter);
            if visible.is_empty() {
                println!("nothing to show");
            }
            for todo in visible {
                println!("{}", render_todo(todo, now));
            }
            Ok(())
        }
        "toggle" => {
            let id = resolve_id(service.todos(), args.first().map(String::as_str))?;
            service.toggle(id);
            Ok(())
        }
        "rm" => {
            let id = resolve_id(service.todos(), args.first().map(String::as_str))?;
            service.remove(id, skip_confirm);
            Ok(())
        }
        "edit" => {
            let id = resolve_id(service.todos(), args.first().map(String::as_str))?;
            let text = require_text(&args[1..], "edit")?;
            service.edit(id, &text).map_err(|err| err.to_string())
        }
        "clear-completed" => {
            service.clear_completed();
            Ok(())
        }
        "clear-all" => {
            service.clear_all();
            Ok(())
        }
        "stats" => {
            let stats = service.stats();
            println!(
                "total: {}  active: {}  completed: {}",
                stats.total, stats.active, stats.completed
            );
            Ok(())
        }
        other => Err(format!("unknown command `{other}`; try `todo help`")),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|arg| arg != flag);
    args.len() != before
}

fn require_text(args: &[String], command: &str) -> Result<String, String> {
    if args.is_empty() {
        return Err(format!("`{command}` needs text"));
    }
    Ok(args.join(" "))
}

/// Resolves a case-insensitive id prefix against the current list.
fn resolve_id(todos: &[Todo], prefix: Option<&str>) -> Result<TodoId, String> {
    let prefix = prefix.ok_or("an id prefix is required")?.to_lowercase();
    if prefix.is_empty() {
        return Err("an id prefix is required".to_string());
    }

    let matches: Vec<TodoId> = todos
        .iter()
        .filter(|todo| todo.id.to_string().starts_with(&prefix))
        .map(|todo| todo.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("no todo matches id prefix `{prefix}`")),
        _ => Err(format!("id prefix `{prefix}` is ambiguous")),
    }
}

fn render_todo(todo: &Todo, now: DateTime<Utc>) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!(
        "[{mark}] {}  {}  ({})",
        short_id(todo.id),
        todo.text,
        relative_age(todo.updated_at, now)
    )
}

/// First UUID group, enough to disambiguate in practice.
fn short_id(id: TodoId) -> String {
    id.to_string().chars().take(8).collect()
}

fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    if elapsed.num_minutes() < 60 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("{}h ago", elapsed.num_hours());
    }
    if elapsed.num_days() < 30 {
        return format!("{}d ago", elapsed.num_days());
    }
    then.format("%Y-%m-%d").to_string()
}
