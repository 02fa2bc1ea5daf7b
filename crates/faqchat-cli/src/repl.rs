//! Interactive REPL — readline loop with slash commands.
//!
//! Plain input is submitted to the active session; `/`-prefixed commands
//! manage sessions and uploads. History persists across runs.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use faqchat_controller::{ConversationController, UploadController};
use faqchat_core::types::Session;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Run the interactive REPL loop.
pub async fn run(chat: &ConversationController, uploads: &UploadController) -> Result<()> {
    helpers::print_banner();

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C — exit cleanly
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                // Ctrl-D — exit cleanly
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nGoodbye! 👋");
            break;
        }

        let _ = editor.add_history_entry(&input);

        if let Some(command) = trimmed.strip_prefix('/') {
            dispatch_command(command, chat, uploads).await;
        } else {
            debug!(input = trimmed, "submitting");
            chat.submit(trimmed).await;
        }
    }

    save_history(&mut editor);

    Ok(())
}

/// Handle one `/command` line (already stripped of the leading slash).
async fn dispatch_command(command: &str, chat: &ConversationController, uploads: &UploadController) {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "new" => {
            let session = chat.new_session();
            println!("Started {}.", session.title.bold());
        }
        "sessions" => chat.show_sessions(),
        "switch" => {
            if arg.is_empty() {
                eprintln!("Usage: /switch <number|id>");
                return;
            }
            match resolve_session_target(arg, &chat.sessions_snapshot()) {
                Some(id) if chat.switch_to(&id) => {}
                _ => eprintln!("No such session: {arg}"),
            }
        }
        "clear" => {
            chat.clear_conversation();
            println!("{}", "Conversation cleared.".dimmed());
        }
        "export" => match chat.export_transcript() {
            Ok(transcript) => print!("{transcript}"),
            Err(e) => eprintln!("Export failed: {e}"),
        },
        "upload" => {
            if arg.is_empty() {
                eprintln!("Usage: /upload <path>");
                return;
            }
            if !faqchat_client::is_knowledge_file(arg) {
                eprintln!(
                    "{}",
                    "note: the assistant ingests .json or .csv documents".dimmed()
                );
            }
            uploads.upload(Some(Path::new(arg))).await;
        }
        "help" => print_help(),
        other => eprintln!("Unknown command: /{other} (try /help)"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /new             start a new chat session");
    println!("  /sessions        list sessions");
    println!("  /switch <n|id>   switch the active session");
    println!("  /clear           reset the active session");
    println!("  /export          print the active transcript");
    println!("  /upload <path>   upload a FAQ document (.json or .csv)");
    println!("  exit             leave");
}

/// Resolve a `/switch` argument — a 1-based list position or a raw id.
fn resolve_session_target(arg: &str, sessions: &[Session]) -> Option<String> {
    if let Ok(position) = arg.parse::<usize>() {
        if position >= 1 {
            if let Some(session) = sessions.get(position - 1) {
                return Some(session.id.clone());
            }
        }
    }
    sessions
        .iter()
        .find(|s| s.id == arg)
        .map(|s| s.id.clone())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    faqchat_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
