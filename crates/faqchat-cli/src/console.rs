//! Console presenter — renders controller events to the terminal.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use colored::Colorize;

use faqchat_controller::{EphemeralHandle, Presenter};
use faqchat_core::types::{Sender, Session};
use faqchat_core::utils;

/// Width of the upload progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Terminal implementation of [`Presenter`].
///
/// Messages render as single lines so the ephemeral typing indicator can be
/// taken back with an ANSI line clear.
pub struct ConsolePresenter {
    next_handle: AtomicU64,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
        }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ConsolePresenter {
    fn render_session_list(&self, sessions: &[Session], active_id: &str) {
        println!();
        for (index, session) in sessions.iter().enumerate() {
            let marker = if session.id == active_id {
                "●".green()
            } else {
                " ".normal()
            };
            let preview = session
                .messages
                .last()
                .map(|m| utils::truncate_string(&m.text, 40))
                .unwrap_or_default();
            println!(
                "{} {}. {}  {}",
                marker,
                index + 1,
                session.title.bold(),
                preview.dimmed()
            );
        }
        println!();
    }

    fn render_message(&self, sender: Sender, text: &str) -> EphemeralHandle {
        match sender {
            // The REPL prompt already echoed the user's input.
            Sender::User => {}
            Sender::Bot => println!("{} {}", "AI Assistant:".cyan().bold(), text),
        }
        EphemeralHandle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    fn remove_ephemeral(&self, _handle: EphemeralHandle) {
        // The removable element is the most recently printed line.
        print!("\x1b[1A\x1b[2K");
        let _ = std::io::stdout().flush();
    }

    fn notify(&self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("{} {}", "✖".red().bold(), message);
        } else {
            println!("{} {}", "✔".green().bold(), message);
        }
    }

    fn report_upload_progress(&self, fraction: f64) {
        if fraction <= 0.0 {
            eprint!("\r{}\r", " ".repeat(PROGRESS_BAR_WIDTH + 20));
        } else {
            let fraction = fraction.clamp(0.0, 1.0);
            let filled = (fraction * PROGRESS_BAR_WIDTH as f64).round() as usize;
            eprint!(
                "\rUploading [{}{}] {:>3}%",
                "#".repeat(filled),
                "-".repeat(PROGRESS_BAR_WIDTH - filled),
                (fraction * 100.0).round() as u32
            );
        }
        let _ = std::io::stderr().flush();
    }
}
