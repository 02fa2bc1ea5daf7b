//! Faqchat CLI — entry point.
//!
//! # Commands
//!
//! - `faqchat chat [-m MESSAGE]` — chat with the assistant (single-shot or REPL)
//! - `faqchat sessions` — list saved sessions
//! - `faqchat export [-o FILE]` — export the active session transcript
//! - `faqchat upload FILE` — upload a FAQ document to the knowledge base

mod console;
mod helpers;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use faqchat_client::{HttpAnswerClient, HttpUploadClient};
use faqchat_controller::{ConversationController, Presenter, UploadController};
use faqchat_core::config::{load_config, Config};
use faqchat_core::session::SessionRepository;
use faqchat_core::store::StateStore;

use console::ConsolePresenter;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 💬 Faqchat — chat front end for your FAQ answering service
#[derive(Parser)]
#[command(name = "faqchat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single question (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List saved chat sessions
    Sessions,

    /// Export the active session transcript
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a FAQ document (.json or .csv) to the knowledge base
    Upload {
        /// Path of the document to upload
        file: PathBuf,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, logs } => {
            init_logging(logs);
            run_chat(message).await
        }
        Commands::Sessions => {
            init_logging(false);
            let app = build_app(&load_config(None))?;
            app.chat.show_sessions();
            Ok(())
        }
        Commands::Export { output } => {
            init_logging(false);
            run_export(output)
        }
        Commands::Upload { file, logs } => {
            init_logging(logs);
            let app = build_app(&load_config(None))?;
            app.uploads.upload(Some(&file)).await;
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>) -> Result<()> {
    let config = load_config(None);
    let app = build_app(&config)?;

    match message {
        Some(msg) => {
            // Single-shot mode
            app.chat.submit(&msg).await;
        }
        None => {
            repl::run(&app.chat, &app.uploads).await?;
        }
    }

    Ok(())
}

fn run_export(output: Option<PathBuf>) -> Result<()> {
    let app = build_app(&load_config(None))?;
    let transcript = app
        .chat
        .export_transcript()
        .context("nothing to export")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &transcript)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Transcript written to {}", path.display());
        }
        None => print!("{transcript}"),
    }

    Ok(())
}

// ─────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────

struct App {
    chat: ConversationController,
    uploads: UploadController,
}

/// Build the controllers from the loaded configuration.
fn build_app(config: &Config) -> Result<App> {
    let state_dir = helpers::expand_tilde(&config.storage.state_dir);
    let store = StateStore::new(Some(state_dir)).context("failed to open state store")?;
    let repository = Arc::new(SessionRepository::load(store));

    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new());
    let timeout = Duration::from_secs(config.server.request_timeout);
    let answers = Arc::new(HttpAnswerClient::new(&config.server.api_base, timeout));
    let uploads_client = Arc::new(HttpUploadClient::new(&config.server.api_base, timeout));

    let chat = ConversationController::new(repository, answers, presenter.clone());
    let uploads = UploadController::new(uploads_client, presenter);

    Ok(App { chat, uploads })
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("faqchat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
