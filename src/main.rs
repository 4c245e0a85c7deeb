use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcp_chat::session::{ChatSession, SessionOptions};
use mcp_chat::tui::{ChatApp, TerminalBell};
use mcp_chat::{Config, SocketConnector};

#[derive(Parser)]
#[command(name = "mcp-chat")]
#[command(author, version, about = "Terminal chat client for the MCP research assistant", long_about = None)]
struct Cli {
    /// Server origin, e.g. http://localhost:8000 (the socket is at /ws)
    #[arg(short, long)]
    url: Option<String>,

    /// Config file (default: <config dir>/mcp-chat/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with audible cues off
    #[arg(long)]
    no_sound: bool,

    /// Queue messages typed while disconnected and send them on reconnect
    #[arg(long)]
    queue_offline: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(verbose: bool) -> Result<PathBuf> {
    let log_dir = Config::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("mcp-chat.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = if verbose {
        "mcp_chat=debug"
    } else {
        "mcp_chat=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(log_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.url {
        config.server.origin = url;
    }
    if cli.no_sound {
        config.ui.sound = false;
    }
    if cli.queue_offline {
        config.connection.queue_while_disconnected = true;
    }

    tracing::info!(
        origin = %config.server.origin,
        log = %log_path.display(),
        "Starting mcp-chat"
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(
        SessionOptions::from_config(&config),
        Box::new(SocketConnector::new(events_tx)),
        Box::new(TerminalBell::stdout()),
    );

    let mut app = ChatApp::new(session, events_rx, config.ui.clone())?;
    app.run().await
}
