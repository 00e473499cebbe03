//! Petri console client.
//!
//! Headless shell around the client core: connects to the arena server,
//! mirrors chat and world traffic into the log, and reads player intent
//! from stdin. Useful for poking at a server without a renderer.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petri_client::{connect, ChatSink, ConnectionStatus, SocketDispatcher};
use petri_protocol::{PlayerRecord, Target};

const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3000/game";

/// Chat sink that mirrors lines to the console log.
struct ConsoleChat;

impl ChatSink for ConsoleChat {
    fn add_system_line(&self, text: String) {
        tracing::info!("[chat] * {}", text);
    }

    fn add_chat_line(&self, sender: String, text: String) {
        tracing::info!("[chat] <{}> {}", sender, text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petri_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = std::env::var("PETRI_SERVER").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    tracing::info!("Starting Petri console client against {}", url);

    let status = Arc::new(Mutex::new(ConnectionStatus::default()));
    let player = Arc::new(Mutex::new(PlayerRecord::default()));

    let dispatcher = connect(
        &url,
        Arc::clone(&status),
        Arc::clone(&player),
        Arc::new(ConsoleChat),
    )?;

    dispatcher.on_update(|update| {
        let enemies = update.enemies.as_ref().map_or(0, Vec::len);
        let food = update.food.as_ref().map_or(0, Vec::len);
        tracing::debug!("World update: {} enemies, {} food", enemies, food);
    });

    run_console(dispatcher).await;

    Ok(())
}

/// Read player intent from stdin until EOF or `/quit`.
///
/// `/move <x> <y>` steers, `/ping` probes latency, anything else is chat.
async fn run_console(dispatcher: SocketDispatcher) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(args) = line.strip_prefix("/move") {
            let mut parts = args.split_whitespace();
            let x = parts.next().and_then(|v| v.parse::<f32>().ok());
            let y = parts.next().and_then(|v| v.parse::<f32>().ok());
            match (x, y) {
                (Some(x), Some(y)) => dispatcher.send_movement_target(Target { x, y }),
                _ => tracing::warn!("Usage: /move <x> <y>"),
            }
        } else if line == "/ping" {
            dispatcher.send_ping();
        } else if line == "/quit" {
            break;
        } else {
            dispatcher.send_chat(line);
        }
    }

    dispatcher.close_transport();
}
