//! Socket transport task.
//!
//! One task owns the WebSocket connection end to end: the connect attempt,
//! the read side, the outbound intent queue, and the close signal all run in
//! a single select loop. That keeps dispatcher handlers strictly sequential,
//! in transport delivery order.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use petri_protocol::{ClientMessage, ServerMessage};

use crate::chat::ChatSink;
use crate::dispatcher::SocketDispatcher;
use crate::state::{SharedPlayer, SharedStatus};

/// Outbound queue depth; intent beyond this is dropped fire-and-forget.
const OUTBOUND_QUEUE_DEPTH: usize = 32;

/// Errors surfaced before any connection attempt happens.
///
/// Failures after `connect` returns (refused connection, dropped transport)
/// are reported through the dispatcher's lifecycle handlers and the shared
/// status instead.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}', expected ws or wss")]
    UnsupportedScheme { scheme: String },
}

/// Open the connection to the game server and return its dispatcher.
///
/// Validates the URL shape, wires up the outbound queue and close signal,
/// and spawns the socket task. Must be called from within a tokio runtime.
/// Connection progress lands in `status`; the caller polls `connected` and
/// `started` rather than awaiting anything here.
pub fn connect(
    url: &str,
    status: SharedStatus,
    player: SharedPlayer,
    chat: Arc<dyn ChatSink>,
) -> Result<SocketDispatcher, ConnectError> {
    let parsed = url::Url::parse(url).map_err(|source| ConnectError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "ws" | "wss") {
        return Err(ConnectError::UnsupportedScheme {
            scheme: parsed.scheme().to_string(),
        });
    }

    let (outbound_tx, outbound_rx) = mpsc::channel::<ClientMessage>(OUTBOUND_QUEUE_DEPTH);
    let (close_tx, close_rx) = oneshot::channel::<()>();

    let dispatcher = SocketDispatcher::new(status, player, chat, outbound_tx, close_tx);

    let task_dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        socket_task(String::from(parsed), task_dispatcher, outbound_rx, close_rx).await;
    });

    Ok(dispatcher)
}

async fn socket_task(
    url: String,
    dispatcher: SocketDispatcher,
    mut outbound_rx: mpsc::Receiver<ClientMessage>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", url, e);
            dispatcher.handle_connect_failed();
            return;
        }
    };

    tracing::info!("Connected to {}", url);
    dispatcher.handle_connected();

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            // Local close request
            _ = &mut close_rx => {
                tracing::info!("Close requested");
                let _ = write.send(Message::Close(None)).await;
                break;
            }

            // Outbound intent
            queued = outbound_rx.recv() => {
                let Some(message) = queued else {
                    break;
                };
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize outbound event: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(json)).await {
                    tracing::error!("Failed to send event: {}", e);
                    break;
                }
            }

            // Inbound events
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => dispatcher.handle_message(message),
                            Err(e) => {
                                tracing::warn!("Failed to parse server event: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Server closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    // Every exit path funnels through here so the status flags stay honest.
    dispatcher.handle_disconnected();
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use petri_protocol::PlayerRecord;

    use super::*;
    use crate::chat::ChatLog;
    use crate::state::ConnectionStatus;

    fn deps() -> (SharedStatus, SharedPlayer, Arc<dyn ChatSink>) {
        (
            Arc::new(Mutex::new(ConnectionStatus::default())),
            Arc::new(Mutex::new(PlayerRecord::default())),
            Arc::new(ChatLog::new()),
        )
    }

    #[test]
    fn rejects_unparseable_urls() {
        let (status, player, chat) = deps();

        let result = connect("not a url", status, player, chat);

        assert!(matches!(result, Err(ConnectError::InvalidUrl { .. })));
    }

    #[test]
    fn rejects_non_websocket_schemes() {
        let (status, player, chat) = deps();

        let result = connect("http://127.0.0.1:3000/game", status, player, chat);

        assert!(matches!(
            result,
            Err(ConnectError::UnsupportedScheme { scheme }) if scheme == "http"
        ));
    }
}
