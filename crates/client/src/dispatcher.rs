//! Socket event dispatcher.
//!
//! Maps named server events onto the shared session state and chat sink, and
//! queues the client's own intent events (movement, ping, chat) for the
//! socket task. Handlers run synchronously on the socket task, one event at
//! a time, in transport delivery order.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use petri_protocol::{ClientMessage, EnemyState, FoodItem, ServerMessage, Target};

use crate::chat::ChatSink;
use crate::state::{SharedPlayer, SharedStatus};

/// Partial world snapshot pushed to the registered update callback.
///
/// A field is `None` when the triggering event did not carry that
/// collection, `Some` (possibly empty) when it did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldUpdate {
    pub enemies: Option<Vec<EnemyState>>,
    pub food: Option<Vec<FoodItem>>,
}

/// Callback invoked when the server pushes world state.
pub type UpdateFn = Box<dyn FnMut(WorldUpdate) + Send + 'static>;

/// Binds the socket connection to client state.
///
/// One dispatcher exists per connection. Inbound events mutate the shared
/// status, player record, and chat sink; outbound operations queue events on
/// the socket task's write channel and never block.
///
/// Cheap to clone; all clones drive the same connection.
pub struct SocketDispatcher {
    status: SharedStatus,
    player: SharedPlayer,
    chat: Arc<dyn ChatSink>,
    update_fn: Arc<Mutex<Option<UpdateFn>>>,
    outbound: mpsc::Sender<ClientMessage>,
    /// Signal to the socket task to close (consumed on first use)
    close_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl SocketDispatcher {
    /// Create a dispatcher wired to a socket task.
    ///
    /// Normally done by [`crate::socket::connect`]; direct construction is
    /// for tests and custom transports.
    pub fn new(
        status: SharedStatus,
        player: SharedPlayer,
        chat: Arc<dyn ChatSink>,
        outbound: mpsc::Sender<ClientMessage>,
        close_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            status,
            player,
            chat,
            update_fn: Arc::new(Mutex::new(None)),
            outbound,
            close_tx: Arc::new(Mutex::new(Some(close_tx))),
        }
    }

    /// Register the world-update callback.
    ///
    /// A single slot: registering replaces any previously registered
    /// callback. The callback runs on the socket task in arrival order.
    /// The slot stays locked while the callback runs, so it must not call
    /// [`Self::on_update`] from inside itself.
    pub fn on_update<F>(&self, callback: F)
    where
        F: FnMut(WorldUpdate) + Send + 'static,
    {
        let mut slot = self.update_fn.lock();
        *slot = Some(Box::new(callback));
    }

    // =========================================================================
    // Outbound intent
    // =========================================================================

    /// Queue a move-intent event.
    ///
    /// Coordinates are forwarded as-is; the server owns bounds checking.
    pub fn send_movement_target(&self, target: Target) {
        self.queue(ClientMessage::PlayerSendTarget(target));
    }

    /// Stamp the probe departure time and queue a ping event.
    pub fn send_ping(&self) {
        self.status.lock().last_ping_sent_at = Some(Instant::now());
        self.queue(ClientMessage::Ping);
    }

    /// Queue a chat line along with a snapshot of the local player record.
    pub fn send_chat(&self, message: impl Into<String>) {
        let player = self.player.lock().clone();
        self.queue(ClientMessage::PlayerChat {
            message: message.into(),
            player,
        });
    }

    /// Ask the socket task to close the connection.
    ///
    /// Idempotent: the close signal is consumed on first use and later calls
    /// are no-ops. The transport reports back through
    /// [`Self::handle_disconnected`] once the connection actually goes down.
    pub fn close_transport(&self) {
        if let Some(tx) = self.close_tx.lock().take() {
            let _ = tx.send(());
        }
    }

    fn queue(&self, message: ClientMessage) {
        // Fire-and-forget: a full queue means the writer is stalled and the
        // next world refresh will supersede whatever we drop here.
        if let Err(e) = self.outbound.try_send(message) {
            tracing::warn!("Dropping outbound event: {}", e);
        }
    }

    // =========================================================================
    // Transport lifecycle (called by the socket task)
    // =========================================================================

    /// Transport established.
    pub fn handle_connected(&self) {
        tracing::info!("Socket: connected");
        self.status.lock().connected = true;
    }

    /// Transport could not be established.
    pub fn handle_connect_failed(&self) {
        tracing::warn!("Socket: connect failed");
        self.close_transport();
        self.status.lock().connected = false;
    }

    /// Transport closed, whether by the server, an error, or a local close.
    pub fn handle_disconnected(&self) {
        tracing::info!("Socket: disconnected");
        self.close_transport();
        self.status.lock().connected = false;
    }

    // =========================================================================
    // Inbound events (called by the socket task)
    // =========================================================================

    /// Apply one inbound server event.
    pub fn handle_message(&self, message: ServerMessage) {
        match message {
            ServerMessage::Pong => {
                tracing::debug!("Socket: pong");
                let last_ping = self.status.lock().last_ping_sent_at;
                match last_ping {
                    Some(sent_at) => {
                        let latency = sent_at.elapsed().as_millis();
                        self.chat.add_system_line(format!("Ping: {} ms", latency));
                    }
                    None => {
                        tracing::debug!("Pong with no ping outstanding, ignoring");
                    }
                }
            }
            ServerMessage::Welcome { name, id, hue } => {
                tracing::debug!("Socket: welcome as {} (id {})", name, id);
                self.status.lock().started = true;

                let mut player = self.player.lock();
                player.name = name;
                player.id = id;
                player.hue = hue;
            }
            ServerMessage::PlayerDisconnect {
                enemies,
                disconnect_name,
            } => {
                tracing::debug!("Socket: player_disconnect ({})", disconnect_name);
                self.push_update(WorldUpdate {
                    enemies: Some(enemies),
                    food: None,
                });
                self.chat
                    .add_system_line(format!("Player {} disconnected!", disconnect_name));
            }
            ServerMessage::PlayerJoin {
                enemies,
                connected_name,
            } => {
                tracing::debug!("Socket: player_join ({})", connected_name);
                self.push_update(WorldUpdate {
                    enemies: Some(enemies),
                    food: None,
                });
                self.chat
                    .add_system_line(format!("Player {} connected!", connected_name));
            }
            ServerMessage::PlayerRip => {
                tracing::debug!("Socket: player_rip");
                self.status.lock().started = false;
                self.close_transport();
            }
            ServerMessage::ServerSendPlayerChat { sender, message } => {
                tracing::debug!("Socket: chat from {}", sender);
                self.chat.add_chat_line(sender, message);
            }
            ServerMessage::ServerTellPlayerMove { update, food } => {
                tracing::trace!("Socket: player_move ({}, {})", update.x, update.y);
                self.push_update(WorldUpdate {
                    enemies: None,
                    food: Some(food),
                });

                // Fold the correction into the prediction offset before
                // adopting the server's position.
                let mut player = self.player.lock();
                let drift_x = player.x - update.x;
                let drift_y = player.y - update.y;
                player.offset.x += drift_x;
                player.offset.y += drift_y;
                player.x = update.x;
                player.y = update.y;
                player.mass = update.mass;
            }
            ServerMessage::ServerTellUpdateAll { enemies, food } => {
                tracing::trace!(
                    "Socket: update_all ({} enemies, {} food)",
                    enemies.len(),
                    food.len()
                );
                self.push_update(WorldUpdate {
                    enemies: Some(enemies),
                    food: Some(food),
                });
            }
            ServerMessage::Unknown => {
                tracing::trace!("Ignoring unknown server event");
            }
        }
    }

    fn push_update(&self, update: WorldUpdate) {
        let mut slot = self.update_fn.lock();
        if let Some(ref mut callback) = *slot {
            callback(update);
        }
    }
}

impl Clone for SocketDispatcher {
    fn clone(&self) -> Self {
        Self {
            status: Arc::clone(&self.status),
            player: Arc::clone(&self.player),
            chat: Arc::clone(&self.chat),
            update_fn: Arc::clone(&self.update_fn),
            outbound: self.outbound.clone(),
            close_tx: Arc::clone(&self.close_tx),
        }
    }
}
