//! Client-session state shared between the socket task and the rest of the
//! client.
//!
//! Handlers run synchronously on the socket task, so these are plain mutexes
//! rather than async ones. Locks are never held across an await point.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

pub use petri_protocol::PlayerRecord;

/// Transport and session flags for the current connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionStatus {
    /// Transport is established
    pub connected: bool,
    /// Server accepted the session (welcome received) and play has begun
    pub started: bool,
    /// When the most recent latency probe left the client
    pub last_ping_sent_at: Option<Instant>,
}

/// Connection status shared with the socket task.
pub type SharedStatus = Arc<Mutex<ConnectionStatus>>;

/// Local-player record shared with the socket task.
pub type SharedPlayer = Arc<Mutex<PlayerRecord>>;
