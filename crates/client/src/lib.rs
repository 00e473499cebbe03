//! Petri client core.
//!
//! Binds a WebSocket connection to the game server onto shared client state:
//! inbound events mutate the session status, the local player record, and
//! the chat sink; outbound operations broadcast the player's intent. The
//! render loop lives outside this crate and observes the shared state plus
//! the world-update callback.

pub mod chat;
pub mod dispatcher;
pub mod socket;
pub mod state;

// Re-export commonly used entrypoints
pub use chat::{ChatLine, ChatLog, ChatSink};
pub use dispatcher::{SocketDispatcher, WorldUpdate};
pub use socket::{connect, ConnectError};
pub use state::{ConnectionStatus, SharedPlayer, SharedStatus};
