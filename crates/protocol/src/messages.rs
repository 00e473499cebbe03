//! Socket event types for client-server communication
//!
//! This module contains all event types exchanged over the game socket.
//! These types are used by both server (sending ServerMessage, receiving
//! ClientMessage) and client (sending ClientMessage, receiving ServerMessage).
//!
//! Every event is a JSON object whose `type` field carries the event name in
//! snake_case. Payload fields sit next to the tag on the same object.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming an event is a breaking change
//! - Unknown event types deserialize to the `Unknown` variant

use serde::{Deserialize, Serialize};

// =============================================================================
// Client Messages (Client → Server)
// =============================================================================

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Where the player is steering; sent on every intent change
    PlayerSendTarget(Target),
    /// Latency probe, answered by `ServerMessage::Pong`
    Ping,
    /// Chat line typed by the player, carrying the full sender record
    PlayerChat {
        message: String,
        player: PlayerRecord,
    },
    /// Unknown event type for forward compatibility
    ///
    /// When deserializing an unknown event, this variant is used instead of
    /// failing. Allows older servers to gracefully handle new client events.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Server Messages (Server → Client)
// =============================================================================

/// Messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Answer to `ClientMessage::Ping`
    Pong,
    /// Session accepted; carries the identity the server assigned
    Welcome { name: String, id: u64, hue: u16 },
    /// A player left the arena; carries the surviving roster
    PlayerDisconnect {
        enemies: Vec<EnemyState>,
        #[serde(rename = "disconnectName")]
        disconnect_name: String,
    },
    /// A player entered the arena; carries the updated roster
    PlayerJoin {
        enemies: Vec<EnemyState>,
        #[serde(rename = "connectedName")]
        connected_name: String,
    },
    /// The local player was eaten and the session is over
    PlayerRip,
    /// Chat line relayed from another player
    ServerSendPlayerChat { sender: String, message: String },
    /// Authoritative correction for the local player, plus nearby food
    ServerTellPlayerMove {
        update: PlayerUpdate,
        food: Vec<FoodItem>,
    },
    /// Periodic refresh of everything visible to this player
    ServerTellUpdateAll {
        enemies: Vec<EnemyState>,
        food: Vec<FoodItem>,
    },
    /// Unknown event type for forward compatibility
    ///
    /// When deserializing an unknown event, this variant is used instead of
    /// failing. Allows older clients to gracefully handle new server events.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Wire Records
// =============================================================================

/// World coordinates the local player is steering toward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub x: f32,
    pub y: f32,
}

/// Accumulated drift between the locally predicted position and the last
/// server-authoritative one
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// Full state of the local player as mirrored to the server
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u64,
    pub name: String,
    /// Cell color, degrees on the HSL wheel
    pub hue: u16,
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub offset: Offset,
}

/// Another player's cell as visible to this client
///
/// Only `id` is required on the wire; sparse rosters fill the rest with
/// defaults rather than rejecting the event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnemyState {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hue: u16,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub mass: f32,
}

/// One food pellet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u64,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub hue: u16,
}

/// Server-authoritative position and mass for the local player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
}
