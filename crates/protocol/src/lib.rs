//! Petri Protocol - shared types for client and server communication
//!
//! This crate contains all types exchanged over the game socket:
//! - Socket event enums (ClientMessage, ServerMessage)
//! - Wire records embedded in events (players, enemies, food)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Tolerant reader** - Unknown event types and extra fields are accepted

pub mod messages;

// =============================================================================
// Socket Event Types
// =============================================================================
pub use messages::{
    ClientMessage, EnemyState, FoodItem, Offset, PlayerRecord, PlayerUpdate, ServerMessage, Target,
};
