//! Chat module for revdash.
//!
//! This module provides per-pull-request chat rooms:
//! - Persistent message log (`MessageStore`)
//! - Live connection fan-out (`RoomRegistry`)
//! - Store-then-broadcast posting (`ChatService`)
//! - Live connection lifecycle (`ChatSession`)

mod message;
mod registry;
mod service;
mod session;
mod store;

pub use message::{BroadcastMessage, Message, NewMessage, Role, RoomKey};
pub use registry::{Connection, ConnectionId, DeliveryError, RoomRegistry};
pub use service::ChatService;
pub use session::{parse_payload, ChatSession, Inbound, SessionState, DEFAULT_AUTHOR};
pub use store::MessageStore;
