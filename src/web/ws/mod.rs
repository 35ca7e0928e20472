//! WebSocket module for live chat rooms.

pub mod chat;

pub use chat::chat_ws_handler;
