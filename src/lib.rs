//! revdash - code review dashboard backend with per-pull-request chat.
//!
//! Serves review analytics from an external report API and runs a chat room
//! for every pull request, persisted in SQLite and pushed live over
//! WebSockets. Pull request comments and report insights can be mirrored
//! into the rooms.

pub mod chat;
pub mod coderabbit;
pub mod config;
pub mod db;
pub mod error;
pub mod github;
pub mod logging;
pub mod sync;
pub mod web;

pub use chat::{ChatService, Message, MessageStore, NewMessage, Role, RoomKey, RoomRegistry};
pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{Result, RevdashError};
