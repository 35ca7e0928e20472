//! Web API module for revdash.
//!
//! REST endpoints for the dashboard and chat history, plus a WebSocket
//! endpoint per pull request room.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
