//! Chat session handler.
//!
//! Owns one live connection's lifecycle: joins it to its room, turns inbound
//! payloads into stored-and-broadcast messages, and removes it from the room
//! when the transport goes away or a store write fails.

use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

use super::message::{BroadcastMessage, NewMessage, Role, RoomKey};
use super::registry::{Connection, ConnectionId};
use super::service::ChatService;
use crate::{Result, RevdashError};

/// Author used when a payload does not name one.
pub const DEFAULT_AUTHOR: &str = "anon";

/// Something received from the client side of a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame carrying a JSON payload.
    Text(String),
    /// The client closed the connection or the transport failed.
    Close,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet registered in its room.
    Connecting,
    /// Registered and relaying messages.
    Joined,
    /// Removed from its room. Final.
    Terminated,
}

/// Parse a client payload into a message.
///
/// Returns `Ok(None)` when the content is blank, which callers discard
/// silently. Missing `author` and `role` default to `"anon"` and `"user"`;
/// non-string values are rendered as JSON text. Content is trimmed.
pub fn parse_payload(text: &str) -> Result<Option<NewMessage>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| RevdashError::Validation(format!("invalid payload: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(RevdashError::Validation(
            "payload must be a JSON object".to_string(),
        ));
    };

    let field = |name: &str| match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    let content = field("content").unwrap_or_default();
    let content = content.trim();
    if content.is_empty() {
        return Ok(None);
    }

    let author = field("author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let role = match field("role") {
        Some(role) => role.parse::<Role>()?,
        None => Role::User,
    };

    Ok(Some(NewMessage::new(author, role, content)))
}

/// Handler for one live connection.
pub struct ChatSession {
    chat: ChatService,
    key: RoomKey,
    connection_id: ConnectionId,
    pending: Option<(Connection, mpsc::UnboundedReceiver<BroadcastMessage>)>,
    state: SessionState,
}

impl ChatSession {
    /// Create a session for a room. The connection is not yet registered.
    pub fn new(chat: ChatService, key: RoomKey) -> Self {
        let (connection, receiver) = Connection::channel();
        Self {
            chat,
            key,
            connection_id: connection.id(),
            pending: Some((connection, receiver)),
            state: SessionState::Connecting,
        }
    }

    /// Register the connection in its room.
    ///
    /// Returns the receiver of broadcasts for this connection; the caller's
    /// writer drains it onto the transport. The receiver ends once the
    /// connection has left the room. Only a connecting session can join:
    /// returns `None` once the session has joined or terminated.
    pub async fn join(&mut self) -> Option<mpsc::UnboundedReceiver<BroadcastMessage>> {
        if self.state != SessionState::Connecting {
            tracing::debug!(room = %self.key, state = ?self.state, "Ignoring join");
            return None;
        }
        let (connection, receiver) = self.pending.take()?;

        self.chat.registry().join(&self.key, connection).await;
        self.state = SessionState::Joined;
        tracing::info!(room = %self.key, connection = %self.connection_id, "Live connection joined");
        Some(receiver)
    }

    /// Get the room key.
    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    /// Get the connection id.
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Get the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle one inbound text payload.
    ///
    /// Returns the stored id, or `None` if the payload was discarded.
    /// Store failures are returned to the caller.
    pub async fn handle_text(&self, text: &str) -> Result<Option<i64>> {
        let message = match parse_payload(text) {
            Ok(Some(message)) => message,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(room = %self.key, error = %e, "Discarding malformed payload");
                return Ok(None);
            }
        };

        let id = self.chat.post(&self.key, &message).await?;
        Ok(Some(id))
    }

    /// Relay inbound payloads until the transport closes.
    ///
    /// The connection always leaves its room before this returns. A store
    /// failure ends the session and is returned.
    pub async fn run<S>(mut self, mut inbound: S) -> Result<()>
    where
        S: Stream<Item = Inbound> + Unpin,
    {
        let result = loop {
            match inbound.next().await {
                Some(Inbound::Text(text)) => {
                    if let Err(e) = self.handle_text(&text).await {
                        break Err(e);
                    }
                }
                Some(Inbound::Close) | None => break Ok(()),
            }
        };

        self.terminate().await;
        result
    }

    /// Leave the room. Idempotent.
    pub async fn terminate(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        if self.state == SessionState::Joined {
            self.chat
                .registry()
                .leave(&self.key, self.connection_id)
                .await;
        }
        self.pending = None;
        self.state = SessionState::Terminated;
        tracing::info!(room = %self.key, connection = %self.connection_id, "Live connection terminated");
    }
}
