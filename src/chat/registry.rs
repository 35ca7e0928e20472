//! Room registry.
//!
//! Tracks which live connections are subscribed to which room and fans
//! messages out to them. Each connection is represented by the sending half
//! of an unbounded channel; the connection's own writer task drains the other
//! half onto the socket.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use super::message::{BroadcastMessage, RoomKey};

/// Unique id of a live connection.
pub type ConnectionId = Uuid;

/// Delivery to a single connection failed because its receiving side is gone.
#[derive(Debug, Error)]
#[error("connection {0} is closed")]
pub struct DeliveryError(pub ConnectionId);

/// Registry-side handle of a live connection.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<BroadcastMessage>,
}

impl Connection {
    /// Create a connection handle and the receiver its writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BroadcastMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id: Uuid::new_v4(),
            sender,
        };
        (connection, receiver)
    }

    /// Get the connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queue a message for this connection.
    pub fn deliver(&self, message: &BroadcastMessage) -> Result<(), DeliveryError> {
        self.sender
            .send(message.clone())
            .map_err(|_| DeliveryError(self.id))
    }
}

/// Room key to member set.
type Rooms = HashMap<RoomKey, HashMap<ConnectionId, Connection>>;

/// Registry of live connections per room.
///
/// A room entry exists only while it has at least one member. All mutation
/// and fan-out happen under one lock, so a broadcast never observes a
/// half-removed member.
pub struct RoomRegistry {
    rooms: Mutex<Rooms>,
}

impl RoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Register a connection under a room.
    ///
    /// Returns false if the connection was already a member (no-op).
    pub async fn join(&self, key: &RoomKey, connection: Connection) -> bool {
        let mut rooms = self.rooms.lock().await;
        let members = rooms.entry(key.clone()).or_default();

        if members.contains_key(&connection.id) {
            return false;
        }

        tracing::debug!(room = %key, connection = %connection.id, "Connection joined");
        members.insert(connection.id, connection);
        true
    }

    /// Remove a connection from a room.
    ///
    /// Returns true if the connection was a member. The room entry is dropped
    /// when its last member leaves.
    pub async fn leave(&self, key: &RoomKey, id: ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let removed = remove_member(&mut rooms, key, id);
        if removed {
            tracing::debug!(room = %key, connection = %id, "Connection left");
        }
        removed
    }

    /// Deliver a message to every member of a room.
    ///
    /// Members whose delivery fails are removed as if they had left. Returns
    /// the number of members the message was delivered to.
    pub async fn broadcast(&self, key: &RoomKey, message: &BroadcastMessage) -> usize {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get(key) else {
            return 0;
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for connection in members.values() {
            match connection.deliver(message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(room = %key, error = %e, "Dropping connection after failed delivery");
                    failed.push(connection.id);
                }
            }
        }

        for id in failed {
            remove_member(&mut rooms, key, id);
        }

        delivered
    }

    /// Number of members in a room.
    pub async fn member_count(&self, key: &RoomKey) -> usize {
        self.rooms
            .lock()
            .await
            .get(key)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Whether a room currently has an entry.
    pub async fn has_room(&self, key: &RoomKey) -> bool {
        self.rooms.lock().await.contains_key(key)
    }

    /// Number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Total number of live connections across all rooms.
    pub async fn total_connections(&self) -> usize {
        self.rooms.lock().await.values().map(HashMap::len).sum()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove one member, dropping the room entry once it is empty.
fn remove_member(rooms: &mut Rooms, key: &RoomKey, id: ConnectionId) -> bool {
    let Some(members) = rooms.get_mut(key) else {
        return false;
    };

    let removed = members.remove(&id).is_some();
    if members.is_empty() {
        rooms.remove(key);
    }
    removed
}
