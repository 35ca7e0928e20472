//! Chat service.
//!
//! Couples the message store with the room registry so that every write path
//! (HTTP, live connection, sync) persists first and broadcasts second.

use std::sync::Arc;

use super::message::{BroadcastMessage, Message, NewMessage, RoomKey};
use super::registry::RoomRegistry;
use super::store::MessageStore;
use crate::Result;

/// Shared entry point for posting and reading chat messages.
#[derive(Clone)]
pub struct ChatService {
    store: MessageStore,
    registry: Arc<RoomRegistry>,
}

impl ChatService {
    /// Create a new chat service.
    pub fn new(store: MessageStore, registry: Arc<RoomRegistry>) -> Self {
        Self { store, registry }
    }

    /// Get the message store.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Get the room registry.
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Append a message and broadcast it to the room.
    ///
    /// Nothing is broadcast if the append fails.
    pub async fn post(&self, key: &RoomKey, message: &NewMessage) -> Result<i64> {
        let id = self.store.append(key, message).await.map_err(|e| {
            tracing::error!(room = %key, error = %e, "Failed to store message");
            e
        })?;

        let delivered = self
            .registry
            .broadcast(key, &BroadcastMessage::stored(id, message))
            .await;
        tracing::debug!(room = %key, id, delivered, "Message posted");

        Ok(id)
    }

    /// Broadcast a notice without storing it.
    pub async fn notify(&self, key: &RoomKey, notice: &BroadcastMessage) -> usize {
        self.registry.broadcast(key, notice).await
    }

    /// Read the most recent messages of a room, oldest first.
    pub async fn history(&self, key: &RoomKey, limit: u32) -> Result<Vec<Message>> {
        self.store.list(key, limit).await
    }

    /// Delete all messages of a room.
    pub async fn clear(&self, key: &RoomKey) -> Result<u64> {
        let deleted = self.store.clear(key).await?;
        tracing::info!(room = %key, deleted, "Cleared chat history");
        Ok(deleted)
    }
}
