//! Chat WebSocket handler.
//!
//! Bridges a socket to a [`ChatSession`]: inbound frames feed the session,
//! and a writer task drains the room's broadcasts onto the socket.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::chat::{ChatService, ChatSession, Inbound, RoomKey};
use crate::web::handlers::{room_key, AppState, RoomPath};

/// WebSocket chat handler.
///
/// GET /ws/:owner/:repo/:pr
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(path): Path<RoomPath>,
) -> Response {
    let key = room_key(path);
    let chat = state.chat.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, chat, key))
}

/// Map a socket frame to a session event. Frames other than text and close
/// are ignored.
fn to_inbound(frame: Result<Message, axum::Error>) -> Option<Inbound> {
    match frame {
        Ok(Message::Text(text)) => Some(Inbound::Text(text.to_string())),
        Ok(Message::Close(_)) => Some(Inbound::Close),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("WebSocket error: {}", e);
            Some(Inbound::Close)
        }
    }
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, chat: ChatService, key: RoomKey) {
    let (mut ws_sender, ws_receiver) = socket.split();

    let mut session = ChatSession::new(chat, key);
    let Some(mut outbound) = session.join().await else {
        return;
    };
    let connection = session.connection_id();

    // Ends once the registry drops the connection or the socket stops accepting writes
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!("Failed to encode broadcast: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let inbound = ws_receiver.filter_map(|frame| async move { to_inbound(frame) });
    if let Err(e) = session.run(Box::pin(inbound)).await {
        tracing::error!(%connection, error = %e, "Live connection torn down");
    }

    if let Err(e) = writer.await {
        tracing::warn!(%connection, "WebSocket writer task failed: {}", e);
    }
}
