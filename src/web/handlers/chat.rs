//! Chat history handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::chat::{Message, NewMessage};
use crate::web::dto::{
    ApiQuery, HistoryQuery, OkResponse, PostMessageRequest, PostMessageResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{room_key, AppState, RoomPath};

/// GET /api/chat/:owner/:repo/:pr - Recent messages, oldest first.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(path): Path<RoomPath>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let key = room_key(path);
    let limit = query.limit.unwrap_or(state.history_limit);
    let messages = state.chat.history(&key, limit).await?;
    Ok(Json(messages))
}

/// POST /api/chat/:owner/:repo/:pr - Store a message and push it to the room.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(path): Path<RoomPath>,
    ValidatedJson(req): ValidatedJson<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let key = room_key(path);
    let message = NewMessage::new(req.author, req.role, req.content);
    let id = state.chat.post(&key, &message).await?;
    Ok(Json(PostMessageResponse { id }))
}

/// DELETE /api/chat/:owner/:repo/:pr - Delete the room's history.
pub async fn clear_messages(
    State(state): State<Arc<AppState>>,
    Path(path): Path<RoomPath>,
) -> Result<Json<OkResponse>, ApiError> {
    state.chat.clear(&room_key(path)).await?;
    Ok(Json(OkResponse::new()))
}
