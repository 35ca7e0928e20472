//! GitHub handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::github::parse_since;
use crate::sync::sync_github;
use crate::web::dto::{
    CommentRequest, CommentResponse, GithubSyncRequest, OptionalJson, SyncResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{room_key, AppState, RoomPath};

/// POST /api/github/comment/:owner/:repo/:pr - Post a comment on the pull request.
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    Path((owner, repo, pr)): Path<RoomPath>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let url = state
        .github
        .comment_on_pr(&owner, &repo, pr, &req.body)
        .await?;
    Ok(Json(CommentResponse { url }))
}

/// POST /api/github/sync/:owner/:repo/:pr - Mirror pull request comments into chat.
///
/// The body is optional: `{"since": ..}`, a bare timestamp string, or `null`.
pub async fn sync_comments(
    State(state): State<Arc<AppState>>,
    Path(path): Path<RoomPath>,
    OptionalJson(req): OptionalJson<GithubSyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let since = req
        .since
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_since)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let key = room_key(path);
    let posted = sync_github(&state.chat, &state.github, &key, since).await?;

    Ok(Json(SyncResponse { ok: true, posted }))
}
