//! Response DTOs for the dashboard API.

use serde::Serialize;

use crate::coderabbit::ReportWindow;

/// Id of a stored message.
#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub id: i64,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a sync run.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub ok: bool,
    /// Number of messages posted.
    pub posted: usize,
}

/// Result of a report sync run.
#[derive(Debug, Serialize)]
pub struct SyncReportResponse {
    pub ok: bool,
    pub posted: usize,
    pub window: ReportWindow,
}

/// Link to a posted comment.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub url: String,
}
