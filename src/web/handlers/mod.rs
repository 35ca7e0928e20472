//! API handlers for the dashboard.

pub mod chat;
pub mod github;
pub mod report;

pub use chat::*;
pub use github::*;
pub use report::*;

use crate::chat::{ChatService, RoomKey};
use crate::coderabbit::CodeRabbitClient;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::Result;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Chat rooms and their history.
    pub chat: ChatService,
    /// Report API client.
    pub coderabbit: CodeRabbitClient,
    /// GitHub API client.
    pub github: GitHubClient,
    /// Default number of messages returned by the history endpoint.
    pub history_limit: u32,
    /// Default report sync window in days.
    pub sync_days: u32,
}

impl AppState {
    /// Create application state, building the API clients from configuration.
    pub fn new(chat: ChatService, config: &Config) -> Result<Self> {
        Ok(Self {
            chat,
            coderabbit: CodeRabbitClient::new(&config.coderabbit)?,
            github: GitHubClient::new(&config.github)?,
            history_limit: config.chat.history_limit,
            sync_days: config.coderabbit.sync_days,
        })
    }
}

/// Room path parameters `/:owner/:repo/:pr`.
pub type RoomPath = (String, String, i64);

pub(crate) fn room_key((owner, repo, pr): RoomPath) -> RoomKey {
    RoomKey::new(owner, repo, pr)
}
