//! Chat message types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RevdashError;

/// Identifies a chat room: one pull request of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number. `0` is the repository-level room.
    pub pr: i64,
}

impl RoomKey {
    /// Create a new room key.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, pr: i64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            pr,
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.pr)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human participant.
    User,
    /// Server-generated notices.
    System,
    /// An AI assistant.
    Ai,
    /// The automated CodeRabbit reviewer.
    #[serde(rename = "coderabbit")]
    CodeRabbit,
}

impl Role {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::System => "system",
            Role::Ai => "ai",
            Role::CodeRabbit => "coderabbit",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RevdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "system" => Ok(Role::System),
            "ai" => Ok(Role::Ai),
            "coderabbit" => Ok(Role::CodeRabbit),
            other => Err(RevdashError::Validation(format!("unknown role: {other}"))),
        }
    }
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Store-assigned id, strictly increasing across all rooms.
    pub id: i64,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub pr: i64,
    /// Display name of the author.
    pub author: String,
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The room this message belongs to.
    pub fn room_key(&self) -> RoomKey {
        RoomKey::new(&self.owner, &self.repo, self.pr)
    }
}

/// A message to be appended to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Display name of the author.
    pub author: String,
    /// Author role.
    pub role: Role,
    /// Message body, stored exactly as given.
    pub content: String,
}

impl NewMessage {
    /// Create a new message.
    pub fn new(author: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(author, Role::User, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", Role::System, content)
    }
}

/// Payload pushed to every live connection in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    /// Id of the persisted message; absent for notices that are not stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name of the author.
    pub author: String,
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
}

impl BroadcastMessage {
    /// Echo of a message that was just stored under `id`.
    pub fn stored(id: i64, message: &NewMessage) -> Self {
        Self {
            id: Some(id),
            author: message.author.clone(),
            role: message.role,
            content: message.content.clone(),
        }
    }

    /// A system notice that is broadcast without being stored.
    pub fn notice(content: impl Into<String>) -> Self {
        Self {
            id: None,
            author: "system".to_string(),
            role: Role::System,
            content: content.into(),
        }
    }
}
