//! Mirror pull request comments into the chat room.

use chrono::{DateTime, Utc};

use crate::chat::{BroadcastMessage, ChatService, NewMessage, Role, RoomKey};
use crate::error::Result;
use crate::github::{GitHubClient, PrThreads};

/// Logins of the automated reviewer.
pub const BOT_IDENTITIES: [&str; 3] = ["coderabbitai", "code-rabbit", "coderabbit"];

/// Body text that marks automated review output.
pub const REVIEW_MARKER: &str = "coderabbit";

/// Derive the role of mirrored content.
pub fn role_for(author: &str, body: &str) -> Role {
    let author = author.to_lowercase();
    if BOT_IDENTITIES.contains(&author.as_str()) || body.to_lowercase().contains(REVIEW_MARKER) {
        Role::CodeRabbit
    } else {
        Role::User
    }
}

fn mirrored(author: String, body: String) -> NewMessage {
    let role = role_for(&author, &body);
    NewMessage::new(author, role, body)
}

/// Post every item of `threads` to the room, then broadcast a summary notice.
///
/// Returns the number of messages posted. The notice is sent even when
/// nothing was posted.
pub async fn mirror_threads(chat: &ChatService, key: &RoomKey, threads: PrThreads) -> Result<usize> {
    let mut posted = 0;

    for comment in threads.issue_comments {
        chat.post(key, &mirrored(comment.author, comment.body)).await?;
        posted += 1;
    }

    for comment in threads.review_comments {
        let body = match comment.path {
            Some(path) => format!("[{}]: {}", path, comment.body),
            None => comment.body,
        };
        chat.post(key, &mirrored(comment.author, body)).await?;
        posted += 1;
    }

    for review in threads.reviews {
        let body = match review.state {
            Some(state) => format!("[{}] {}", state, review.body),
            None => review.body,
        };
        chat.post(key, &mirrored(review.author, body)).await?;
        posted += 1;
    }

    chat.notify(
        key,
        &BroadcastMessage::notice(format!("Synced {} GitHub messages", posted)),
    )
    .await;
    tracing::info!(room = %key, posted, "Mirrored GitHub threads");

    Ok(posted)
}

/// Fetch a pull request's threads and mirror them into its room.
pub async fn sync_github(
    chat: &ChatService,
    github: &GitHubClient,
    key: &RoomKey,
    since: Option<DateTime<Utc>>,
) -> Result<usize> {
    let threads = github
        .fetch_pr_threads(&key.owner, &key.repo, key.pr, since)
        .await?;
    mirror_threads(chat, key, threads).await
}
