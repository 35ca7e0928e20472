//! GitHub pull request discussions.

mod client;
mod types;

pub use client::{CommentMode, GitHubClient};
pub use types::{parse_since, IssueComment, PrThreads, Review, ReviewComment, UNKNOWN_AUTHOR};
