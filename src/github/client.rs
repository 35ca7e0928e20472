//! GitHub REST client for pull request discussions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{
    ApiCreatedComment, ApiCreatedReview, ApiErrorBody, ApiIssueComment, ApiReview,
    ApiReviewComment, PrThreads,
};
use crate::config::GitHubConfig;
use crate::error::{Result, RevdashError};

/// User agent string; GitHub rejects requests without one.
const USER_AGENT: &str = "revdash/0.1";

const ACCEPT: &str = "application/vnd.github+json";

const API_VERSION: &str = "2022-11-28";

/// Upper bound on pages fetched per list.
const MAX_PAGES: u32 = 50;

/// Where comments posted from the dashboard end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    /// A top-level `COMMENT` review. Works without the Issues permission.
    #[default]
    Review,
    /// A conversation comment through the Issues API.
    Issue,
}

impl FromStr for CommentMode {
    type Err = RevdashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "review" => Ok(CommentMode::Review),
            "issue" => Ok(CommentMode::Issue),
            other => Err(RevdashError::Config(format!(
                "unknown comment mode: {}",
                other
            ))),
        }
    }
}

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
    mode: CommentMode,
    per_page: u32,
}

impl GitHubClient {
    /// Create a client from configuration.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                RevdashError::ExternalService(format!("failed to create HTTP client: {}", e))
            })?;

        let mode = config.comment_mode.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to review comment mode");
            CommentMode::Review
        });

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: Some(config.token.trim().to_string()).filter(|t| !t.is_empty()),
            mode,
            per_page: config.per_page.clamp(1, 100),
        })
    }

    /// Get the comment mode.
    pub fn mode(&self) -> CommentMode {
        self.mode
    }

    /// Whether a token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| RevdashError::ExternalService("GITHUB_TOKEN is not set".into()))?;
        Ok(builder
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION))
    }

    /// Fetch a list endpoint page by page until a short page.
    async fn fetch_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.api_base, path);
        let mut items = Vec::new();

        for page in 1..=MAX_PAGES {
            let builder = self
                .client
                .get(&url)
                .query(&[("per_page", self.per_page), ("page", page)]);
            let response = self.request(builder)?.send().await?;
            let batch: Vec<T> = decode(response, path).await?;

            let short = batch.len() < self.per_page as usize;
            items.extend(batch);
            if short {
                return Ok(items);
            }
        }

        tracing::warn!(path, pages = MAX_PAGES, "Stopped paging at the page limit");
        Ok(items)
    }

    /// Fetch every comment and review on a pull request.
    ///
    /// With `since`, items created earlier (or without a timestamp) are dropped.
    pub async fn fetch_pr_threads(
        &self,
        owner: &str,
        repo: &str,
        pr: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<PrThreads> {
        let issue_comments: Vec<ApiIssueComment> = self
            .fetch_all(&format!("/repos/{owner}/{repo}/issues/{pr}/comments"))
            .await?;
        let review_comments: Vec<ApiReviewComment> = self
            .fetch_all(&format!("/repos/{owner}/{repo}/pulls/{pr}/comments"))
            .await?;
        let reviews: Vec<ApiReview> = self
            .fetch_all(&format!("/repos/{owner}/{repo}/pulls/{pr}/reviews"))
            .await?;

        let threads = PrThreads::from_api(issue_comments, review_comments, reviews, since);
        tracing::info!(
            owner,
            repo,
            pr,
            issue_comments = threads.issue_comments.len(),
            review_comments = threads.review_comments.len(),
            reviews = threads.reviews.len(),
            "Fetched pull request threads"
        );
        Ok(threads)
    }

    /// Post a comment to a pull request and return a URL to it.
    pub async fn comment_on_pr(
        &self,
        owner: &str,
        repo: &str,
        pr: i64,
        body: &str,
    ) -> Result<String> {
        tracing::info!(mode = ?self.mode, owner, repo, pr, body_len = body.len(), "Posting to GitHub");

        let url = match self.mode {
            CommentMode::Issue => {
                let path = format!("/repos/{owner}/{repo}/issues/{pr}/comments");
                let builder = self
                    .client
                    .post(format!("{}{}", self.api_base, path))
                    .json(&json!({ "body": body }));
                let response = self.request(builder)?.send().await?;
                let created: ApiCreatedComment = decode(response, &path).await?;
                created.html_url
            }
            CommentMode::Review => {
                let path = format!("/repos/{owner}/{repo}/pulls/{pr}/reviews");
                let builder = self
                    .client
                    .post(format!("{}{}", self.api_base, path))
                    .json(&json!({ "body": body, "event": "COMMENT" }));
                let response = self.request(builder)?.send().await?;
                let created: ApiCreatedReview = decode(response, &path).await?;
                format!(
                    "https://github.com/{owner}/{repo}/pull/{pr}#pullrequestreview-{}",
                    created.id
                )
            }
        };

        tracing::info!(%url, "Posted to GitHub");
        Ok(url)
    }
}

/// Check the status and decode the body, surfacing GitHub's error message.
async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_default();
        tracing::error!(%status, path, %message, "GitHub API error");
        return Err(RevdashError::ExternalService(format!(
            "GitHub API error ({}): {}",
            status, message
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| RevdashError::ExternalService(format!("invalid GitHub response: {}", e)))
}
