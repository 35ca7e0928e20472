//! Pull request discussion types.
//!
//! `Api*` types mirror the REST payloads; the rest are what the sync adapter
//! consumes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RevdashError};

/// Author shown when an item has no user (deleted account).
pub const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiIssueComment {
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewComment {
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCreatedReview {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCreatedComment {
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

/// A conversation comment on the pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueComment {
    pub author: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// An inline comment on a diff line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    pub author: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: Option<String>,
}

/// A submitted review with a summary body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub author: String,
    pub body: String,
    pub state: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Everything said on a pull request, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrThreads {
    pub issue_comments: Vec<IssueComment>,
    pub review_comments: Vec<ReviewComment>,
    pub reviews: Vec<Review>,
}

impl PrThreads {
    /// Total number of items.
    pub fn len(&self) -> usize {
        self.issue_comments.len() + self.review_comments.len() + self.reviews.len()
    }

    /// Check if there is nothing to mirror.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build from raw API payloads, dropping items older than `since` and
    /// reviews without a body.
    pub(crate) fn from_api(
        issue_comments: Vec<ApiIssueComment>,
        review_comments: Vec<ApiReviewComment>,
        reviews: Vec<ApiReview>,
        since: Option<DateTime<Utc>>,
    ) -> Self {
        let issue_comments = issue_comments
            .into_iter()
            .filter(|c| is_after(c.created_at, since))
            .map(|c| IssueComment {
                author: author_of(c.user),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect();

        let review_comments = review_comments
            .into_iter()
            .filter(|c| is_after(c.created_at, since))
            .map(|c| ReviewComment {
                author: author_of(c.user),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
                path: c.path,
            })
            .collect();

        let reviews = reviews
            .into_iter()
            .filter(|r| is_after(r.submitted_at, since))
            .filter(|r| r.body.as_deref().is_some_and(|b| !b.is_empty()))
            .map(|r| Review {
                author: author_of(r.user),
                body: r.body.unwrap_or_default(),
                state: r.state,
                submitted_at: r.submitted_at,
            })
            .collect();

        Self {
            issue_comments,
            review_comments,
            reviews,
        }
    }
}

fn author_of(user: Option<ApiUser>) -> String {
    user.map(|u| u.login)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Without `since` everything passes; with it, undated items are dropped.
fn is_after(ts: Option<DateTime<Utc>>, since: Option<DateTime<Utc>>) -> bool {
    match (since, ts) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(since), Some(ts)) => ts >= since,
    }
}

/// Parse a `since` timestamp.
///
/// Accepts RFC 3339 (including a trailing `Z`), naive date-times and bare
/// dates; naive values are taken as UTC.
pub fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(RevdashError::Validation(format!(
        "invalid since timestamp: {}",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_since(s).unwrap()
    }

    #[test]
    fn test_parse_since_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        assert_eq!(ts("2025-09-01T12:00:00Z"), expected);
        assert_eq!(ts("2025-09-01T12:00:00+00:00"), expected);
        assert_eq!(ts("2025-09-01T14:00:00+02:00"), expected);
        assert_eq!(ts("2025-09-01T12:00:00"), expected);
        assert_eq!(ts("2025-09-01 12:00:00"), expected);
        assert_eq!(
            ts("2025-09-01"),
            Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_since_invalid() {
        assert!(matches!(
            parse_since("last tuesday"),
            Err(RevdashError::Validation(_))
        ));
        assert!(parse_since("").is_err());
    }

    #[test]
    fn test_api_payloads_deserialize() {
        let comment: ApiIssueComment = serde_json::from_value(json!({
            "id": 1,
            "user": {"login": "alice", "id": 9},
            "body": "hello",
            "created_at": "2025-09-01T10:00:00Z",
            "html_url": "https://github.com/o/r/pull/1#issuecomment-1"
        }))
        .unwrap();
        assert_eq!(comment.user.unwrap().login, "alice");

        let review: ApiReview = serde_json::from_value(json!({
            "id": 2,
            "user": null,
            "body": null,
            "state": "PENDING",
            "submitted_at": null
        }))
        .unwrap();
        assert!(review.user.is_none());
        assert!(review.submitted_at.is_none());
    }

    fn issue(author: Option<&str>, at: &str) -> ApiIssueComment {
        ApiIssueComment {
            user: author.map(|login| ApiUser {
                login: login.to_string(),
            }),
            body: Some(format!("by {:?}", author)),
            created_at: Some(ts(at)),
        }
    }

    fn review(body: Option<&str>, at: Option<&str>) -> ApiReview {
        ApiReview {
            user: Some(ApiUser {
                login: "bob".to_string(),
            }),
            body: body.map(str::to_string),
            state: Some("COMMENTED".to_string()),
            submitted_at: at.map(ts),
        }
    }

    #[test]
    fn test_from_api_unknown_author() {
        let threads = PrThreads::from_api(
            vec![issue(None, "2025-09-01T00:00:00Z")],
            vec![],
            vec![],
            None,
        );
        assert_eq!(threads.issue_comments[0].author, "unknown");
    }

    #[test]
    fn test_from_api_since_filter() {
        let since = Some(ts("2025-09-02T00:00:00Z"));
        let threads = PrThreads::from_api(
            vec![
                issue(Some("old"), "2025-09-01T00:00:00Z"),
                issue(Some("edge"), "2025-09-02T00:00:00Z"),
                issue(Some("new"), "2025-09-03T00:00:00Z"),
            ],
            vec![ApiReviewComment {
                user: None,
                body: None,
                created_at: None,
                path: Some("src/lib.rs".to_string()),
            }],
            vec![review(Some("late"), Some("2025-09-05T00:00:00Z")), review(Some("undated"), None)],
            since,
        );

        let authors: Vec<_> = threads
            .issue_comments
            .iter()
            .map(|c| c.author.as_str())
            .collect();
        assert_eq!(authors, vec!["edge", "new"]);
        assert!(threads.review_comments.is_empty());
        assert_eq!(threads.reviews.len(), 1);
        assert_eq!(threads.reviews[0].body, "late");
    }

    #[test]
    fn test_from_api_drops_empty_reviews() {
        let threads = PrThreads::from_api(
            vec![],
            vec![],
            vec![review(None, None), review(Some(""), None), review(Some("ok"), None)],
            None,
        );
        assert_eq!(threads.reviews.len(), 1);
        assert_eq!(threads.len(), 1);
        assert!(!threads.is_empty());
    }
}
