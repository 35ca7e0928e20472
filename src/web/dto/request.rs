//! Request DTOs for the dashboard API.

use serde::Deserialize;
use validator::Validate;

use super::validation::not_empty_trimmed;
use crate::chat::Role;

/// Single-shot chat post.
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    /// Author name.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub author: String,
    /// Message text. Stored as given.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
    /// Author role.
    #[serde(default)]
    pub role: Role,
}

/// Chat history query.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of messages; the configured limit when absent.
    pub limit: Option<u32>,
}

/// Report window query. Dates are `YYYY-MM-DD`.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "from_", alias = "from")]
    pub from: String,
    pub to: String,
    /// Serve synthetic data regardless of API key.
    #[serde(default)]
    pub mock: bool,
}

/// Report sync request.
///
/// Accepts `{"days": n}`, a bare `n`, or `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(from = "DaysBody")]
pub struct SyncReportRequest {
    /// Window length in days; the configured default when absent.
    #[validate(range(min = 1, max = 365))]
    pub days: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DaysBody {
    Bare(Option<u32>),
    Object { days: Option<u32> },
}

impl From<DaysBody> for SyncReportRequest {
    fn from(body: DaysBody) -> Self {
        match body {
            DaysBody::Bare(days) | DaysBody::Object { days } => Self { days },
        }
    }
}

/// Comment mirror request.
///
/// Accepts `{"since": "..."}`, a bare string, or `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(from = "SinceBody")]
pub struct GithubSyncRequest {
    /// Only mirror items created at or after this timestamp.
    pub since: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SinceBody {
    Bare(Option<String>),
    Object { since: Option<String> },
}

impl From<SinceBody> for GithubSyncRequest {
    fn from(body: SinceBody) -> Self {
        match body {
            SinceBody::Bare(since) | SinceBody::Object { since } => Self { since },
        }
    }
}

/// Comment to post on a pull request.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_message_defaults_role() {
        let req: PostMessageRequest =
            serde_json::from_value(json!({"author": "bob", "content": "hi"})).unwrap();
        assert_eq!(req.role, Role::User);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_post_message_blank_fields() {
        let req: PostMessageRequest =
            serde_json::from_value(json!({"author": " ", "content": "\n", "role": "ai"}))
                .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("author"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn test_post_message_unknown_role() {
        let result = serde_json::from_value::<PostMessageRequest>(
            json!({"author": "bob", "content": "hi", "role": "admin"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sync_report_days_range() {
        assert!(SyncReportRequest { days: Some(7) }.validate().is_ok());
        assert!(SyncReportRequest { days: None }.validate().is_ok());
        assert!(SyncReportRequest { days: Some(0) }.validate().is_err());
        assert!(SyncReportRequest { days: Some(366) }.validate().is_err());
    }

    #[test]
    fn test_sync_report_body_shapes() {
        let parse = |v| serde_json::from_value::<SyncReportRequest>(v).unwrap().days;
        assert_eq!(parse(json!({"days": 14})), Some(14));
        assert_eq!(parse(json!({})), None);
        assert_eq!(parse(json!(7)), Some(7));
        assert_eq!(parse(json!(null)), None);
        assert!(serde_json::from_value::<SyncReportRequest>(json!("soon")).is_err());
    }

    #[test]
    fn test_github_sync_body_shapes() {
        let parse = |v| serde_json::from_value::<GithubSyncRequest>(v).unwrap().since;
        assert_eq!(
            parse(json!({"since": "2025-09-01"})),
            Some("2025-09-01".to_string())
        );
        assert_eq!(parse(json!({})), None);
        assert_eq!(parse(json!("2025-09-01")), Some("2025-09-01".to_string()));
        assert_eq!(parse(json!(null)), None);
        assert!(serde_json::from_value::<GithubSyncRequest>(json!(12)).is_err());
    }

    #[test]
    fn test_report_query_accepts_both_names() {
        let q: ReportQuery =
            serde_json::from_value(json!({"from_": "2025-09-01", "to": "2025-09-02"})).unwrap();
        assert_eq!(q.from, "2025-09-01");
        assert!(!q.mock);

        let q: ReportQuery =
            serde_json::from_value(json!({"from": "2025-09-01", "to": "2025-09-02"})).unwrap();
        assert_eq!(q.from, "2025-09-01");
    }
}
