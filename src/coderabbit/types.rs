//! Dashboard report schema.
//!
//! Upstream reports are validated by deserializing into these types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Issue count per severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: String,
    pub count: i64,
}

/// Suggestion count per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionTypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
}

/// Review activity of one developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperActivity {
    pub dev: String,
    pub reviews: i64,
    pub comments: i64,
    pub avg_response_hrs: f64,
}

/// One day of the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub issues: i64,
    pub prs: i64,
    pub merge_rate: f64,
}

/// A reviewed pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub repo: String,
    pub opened_at: NaiveDate,
    pub status: String,
    pub issues: i64,
    pub critical: i64,
}

/// Reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub prs_reviewed: i64,
    pub issues: i64,
    pub critical: i64,
    pub reviewers: i64,
    pub merge_rate: f64,
    pub median_response_hrs: f64,
}

/// Payload served to the dashboard UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub window: ReportWindow,
    pub totals: Totals,
    pub issues_by_severity: Vec<SeverityCount>,
    pub suggestions_by_type: Vec<SuggestionTypeCount>,
    pub developer_activity: Vec<DeveloperActivity>,
    pub trend_daily: Vec<TrendPoint>,
    pub prs: Vec<PullRequestSummary>,
}

impl DashboardPayload {
    /// Validate an arbitrary JSON report against the dashboard schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "window": {"from": "2025-09-01", "to": "2025-09-02"},
            "totals": {
                "prsReviewed": 3, "issues": 10, "critical": 1, "reviewers": 2,
                "mergeRate": 0.5, "medianResponseHrs": 4.0
            },
            "issuesBySeverity": [{"severity": "high", "count": 4}],
            "suggestionsByType": [{"type": "style", "count": 2}],
            "developerActivity": [
                {"dev": "alice", "reviews": 1, "comments": 2, "avgResponseHrs": 1.5}
            ],
            "trendDaily": [
                {"date": "2025-09-01", "issues": 3, "prs": 1, "mergeRate": 0.4}
            ],
            "prs": [{
                "id": 100, "title": "Fix", "author": "alice", "repo": "org/service",
                "openedAt": "2025-09-01", "status": "open", "issues": 2, "critical": 0
            }]
        })
    }

    #[test]
    fn test_valid_payload() {
        let payload = DashboardPayload::from_value(sample()).unwrap();
        assert_eq!(payload.window.from, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(payload.totals.prs_reviewed, 3);
        assert_eq!(payload.suggestions_by_type[0].kind, "style");
        assert_eq!(payload.prs[0].opened_at.to_string(), "2025-09-01");
    }

    #[test]
    fn test_serializes_camel_case() {
        let payload = DashboardPayload::from_value(sample()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, sample());
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("totals");
        assert!(DashboardPayload::from_value(value).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut value = sample();
        value["window"]["from"] = json!("yesterday");
        assert!(DashboardPayload::from_value(value).is_err());
    }
}
