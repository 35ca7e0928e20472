//! Synthetic dashboard data for demos and for running without an API key.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use super::types::{
    DashboardPayload, DeveloperActivity, PullRequestSummary, ReportWindow, SeverityCount,
    SuggestionTypeCount, Totals, TrendPoint,
};

/// Maximum number of synthetic pull requests.
const MAX_MOCK_PRS: usize = 12;

const DEVELOPERS: [&str; 4] = ["alice", "bob", "carol", "dave"];
const STATUSES: [&str; 3] = ["open", "reviewed", "merged"];

/// Build a mock payload covering `from..=to`.
///
/// An inverted window yields an empty trend and no pull requests.
pub fn mock_report(from: NaiveDate, to: NaiveDate) -> DashboardPayload {
    let mut rng = rand::rng();
    let days = ((to - from).num_days() + 1).max(0) as usize;

    let trend_daily = (0..days)
        .map(|i| {
            let x = i as f64;
            let issues = 8.0 + 6.0 * (x / 2.0).sin() + rng.random_range(-1.0..1.0);
            let prs = 2.0 + 2.0 * (x / 3.0).cos() + rng.random_range(-1.0..1.0);
            TrendPoint {
                date: from + Duration::days(i as i64),
                issues: issues.round().max(0.0) as i64,
                prs: prs.round().max(0.0) as i64,
                merge_rate: (0.6 + 0.2 * (x / 4.0).sin()).clamp(0.0, 1.0),
            }
        })
        .collect();

    let prs = (0..days.min(MAX_MOCK_PRS))
        .map(|i| PullRequestSummary {
            id: 100 + i as i64,
            title: format!("Improve API {i}"),
            author: DEVELOPERS[i % DEVELOPERS.len()].to_string(),
            repo: "org/service".to_string(),
            opened_at: from + Duration::days(i as i64),
            status: STATUSES[i % STATUSES.len()].to_string(),
            issues: ((i * 3) % 12) as i64,
            critical: if i % 7 == 0 { 1 } else { 0 },
        })
        .collect();

    DashboardPayload {
        window: ReportWindow { from, to },
        totals: Totals {
            prs_reviewed: 42,
            issues: 128,
            critical: 7,
            reviewers: 9,
            merge_rate: 0.71,
            median_response_hrs: 6.4,
        },
        issues_by_severity: [("critical", 7), ("high", 22), ("medium", 54), ("low", 45)]
            .into_iter()
            .map(|(severity, count)| SeverityCount {
                severity: severity.to_string(),
                count,
            })
            .collect(),
        suggestions_by_type: [
            ("security", 16),
            ("performance", 21),
            ("style", 35),
            ("maintainability", 29),
            ("tests", 27),
        ]
        .into_iter()
        .map(|(kind, count)| SuggestionTypeCount {
            kind: kind.to_string(),
            count,
        })
        .collect(),
        developer_activity: [
            ("alice", 11, 38, 3.1),
            ("bob", 9, 22, 7.4),
            ("carol", 7, 18, 4.9),
            ("dave", 6, 14, 9.2),
        ]
        .into_iter()
        .map(|(dev, reviews, comments, avg)| DeveloperActivity {
            dev: dev.to_string(),
            reviews,
            comments,
            avg_response_hrs: avg,
        })
        .collect(),
        trend_daily,
        prs,
    }
}
