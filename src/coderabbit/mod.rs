//! CodeRabbit review analytics.
//!
//! Report client, the dashboard schema, and mock data for running offline.

mod client;
mod mock;
mod types;

pub use client::CodeRabbitClient;
pub use mock::mock_report;
pub use types::{
    DashboardPayload, DeveloperActivity, PullRequestSummary, ReportWindow, SeverityCount,
    SuggestionTypeCount, Totals, TrendPoint,
};
