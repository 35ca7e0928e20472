//! Post review report insights into chat rooms.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::chat::{ChatService, NewMessage, Role, RoomKey};
use crate::coderabbit::{CodeRabbitClient, ReportWindow};
use crate::error::Result;

/// Author of report insights.
pub const REPORT_AUTHOR: &str = "CodeRabbit";

const FALLBACK_SUMMARY: &str = "CodeRabbit: new review insights";

/// The window `[today - days, today]`.
pub fn report_window(days: u32, today: NaiveDate) -> ReportWindow {
    ReportWindow {
        from: today - Duration::days(i64::from(days)),
        to: today,
    }
}

/// First field that holds a usable value, in order.
fn first_present<'a>(entry: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|f| entry.get(*f))
        .find(|v| match v {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        })
}

fn pr_number(entry: &Value) -> i64 {
    match first_present(entry, &["number", "id"]) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn summary(entry: &Value) -> String {
    match first_present(entry, &["summary", "title"]) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => FALLBACK_SUMMARY.to_string(),
    }
}

/// Post one insight per pull request listed in `report`.
///
/// Without pull requests a single repository-level summary goes to PR 0.
/// Returns the number of messages posted.
pub async fn sync_report(
    chat: &ChatService,
    owner: &str,
    repo: &str,
    report: &Value,
    window: ReportWindow,
) -> Result<usize> {
    let entries = report
        .get("prs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if entries.is_empty() {
        let key = RoomKey::new(owner, repo, 0);
        let content = format!("[CodeRabbit] Insights {} → {}", window.from, window.to);
        chat.post(&key, &NewMessage::new(REPORT_AUTHOR, Role::CodeRabbit, content))
            .await?;
        tracing::info!(owner, repo, "Posted repository-level report summary");
        return Ok(1);
    }

    let mut posted = 0;
    for entry in entries {
        let key = RoomKey::new(owner, repo, pr_number(entry));
        let message = NewMessage::new(REPORT_AUTHOR, Role::CodeRabbit, summary(entry));
        chat.post(&key, &message).await?;
        posted += 1;
    }

    tracing::info!(owner, repo, posted, "Posted report insights");
    Ok(posted)
}

/// Fetch the last `days` of reports and post them.
pub async fn sync_coderabbit(
    chat: &ChatService,
    client: &CodeRabbitClient,
    owner: &str,
    repo: &str,
    days: u32,
    today: NaiveDate,
) -> Result<(usize, ReportWindow)> {
    let window = report_window(days, today);
    let report = client.fetch_report(window.from, window.to).await?;
    let posted = sync_report(chat, owner, repo, &report, window).await?;
    Ok((posted, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Connection, MessageStore, RoomRegistry};
    use crate::Database;
    use serde_json::json;
    use std::sync::Arc;

    async fn setup() -> (Database, ChatService) {
        let db = Database::open_in_memory().await.unwrap();
        let chat = ChatService::new(
            MessageStore::new(db.pool().clone()),
            Arc::new(RoomRegistry::new()),
        );
        (db, chat)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_report_window() {
        let window = report_window(7, date("2025-09-30"));
        assert_eq!(window.from, date("2025-09-23"));
        assert_eq!(window.to, date("2025-09-30"));
    }

    #[test]
    fn test_pr_number_fallbacks() {
        assert_eq!(pr_number(&json!({"number": 12, "id": 900})), 12);
        assert_eq!(pr_number(&json!({"number": null, "id": 900})), 900);
        assert_eq!(pr_number(&json!({"number": 0, "id": 5})), 5);
        assert_eq!(pr_number(&json!({"id": "42"})), 42);
        assert_eq!(pr_number(&json!({"title": "x"})), 0);
    }

    #[test]
    fn test_summary_fallbacks() {
        assert_eq!(summary(&json!({"summary": "s", "title": "t"})), "s");
        assert_eq!(summary(&json!({"summary": "", "title": "t"})), "t");
        assert_eq!(summary(&json!({})), FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn test_sync_report_per_pr() {
        let (_db, chat) = setup().await;
        let key = RoomKey::new("acme", "widgets", 12);
        let (conn, mut rx) = Connection::channel();
        chat.registry().join(&key, conn).await;

        let report = json!({"prs": [
            {"number": 12, "summary": "2 critical issues"},
            {"id": 13, "title": "Refactor"}
        ]});
        let posted = sync_report(
            &chat,
            "acme",
            "widgets",
            &report,
            report_window(7, date("2025-09-30")),
        )
        .await
        .unwrap();

        assert_eq!(posted, 2);
        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.author, "CodeRabbit");
        assert_eq!(pushed.role, Role::CodeRabbit);
        assert_eq!(pushed.content, "2 critical issues");

        let other = chat
            .history(&RoomKey::new("acme", "widgets", 13), 200)
            .await
            .unwrap();
        assert_eq!(other[0].content, "Refactor");
    }

    #[tokio::test]
    async fn test_sync_report_without_prs() {
        let (_db, chat) = setup().await;
        let window = report_window(7, date("2025-09-30"));

        for report in [json!({}), json!({"prs": []}), json!({"prs": null})] {
            let posted = sync_report(&chat, "acme", "widgets", &report, window)
                .await
                .unwrap();
            assert_eq!(posted, 1);
        }

        let history = chat
            .history(&RoomKey::new("acme", "widgets", 0), 200)
            .await
            .unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(
            history[0].content,
            "[CodeRabbit] Insights 2025-09-23 → 2025-09-30"
        );
    }
}
