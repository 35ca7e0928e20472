//! Review report handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::coderabbit::{mock_report, DashboardPayload};
use crate::sync::sync_coderabbit;
use crate::web::dto::{ApiQuery, OptionalJson, ReportQuery, SyncReportRequest, SyncReportResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

fn parse_window(query: &ReportQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"))
    };
    Ok((parse(&query.from)?, parse(&query.to)?))
}

/// GET /api/report?from_=&to=&mock= - Dashboard payload for a window.
///
/// Served from mock data when asked to or when no API key is configured.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<DashboardPayload>, ApiError> {
    let (from, to) = parse_window(&query)?;

    if query.mock || !state.coderabbit.has_api_key() {
        tracing::debug!(%from, %to, "Serving mock report");
        return Ok(Json(mock_report(from, to)));
    }

    let raw = state.coderabbit.fetch_report(from, to).await?;
    let payload = DashboardPayload::from_value(raw).map_err(|e| {
        tracing::error!(error = %e, "Report failed schema validation");
        ApiError::bad_gateway(format!("Schema validation error: {}", e))
    })?;

    Ok(Json(payload))
}

/// GET /api/coderabbit/report?from_=&to= - Raw upstream report.
pub async fn coderabbit_report(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let (from, to) = parse_window(&query)?;
    let raw = state.coderabbit.fetch_report(from, to).await?;
    Ok(Json(raw))
}

/// POST /api/coderabbit/sync/:owner/:repo - Post recent insights into chat rooms.
///
/// The body is optional: `{"days": n}`, a bare `n`, or `null`.
pub async fn coderabbit_sync(
    State(state): State<Arc<AppState>>,
    Path((owner, repo)): Path<(String, String)>,
    OptionalJson(req): OptionalJson<SyncReportRequest>,
) -> Result<Json<SyncReportResponse>, ApiError> {
    let days = req.days.unwrap_or(state.sync_days);
    let today = Utc::now().date_naive();

    let (posted, window) =
        sync_coderabbit(&state.chat, &state.coderabbit, &owner, &repo, days, today).await?;

    Ok(Json(SyncReportResponse {
        ok: true,
        posted,
        window,
    }))
}
