//! Analytics log endpoints

use axum::{extract::State, http::StatusCode, response::Response, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wpg_common::config::ANALYTICS_LOG_FILE;
use wpg_common::logs::append_platform_batch;
use wpg_common::records::{AnalyticsRecord, MetricEntry, Platform};
use wpg_common::time;

use super::{csv_download, indexed, ApiError, ApiJson, ApiPath, IndexedRow};
use crate::AppState;

/// Metrics for one platform; values are free text, blanks allowed
#[derive(Debug, Deserialize)]
pub struct PlatformEntry {
    pub platform: Platform,
    #[serde(flatten)]
    pub metrics: MetricEntry,
}

/// Single-platform submission
#[derive(Debug, Deserialize)]
pub struct AnalyticsRequest {
    pub date: Option<NaiveDate>,
    pub track_title: Option<String>,
    #[serde(flatten)]
    pub entry: PlatformEntry,
}

/// Several platforms submitted together; saved all-or-nothing
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub date: Option<NaiveDate>,
    pub track_title: Option<String>,
    pub entries: Vec<PlatformEntry>,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub saved: usize,
    pub total_rows: usize,
}

/// POST /api/analytics
pub async fn add_analytics(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnalyticsRequest>,
) -> Result<(StatusCode, Json<SavedResponse>), ApiError> {
    let date = req.date.unwrap_or_else(time::today);
    let ws = state.workspace();
    let total_rows = append_platform_batch(
        &ws.analytics,
        date,
        req.track_title,
        vec![(req.entry.platform, req.entry.metrics)],
    )?;
    Ok((StatusCode::CREATED, Json(SavedResponse { saved: 1, total_rows })))
}

/// POST /api/analytics/batch
pub async fn add_analytics_batch(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchRequest>,
) -> Result<(StatusCode, Json<SavedResponse>), ApiError> {
    if req.entries.is_empty() {
        return Err(wpg_common::Error::InvalidInput("batch has no entries".to_string()).into());
    }
    let date = req.date.unwrap_or_else(time::today);
    let entries: Vec<(Platform, MetricEntry)> = req.entries.into_iter().map(|e| (e.platform, e.metrics)).collect();
    let saved = entries.len();

    let ws = state.workspace();
    let total_rows = append_platform_batch(&ws.analytics, date, req.track_title, entries)?;
    Ok((StatusCode::CREATED, Json(SavedResponse { saved, total_rows })))
}

/// GET /api/analytics
pub async fn list_analytics(
    State(state): State<AppState>,
) -> Result<Json<Vec<IndexedRow<AnalyticsRecord>>>, ApiError> {
    let rows = state.workspace().analytics.list()?;
    Ok(Json(indexed(rows)))
}

/// DELETE /api/analytics/:index
pub async fn delete_analytics(
    State(state): State<AppState>,
    ApiPath(index): ApiPath<usize>,
) -> Result<Json<AnalyticsRecord>, ApiError> {
    let removed = state.workspace().analytics.delete(index)?;
    Ok(Json(removed))
}

/// GET /api/analytics/export
pub async fn export_analytics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let csv = state.workspace().analytics.export()?;
    Ok(csv_download(ANALYTICS_LOG_FILE, csv))
}
