//! Post composition and post log endpoints

use axum::{extract::State, http::StatusCode, response::Response, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wpg_common::compose::{Composition, TrackDescriptor};
use wpg_common::config::POST_LOG_FILE;
use wpg_common::records::PostRecord;
use wpg_common::tags::{FormatMode, TagSelection};
use wpg_common::time;

use super::{csv_download, indexed, ApiError, ApiJson, ApiPath, IndexedRow};
use crate::AppState;

/// Form fields plus tag choices
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub track: TrackDescriptor,
    #[serde(flatten)]
    pub selection: TagSelection,
    #[serde(default)]
    pub format: FormatMode,
    /// Record date (default: today)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub core: Vec<String>,
    pub rotating: Vec<String>,
    pub trendy: Vec<String>,
    pub max_rotating: usize,
    pub formats: Vec<FormatMode>,
}

/// GET /api/tags
pub async fn get_tags(State(state): State<AppState>) -> Json<TagsResponse> {
    let ws = state.workspace();
    let catalog = ws.catalog();
    Json(TagsResponse {
        core: catalog.core().to_vec(),
        rotating: catalog.rotating_options().to_vec(),
        trendy: catalog.trendy_options().to_vec(),
        max_rotating: catalog.max_rotating(),
        formats: FormatMode::ALL.to_vec(),
    })
}

/// POST /api/posts/preview
///
/// Composes captions without recording anything.
pub async fn preview_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<Composition>, ApiError> {
    let composition = state.workspace().compose(&req.track, &req.selection, req.format)?;
    Ok(Json(composition))
}

/// POST /api/posts
///
/// Composes captions and appends the post to the post log.
pub async fn generate_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<(StatusCode, Json<Composition>), ApiError> {
    let date = req.date.unwrap_or_else(time::today);
    let composition = state
        .workspace()
        .generate(&req.track, &req.selection, req.format, date)?;
    Ok((StatusCode::CREATED, Json(composition)))
}

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<IndexedRow<PostRecord>>>, ApiError> {
    let rows = state.workspace().posts.list()?;
    Ok(Json(indexed(rows)))
}

/// DELETE /api/posts/:index
pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(index): ApiPath<usize>,
) -> Result<Json<PostRecord>, ApiError> {
    let removed = state.workspace().posts.delete(index)?;
    Ok(Json(removed))
}

/// GET /api/posts/export
pub async fn export_posts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let csv = state.workspace().posts.export()?;
    Ok(csv_download(POST_LOG_FILE, csv))
}
