//! Weekly digest endpoint

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use wpg_common::digest::Digest;
use wpg_common::time;

use super::{ApiError, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DigestQuery {
    /// Any date inside the week to summarize (default: today)
    pub date: Option<NaiveDate>,
}

/// GET /api/digest
pub async fn get_digest(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DigestQuery>,
) -> Result<Json<Digest>, ApiError> {
    let date = query.date.unwrap_or_else(time::today);
    let digest = state.workspace().digest(date)?;
    Ok(Json(digest))
}
