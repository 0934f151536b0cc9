//! Liveness plus a readability check of both logs

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Row count of a log, or why it could not be read
#[derive(Debug, Serialize)]
pub struct LogStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<wpg_common::Result<usize>> for LogStatus {
    fn from(result: wpg_common::Result<usize>) -> Self {
        match result {
            Ok(rows) => Self {
                rows: Some(rows),
                error: None,
            },
            Err(e) => Self {
                rows: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when a log cannot be read
    pub status: &'static str,
    pub version: &'static str,
    pub posts: LogStatus,
    pub analytics: LogStatus,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ws = state.workspace();
    let posts = LogStatus::from(ws.posts.len());
    let analytics = LogStatus::from(ws.analytics.len());

    let status = if posts.error.is_none() && analytics.error.is_none() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        posts,
        analytics,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
