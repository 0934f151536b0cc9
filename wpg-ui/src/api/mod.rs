//! HTTP API handlers for wpg-ui

pub mod analytics;
pub mod digest;
pub mod error;
pub mod extract;
pub mod health;
pub mod posts;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use health::health_routes;

/// A log row with its current position, for delete-by-index
#[derive(Debug, Serialize)]
pub struct IndexedRow<T> {
    pub index: usize,
    #[serde(flatten)]
    pub row: T,
}

pub fn indexed<T>(rows: Vec<T>) -> Vec<IndexedRow<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| IndexedRow { index, row })
        .collect()
}

/// CSV download response
pub fn csv_download(file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}
