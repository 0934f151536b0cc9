//! Mapping of library errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub wpg_common::Error);

impl From<wpg_common::Error> for ApiError {
    fn from(e: wpg_common::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use wpg_common::Error;

        let status = match &self.0 {
            Error::InvalidInput(_) | Error::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
