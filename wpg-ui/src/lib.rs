//! wpg-ui library - local HTTP/JSON front end for the post generator
//!
//! Serves the same actions as the CLI: compose and record posts, log
//! analytics, list/delete/export both logs and view the weekly digest.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use tower_http::trace::TraceLayer;
use wpg_common::Workspace;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// One request at a time touches the logs
    workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
        }
    }

    pub fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let api = Router::new()
        .route("/api/tags", get(api::posts::get_tags))
        .route("/api/posts", get(api::posts::list_posts).post(api::posts::generate_post))
        .route("/api/posts/preview", post(api::posts::preview_post))
        .route("/api/posts/export", get(api::posts::export_posts))
        .route("/api/posts/:index", delete(api::posts::delete_post))
        .route(
            "/api/analytics",
            get(api::analytics::list_analytics).post(api::analytics::add_analytics),
        )
        .route("/api/analytics/batch", post(api::analytics::add_analytics_batch))
        .route("/api/analytics/export", get(api::analytics::export_analytics))
        .route("/api/analytics/:index", delete(api::analytics::delete_analytics))
        .route("/api/digest", get(api::digest::get_digest));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
