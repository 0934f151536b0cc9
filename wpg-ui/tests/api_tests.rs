//! Integration tests for wpg-ui API endpoints
//!
//! Each test gets its own temporary root folder, so logs start absent.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use wpg_common::config::TomlConfig;
use wpg_common::Workspace;
use wpg_ui::{build_router, AppState};

/// Test helper: app over a fresh root folder
fn setup_app() -> (TempDir, axum::Router) {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::open(temp_dir.path(), &TomlConfig::default()).unwrap();
    (temp_dir, build_router(AppState::new(workspace)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

fn flip1() -> Value {
    json!({
        "title": "Flip1",
        "sample_artist": "J Dilla",
        "sample_title": "Think Twice",
        "sample_year": "1996",
        "format": "without_hash",
        "date": "2024-05-05"
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert_eq!(body["posts"]["rows"], 0);
    assert_eq!(body["analytics"]["rows"], 0);
}

#[tokio::test]
async fn test_health_reports_unreadable_log() {
    let (dir, app) = setup_app();
    // A directory where the post log should be cannot be read as a file
    std::fs::create_dir(dir.path().join("post_log.csv")).unwrap();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "degraded");
    assert!(body["posts"]["error"].is_string());
    assert_eq!(body["analytics"]["rows"], 0);
}

// =============================================================================
// Posts
// =============================================================================

#[tokio::test]
async fn test_tags_lists_catalog() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get("/api/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["max_rotating"], 10);
    assert_eq!(body["core"][0], "#boombap");
    assert_eq!(body["formats"], json!(["with_hash", "without_hash", "comma_separated"]));
}

#[tokio::test]
async fn test_preview_does_not_record() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/posts/preview", flip1()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body["captions"]["sunday_meta"].as_str().unwrap().contains("Flip1"));

    let response = app.oneshot(get("/api/posts")).await.unwrap();
    let rows = extract_json(response.into_body()).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn test_generate_records_post() {
    let (_dir, app) = setup_app();

    let response = app.clone().oneshot(post_json("/api/posts", flip1())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["format"], "without_hash");
    assert!(body["tag_line"].as_str().unwrap().ends_with("jdilla thinktwice"));
    assert_eq!(body["captions"].as_object().unwrap().len(), 4);

    let response = app.oneshot(get("/api/posts")).await.unwrap();
    let rows = extract_json(response.into_body()).await;
    assert_eq!(rows[0]["index"], 0);
    assert_eq!(rows[0]["Title"], "Flip1");
    assert_eq!(rows[0]["Date"], "2024-05-05");
}

#[tokio::test]
async fn test_generate_without_title_is_bad_request() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(post_json("/api/posts", json!({ "title": " " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/posts", json!({ "sample_artist": "J Dilla" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("title"));

    let mut req = flip1();
    req["format"] = json!("shouting");
    let response = app.oneshot(post_json("/api/posts/preview", req)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(extract_json(response.into_body()).await["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_index_gets_json_error() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(delete("/api/posts/first")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(extract_json(response.into_body()).await["error"].is_string());
}

#[tokio::test]
async fn test_delete_post_and_out_of_range() {
    let (_dir, app) = setup_app();

    for title in ["a", "b"] {
        let mut req = flip1();
        req["title"] = json!(title);
        app.clone().oneshot(post_json("/api/posts", req)).await.unwrap();
    }

    let response = app.clone().oneshot(delete("/api/posts/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await["Title"], "a");

    let response = app.clone().oneshot(delete("/api/posts/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/posts")).await.unwrap();
    let rows = extract_json(response.into_body()).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["Title"], "b");
    assert_eq!(rows[0]["index"], 0);
}

#[tokio::test]
async fn test_export_posts_is_csv_with_header() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get("/api/posts/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let text = extract_text(response.into_body()).await;
    assert_eq!(
        text,
        "Date,Title,Sample Artist,Sample Track,Sample Year,Tags,YouTube URL,SoundCloud URL\n"
    );
}

// =============================================================================
// Analytics and digest
// =============================================================================

#[tokio::test]
async fn test_batch_then_digest() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/analytics/batch",
            json!({
                "date": "2024-05-07",
                "track_title": "Flip1",
                "entries": [
                    { "platform": "Instagram", "reach": "1200", "likes": "60" },
                    { "platform": "TikTok", "reach": "3000", "likes": "300" },
                    { "platform": "YouTube", "reach": "n/a", "likes": "5" }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["saved"], 3);
    assert_eq!(body["total_rows"], 3);

    let response = app.oneshot(get("/api/digest?date=2024-05-08")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let digest = extract_json(response.into_body()).await;
    assert_eq!(digest["status"], "summary");
    assert_eq!(digest["record_count"], 3);
    assert_eq!(digest["top_performer"]["record"]["Platform"], "TikTok");
    assert_eq!(digest["growth"]["percent"], 0.0);
    assert_eq!(digest["growth"]["delta"], 4200.0);
}

#[tokio::test]
async fn test_digest_without_data() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get("/api/digest?date=2024-05-08")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let digest = extract_json(response.into_body()).await;
    assert_eq!(digest["status"], "no_data");
    assert_eq!(digest["week"]["start"], "2024-05-06");
}

#[tokio::test]
async fn test_single_analytics_entry_and_delete() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/analytics",
            json!({ "date": "2024-05-07", "platform": "Shorts", "reach": "80" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get("/api/analytics")).await.unwrap();
    let rows = extract_json(response.into_body()).await;
    assert_eq!(rows[0]["Platform"], "Shorts");
    assert_eq!(rows[0]["Reach"], "80");
    assert_eq!(rows[0]["Likes"], "");

    let response = app.clone().oneshot(delete("/api/analytics/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/analytics/export")).await.unwrap();
    let text = extract_text(response.into_body()).await;
    assert_eq!(text, "Date,Platform,Track Title,Reach,Likes,Saves,Comments,Clicks\n");
}

#[tokio::test]
async fn test_numeric_metrics_and_lowercase_platform() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/analytics",
            json!({ "date": "2024-05-07", "platform": "tiktok", "reach": 1200, "likes": 80, "saves": 2.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/analytics")).await.unwrap();
    let rows = extract_json(response.into_body()).await;
    assert_eq!(rows[0]["Platform"], "TikTok");
    assert_eq!(rows[0]["Reach"], "1200");
    assert_eq!(rows[0]["Likes"], "80");
    assert_eq!(rows[0]["Saves"], "2.5");
}

#[tokio::test]
async fn test_bad_digest_date_gets_json_error() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get("/api/digest?date=next-week")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(extract_json(response.into_body()).await["error"].is_string());
}

#[tokio::test]
async fn test_empty_batch_is_bad_request() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(post_json("/api/analytics/batch", json!({ "entries": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
