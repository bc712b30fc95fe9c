//! Integration tests for the PCB Preview Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pcbpreview::config::Config;
use pcbpreview::web::{create_router, AppState};

mod fixtures;
use fixtures::{copper_gerber, full_board_zip, make_zip};

const BOUNDARY: &str = "X-PCBPREVIEW-TEST-BOUNDARY";

fn test_app() -> axum::Router {
    create_router(AppState::new(Config::default()))
}

/// Builds a multipart body with a `file` part and optional `theme` part.
fn multipart_body(file_bytes: &[u8], theme: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"board.zip\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    if let Some(theme) = theme {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"theme\"\r\n\r\n");
        body.extend_from_slice(theme.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_preview(app: &axum::Router, body: Vec<u8>) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/preview")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec(), content_type)
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_list_themes() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/themes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    let themes: Vec<&str> = json["themes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(themes.contains(&"green"));
    assert!(themes.contains(&"purple"));
}

#[tokio::test]
async fn test_preview_returns_zip_package() {
    let app = test_app();
    let body = multipart_body(&full_board_zip(), Some("purple"));
    let (status, bytes, content_type) = post_preview(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/zip"));
    // ZIP local file header magic
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_preview_rejects_garbage_archive() {
    let app = test_app();
    let body = multipart_body(b"not a zip at all", None);
    let (status, bytes, _) = post_preview(&app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "invalid_archive");
}

#[tokio::test]
async fn test_preview_rejects_missing_outline() {
    let app = test_app();
    let copper = copper_gerber();
    let blob = make_zip(&[
        ("board.gtl", copper.as_bytes()),
        ("board.gbl", copper.as_bytes()),
    ]);
    let (status, bytes, _) = post_preview(&app, multipart_body(&blob, None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "missing_outline");
}

#[tokio::test]
async fn test_preview_requires_file_field() {
    let app = test_app();
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"theme\"\r\n\r\ngreen\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    let (status, bytes, _) = post_preview(&app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "missing_file");
}

#[tokio::test]
async fn test_unknown_theme_falls_back_instead_of_failing() {
    let app = test_app();
    let body = multipart_body(&full_board_zip(), Some("glitter"));
    let (status, _, content_type) = post_preview(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/zip"));
}
