//! Web API module for PCB Preview.
//!
//! Thin transport over the preview pipeline. The pipeline itself is
//! request-scoped and stateless; this layer only maps uploads in and the
//! typed error taxonomy out to status codes.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/themes` - List built-in theme names
//! - `POST /api/preview` - Upload a fabrication ZIP, receive the result
//!   package (multipart fields: `file`, optional `theme`)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::archive;
use crate::config::Config;
use crate::error::PipelineError;
use crate::outline::OutlinePolicy;
use crate::package;
use crate::pipeline;
use crate::render::backend::MinimalBackend;
use crate::theme::Theme;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (immutable after startup)
    config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The outline policy configured for this server.
    #[must_use]
    pub fn outline_policy(&self) -> OutlinePolicy {
        if self.config.render.fallback_outline {
            OutlinePolicy::CopperFallback
        } else {
            OutlinePolicy::Require
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Theme list response.
#[derive(Debug, Serialize)]
pub struct ThemeListResponse {
    /// Built-in theme names.
    pub themes: Vec<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

fn error_response(kind: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: kind.to_string(),
        message: message.into(),
    }
}

/// Maps the pipeline taxonomy to transport status codes.
fn map_pipeline_error(err: &PipelineError) -> (StatusCode, ErrorResponse) {
    let message = err.to_string();
    match err {
        PipelineError::InvalidArchive(_) => (
            StatusCode::BAD_REQUEST,
            error_response("invalid_archive", message),
        ),
        PipelineError::MissingOutline => (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_response("missing_outline", message),
        ),
        PipelineError::RenderPrecondition { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_response("render_precondition", message),
        ),
        PipelineError::DegenerateGeometry => (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_response("degenerate_geometry", message),
        ),
        PipelineError::UnparseableLayer { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_response("unparseable_layer", message),
        ),
        PipelineError::LayerRender { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_response("layer_render", message),
        ),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /health`
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/themes`
async fn list_themes() -> Json<ThemeListResponse> {
    Json(ThemeListResponse {
        themes: Theme::builtin_names()
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    })
}

/// `POST /api/preview`
///
/// Multipart upload: `file` carries the fabrication ZIP, optional
/// `theme` names a built-in theme. Responds with the result package
/// (`application/zip`) or a JSON error.
async fn preview(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    let mut blob: Option<(String, Vec<u8>)> = None;
    let mut theme_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("bad_multipart", e.to_string())),
        )
    })? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.zip").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(error_response("bad_multipart", e.to_string())),
                    )
                })?;
                blob = Some((filename, bytes.to_vec()));
            }
            Some("theme") => {
                theme_name = field.text().await.ok();
            }
            _ => {}
        }
    }

    let Some((filename, blob)) = blob else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(error_response("missing_file", "multipart field 'file' is required")),
        ));
    };

    info!(%request_id, file = %filename, size = blob.len(), "preview upload received");

    let requested_theme = theme_name
        .as_deref()
        .unwrap_or(&state.config.render.default_theme)
        .to_string();
    let theme = Theme::resolve(Some(&requested_theme));
    let policy = state.outline_policy();

    // The pipeline is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let files = archive::extract(&blob, &filename)?;
        let output = pipeline::process(files, &theme, policy, &MinimalBackend)?;
        package::assemble(&output.top_image, &output.bottom_image, &output.dimensions)
    })
    .await
    .map_err(|e| {
        error!(%request_id, "pipeline task panicked: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response("internal", "preview task failed")),
        )
    })?;

    match result {
        Ok(package_blob) => {
            info!(%request_id, size = package_blob.len(), "preview package ready");
            Ok((
                [
                    (header::CONTENT_TYPE, "application/zip"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"pcb_preview.zip\"",
                    ),
                ],
                package_blob,
            )
                .into_response())
        }
        Err(pipeline_err) => {
            let (status, body) = map_pipeline_error(&pipeline_err);
            info!(%request_id, %pipeline_err, status = %status, "preview rejected");
            Err((status, Json(body)))
        }
    }
}

// ============================================================================
// Router and server
// ============================================================================

/// Builds the API router.
pub fn create_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.server.max_upload_mb)
        .unwrap_or(32)
        .saturating_mul(1024 * 1024);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/themes", get(list_themes))
        .route("/api/preview", post(preview))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the web server and runs until shutdown.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
