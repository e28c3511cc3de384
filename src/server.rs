//! HTTP server for the batch translation API.
//!
//! # Endpoints
//!
//! - `POST /api/translate` — Translates a batch of lines.
//! - `GET /health` — Health check.
//! - Anything else is served from the static asset directory
//!   (`GET /` returns its `index.html`).
//!
//! ## POST /api/translate
//!
//! ### Request
//! ```json
//! { "lines": ["مرحبا"] }
//! ```
//!
//! ### Response
//! ```json
//! {
//!   "results": [
//!     { "arabic": "مرحبا", "english": "hello", "franco": "marhaba" }
//!   ]
//! }
//! ```
//!
//! A body without a `lines` array is answered with `400` and
//! `{"error": "Body must contain an array of lines"}`.

use crate::config::Config;
use crate::translator::{TranslatedLine, Translator};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

/// Message returned when the request body has no `lines` array.
pub const INVALID_BODY_MESSAGE: &str = "Body must contain an array of lines";

/// Successful batch response.
#[derive(Debug, Serialize)]
struct BatchResponse {
    results: Vec<TranslatedLine>,
}

/// Error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared state for the route handlers.
pub struct AppState {
    translator: Translator,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }
}

/// Builds the router with the API routes and static file fallback.
pub fn router(state: Arc<AppState>, public_dir: &Path) -> Router {
    // Configure CORS to allow requests from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/translate", post(translate_lines))
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .with_state(state)
}

/// Binds to the configured address and serves until Ctrl-C.
pub async fn serve(config: &Config, translator: Translator) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(translator));
    let app = router(state, &config.public_dir);

    let addr = SocketAddr::from((config.host, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Translation server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Translation server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Batch translate endpoint.
///
/// POST /api/translate
async fn translate_lines(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<BatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let lines = parse_lines(&body).ok_or_else(|| {
        debug!("Rejected translate request without a lines array");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: INVALID_BODY_MESSAGE.to_string(),
            }),
        )
    })?;

    info!("Translating batch of {} lines", lines.len());
    let results = state.translator.translate_batch(&lines).await;

    Ok(Json(BatchResponse { results }))
}

/// Returns the `lines` array of a JSON object body, if there is one.
fn parse_lines(body: &[u8]) -> Option<Vec<Value>> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(mut object) => match object.remove("lines")? {
            Value::Array(lines) => Some(lines),
            _ => None,
        },
        _ => None,
    }
}
