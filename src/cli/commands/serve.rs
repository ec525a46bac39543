//! HTTP API server.
//!
//! Exposes the session over REST: submit an input, browse and download the
//! result history, and reset it.

use crate::cli::preflight;
use crate::cli::{resolve_length, Output};
use crate::config::Settings;
use crate::error::RecapError;
use crate::orchestrator::Orchestrator;
use crate::render;
use crate::router::Route;
use crate::session::{HistoryEntry, Session};
use crate::state::SummaryLength;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Shared application state.
struct AppState {
    session: Session,
    default_length: SummaryLength,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'recap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let default_length = settings.general.default_length;
    let state = Arc::new(AppState {
        session: Session::new(Orchestrator::new(settings)?),
        default_length,
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Recap API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /health");
    Output::kv("Run", "POST   /run");
    Output::kv("History", "GET    /history");
    Output::kv("Download", "GET    /history/{id}/download");
    Output::kv("Reset", "DELETE /history");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/run", post(run))
        .route("/history", get(list_history).delete(clear_history))
        .route("/history/{id}/download", get(download))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct RunRequest {
    /// YouTube URL or a question
    input: String,
    /// short, medium or long; unknown values use the default
    #[serde(default)]
    length: Option<String>,
}

#[derive(Serialize)]
struct RunResponse {
    route: Route,
    output: String,
    /// Output with URLs turned into anchors.
    html: String,
    failed: bool,
    history_id: Uuid,
}

#[derive(Serialize)]
struct HistoryResponse {
    entries: Vec<HistoryEntry>,
    total: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn run(State(state): State<Arc<AppState>>, Json(req): Json<RunRequest>) -> impl IntoResponse {
    let length = resolve_length(req.length.as_deref(), state.default_length);

    match state.session.submit(&req.input, length).await {
        Ok((_, entry)) => Json(RunResponse {
            route: entry.route,
            html: render::to_html(&entry.output),
            output: entry.output,
            failed: entry.failed,
            history_id: entry.id,
        })
        .into_response(),
        Err(e @ RecapError::Busy) => error_response(StatusCode::CONFLICT, e.to_string()),
        Err(e @ RecapError::InvalidInput(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn list_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries = state.session.history();
    Json(HistoryResponse {
        total: entries.len(),
        entries,
    })
}

async fn clear_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.session.clear();
    StatusCode::NO_CONTENT
}

async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.session.get(id) {
        Some(entry) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", entry.file_name()),
                ),
            ],
            entry.output,
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Result not found: {}", id)),
    }
}
