use axum::{
    Form, Router,
    body::Body,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::admin::AdminDashboard;
use crate::backend::{Backend, HttpBackend};
use crate::chat::{ChatWidget, Transcript};
use crate::config::AppConfig;
use crate::error::BackendError;
use crate::session::SessionId;
use crate::ui;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.timeout_secs),
    )?);

    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        preview_style = ?config.chat.preview_style,
        "Backend configuration loaded"
    );

    let state = AppState {
        backend,
        config: Arc::clone(&config),
    };
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout_duration = Duration::from_secs(state.config.server.request_timeout_secs);
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(index_handler))
        .route("/admin", get(admin_handler))
        .route("/ui/chat", post(ui_chat))
        .route("/data/{filename}", get(data_handler))
        .route("/health", get(|| async { "ok" }))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_elapsed) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Chat page.
async fn index_handler() -> Html<String> {
    Html(ui::chat::page())
}

/// GET /admin - Dashboard, rendered from a single stats request.
async fn admin_handler(State(state): State<AppState>) -> Html<String> {
    let dashboard = AdminDashboard::load(state.backend.as_ref()).await;
    Html(ui::admin::page(&dashboard))
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragment Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form posted by the chat page.
#[derive(Debug, Deserialize)]
struct ChatForm {
    /// The user's question.
    #[serde(default)]
    query: String,
    /// Session id from the browser's local storage.
    #[serde(default)]
    session_id: String,
}

/// POST /ui/chat - Ask the backend and return the reply fragment.
async fn ui_chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    if form.query.trim().is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let session_id = if form.session_id.trim().is_empty() {
        let id = SessionId::generate();
        tracing::debug!(session_id = %id, "Form carried no session id; generated one");
        id
    } else {
        SessionId::from(form.session_id)
    };

    let transcript = Transcript::new();
    let widget = ChatWidget::new(
        Arc::clone(&state.backend),
        session_id,
        Arc::new(transcript.clone()),
    )
    .with_deadline(chat_deadline(&state.config));
    widget.complete(&form.query).await;

    Html(ui::chat::render_entries(
        &transcript.entries(),
        state.config.chat.preview_style,
    ))
    .into_response()
}

/// Time allowed for the backend inside `/ui/chat`.
///
/// Shorter than the request timeout so a slow backend still yields the
/// fallback fragment rather than a 408 that htmx would not swap in.
fn chat_deadline(config: &AppConfig) -> Duration {
    let request = Duration::from_secs(config.server.request_timeout_secs) * 9 / 10;
    request.min(Duration::from_secs(config.backend.timeout_secs))
}

/// GET /data/{filename} - Stream a cited document from the backend.
async fn data_handler(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    match state.backend.fetch_document(&filename).await {
        Ok(document) => {
            let content_type = document.content_type.unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .to_string()
            });
            (
                [(header::CONTENT_TYPE, content_type)],
                Body::from_stream(document.body),
            )
                .into_response()
        }
        Err(BackendError::Status { status: 404, .. }) => {
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(e) => {
            tracing::error!(
                name: "data.proxy.failed",
                filename = %filename,
                error = %e,
                "Failed to fetch document from backend"
            );
            (StatusCode::BAD_GATEWAY, "Document unavailable").into_response()
        }
    }
}
