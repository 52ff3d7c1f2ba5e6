//! Preview server.
//!
//! Serves the same pages as the static build, compiling chapter content on
//! every request so edits to content files show up on reload. Config and
//! registry are loaded once at startup.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | index page |
//! | `GET /chapter/:slug` (and `/chapter/:slug/`) | chapter page, 404 for unknown slugs |
//! | `GET /style.css`, `GET /site.js` | stylesheet, script |
//! | `GET /assets/*` | files from `content/assets/` |
//! | anything else | 404 page |
//!
//! A chapter whose content fails to load gets a 500 page; the error is
//! logged.

use crate::generate::{GenerateError, JS, Site, render_error_page};
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use maud::Markup;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("{0}")]
    Generate(#[from] GenerateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    /// Rendered once; it only depends on config.
    pub stylesheet: Arc<str>,
}

impl AppState {
    pub fn new(site: Site) -> Self {
        let stylesheet = Arc::from(site.stylesheet());
        Self {
            site: Arc::new(site),
            stylesheet,
        }
    }
}

/// Error responses carry their rendered page.
enum AppError {
    NotFound(Markup),
    Internal { message: String, page: Markup },
}

impl AppError {
    fn not_found(site: &Site) -> Self {
        AppError::NotFound(site.not_found_page())
    }

    fn internal(site: &Site, message: String) -> Self {
        let page = render_error_page(&site.config, &message);
        AppError::Internal { message, page }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(page) => (StatusCode::NOT_FOUND, Html(page.into_string())).into_response(),
            AppError::Internal { message, page } => {
                tracing::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
            }
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(state.site.assets_dir());
    Router::new()
        .route("/", get(index))
        .route("/chapter/:slug", get(chapter))
        .route("/chapter/:slug/", get(chapter))
        .route("/style.css", get(stylesheet))
        .route("/site.js", get(script))
        .nest_service("/assets", assets)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.site.index_page().into_string())
}

async fn chapter(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let Some(index) = state.site.registry.position(&slug) else {
        return Err(AppError::not_found(&state.site));
    };

    // Content is read and compiled from disk
    let site = state.site.clone();
    let page = tokio::task::spawn_blocking(move || site.chapter_page(index))
        .await
        .map_err(|e| AppError::internal(&state.site, format!("task join error: {e}")))?
        .map_err(|e| AppError::internal(&state.site, format!("chapter '{slug}': {e}")))?;

    match page {
        Some(page) => Ok(Html(page.into_string())),
        None => Err(AppError::not_found(&state.site)),
    }
}

async fn stylesheet(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.to_string(),
    )
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        JS,
    )
}

async fn not_found(State(state): State<AppState>) -> AppError {
    AppError::not_found(&state.site)
}

// ============================================================================
// Server
// ============================================================================

/// Load the site from `source` and serve it until Ctrl-C.
pub async fn serve(source: &std::path::Path, host: &str, port: u16) -> Result<(), ServeError> {
    let site = Site::load(source)?;
    tracing::info!(
        "serving {} chapters from {}",
        site.registry.len(),
        site.resolver.dir().display()
    );
    let app = create_router(AppState::new(site));

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
