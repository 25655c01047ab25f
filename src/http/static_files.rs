//! Static asset serving.
//!
//! Two fixed files (`/favicon.ico`, `/robots.txt`) are read and sent by
//! hand so a missing file yields an explicit 404 before any body bytes go
//! out. The `/static` prefix is delegated to `ServeDir`.

use std::path::Path;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_http::services::ServeDir;

use crate::http::server::AppState;

/// Handler for `GET /favicon.ico`.
pub async fn favicon(State(state): State<AppState>) -> Response {
    serve_fixed_file(&state.static_dir().join("favicon.ico")).await
}

/// Handler for `GET /robots.txt`.
pub async fn robots(State(state): State<AppState>) -> Response {
    serve_fixed_file(&state.static_dir().join("robots.txt")).await
}

/// File service for the `/static` prefix (prefix stripped by the router).
pub fn static_dir_service(dir: &Path) -> ServeDir {
    ServeDir::new(dir)
}

/// Copy a file's bytes into a 200 response, or 404 if it cannot be read.
async fn serve_fixed_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let content_type = content_type_for(path);
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            tracing::info!(path = %path.display(), error = %e, "failed to serve static file");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
