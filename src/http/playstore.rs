//! The proxy route: forwards to the Play Store listing page.
//!
//! One outbound GET per inbound request, no retry, no caching. The upstream
//! status code is mirrored and the body is streamed through byte-for-byte.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;

use crate::http::server::AppState;

/// Handler for `GET /playstore/check_version`.
///
/// Failure mapping: connect/transport errors become 502, an exceeded
/// upstream deadline becomes 504. A body-stream failure after headers have
/// been sent aborts the connection; the partial write stands.
pub async fn check_version(State(state): State<AppState>) -> Response {
    let url = &state.config.upstream.url;
    tracing::debug!(url = %url, "forwarding to upstream");

    let upstream_response = match state.client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            tracing::error!(url = %url, error = %e, "upstream request timed out");
            return StatusCode::GATEWAY_TIMEOUT.into_response();
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e, "failed to load play store");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let status = upstream_response.status();
    let headers = relay_headers(upstream_response.headers());
    tracing::debug!(status = %status, "upstream responded");

    let body_stream = upstream_response.bytes_stream().inspect_err(|e| {
        tracing::error!(error = %e, "upstream body stream failed");
    });

    let mut response = Response::new(Body::from_stream(body_stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Copy end-to-end headers from the upstream response.
///
/// Hop-by-hop headers belong to the upstream connection, not ours, and the
/// framing headers are recomputed for the streamed body.
fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let keep_alive = HeaderName::from_static("keep-alive");
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        let skip = *name == header::CONNECTION
            || *name == header::TE
            || *name == header::TRAILER
            || *name == header::TRANSFER_ENCODING
            || *name == header::UPGRADE
            || *name == header::PROXY_AUTHENTICATE
            || *name == header::PROXY_AUTHORIZATION
            || *name == header::CONTENT_LENGTH
            || *name == keep_alive;
        if skip {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}
