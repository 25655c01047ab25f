//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, panic recovery)
//! - Build the shared upstream client with its connection pool
//! - Serve connections and coordinate graceful shutdown
//!
//! Lifecycle: Starting → Listening → Draining → Stopped. Draining is
//! entered when the shutdown receiver fires; the drain is bounded by the
//! configured grace period, after which the server task is aborted and
//! `run` returns [`ServerError::ShutdownTimeout`].

use std::future::IntoFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::{playstore, static_files};

/// Errors that terminate the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("cannot gracefully shut down the server within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared outbound client; its pool spans all concurrent requests.
    pub client: reqwest::Client,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.static_files.dir)
    }
}

/// HTTP server for the Play Store proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.upstream.pool_max_idle)
            .pool_idle_timeout(Duration::from_secs(config.upstream.pool_idle_timeout_secs))
            .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_secs))
            .timeout(Duration::from_secs(config.upstream.request_timeout_secs))
            .build()?;

        let state = AppState {
            client,
            config: Arc::new(config.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                user_agent = header_str(request.headers(), header::USER_AGENT),
                referer = header_str(request.headers(), header::REFERER),
            )
        });

        Router::new()
            .route("/playstore/check_version", get(playstore::check_version))
            .route("/favicon.ico", get(static_files::favicon))
            .route("/robots.txt", get(static_files::robots))
            .nest_service(
                "/static",
                static_files::static_dir_service(Path::new(&config.static_files.dir)),
            )
            .fallback(not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(CatchPanicLayer::new())
            .layer(trace)
    }

    /// Run the server until the shutdown receiver fires, then drain.
    ///
    /// New connections stop being accepted as soon as the signal arrives;
    /// in-flight connections get the grace period to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Bind)?;
        tracing::info!(address = %addr, "http server listening");

        let grace = Duration::from_secs(self.config.server.shutdown_grace_secs);

        // The graceful-shutdown future owns the shutdown receiver; the
        // oneshot reports back when the drain started so the grace timer
        // begins at the signal, not before.
        let (draining_tx, draining_rx) = oneshot::channel();
        let serve = axum::serve(listener, self.router).with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::warn!("server is going shutting down...");
            let _ = draining_tx.send(());
        });
        let mut server_task = tokio::spawn(serve.into_future());

        tokio::select! {
            // Listener failed before any shutdown signal.
            result = &mut server_task => {
                result?.map_err(ServerError::Serve)?;
                Ok(())
            }
            _ = draining_rx => {
                match tokio::time::timeout(grace, &mut server_task).await {
                    Ok(result) => {
                        result?.map_err(ServerError::Serve)?;
                        tracing::warn!("server stopped...");
                        Ok(())
                    }
                    Err(_) => {
                        server_task.abort();
                        tracing::error!(
                            grace_secs = grace.as_secs(),
                            "connections still open after grace period"
                        );
                        Err(ServerError::ShutdownTimeout(grace))
                    }
                }
            }
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Fallback for unmatched routes.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
}
