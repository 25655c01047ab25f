//! Structured logging.
//!
//! Initialized exactly once at startup, before the server is constructed,
//! so every handler logs through a fully configured dispatcher. There is
//! no re-initialization path; the tracing dispatcher is safe for unbounded
//! concurrent use once installed.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Identifying tag carried in the default filter and startup records.
pub const IDENT: &str = "playstore_proxy";

/// Initialize the process-wide tracing subscriber.
///
/// Supported levels are: ["trace", "debug", "info", "warn", "error"].
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{IDENT}={level},tower_http={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(ident = IDENT, level, "logging initialized");
}
