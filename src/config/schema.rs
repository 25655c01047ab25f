//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the Play Store proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener and lifecycle settings.
    pub server: ServerConfig,

    /// Upstream Play Store endpoint settings.
    pub upstream: UpstreamConfig,

    /// Static asset settings.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8085").
    pub listen: String,

    /// Deadline for producing a response, in seconds.
    /// Enforced by a timeout layer around every handler.
    pub request_timeout_secs: u64,

    /// Grace period for draining in-flight connections on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8085".to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 30,
        }
    }
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fixed URL the proxy route forwards to.
    pub url: String,

    /// Maximum idle connections kept in the outbound pool.
    pub pool_max_idle: usize,

    /// Idle connection timeout in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total per-call deadline in seconds, including body streaming.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://play.google.com/store/apps/details?id=ru.blizko_mobile".to_string(),
            pool_max_idle: 10,
            pool_idle_timeout_secs: 30,
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory static assets are served from.
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: "web/static".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Run with debug-level logging.
    pub debug: bool,

    /// Log level when `debug` is off (trace, debug, info, warn, error).
    pub log_level: String,
}

impl ObservabilityConfig {
    /// Effective minimum log level for this configuration.
    pub fn effective_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
        }
    }
}
